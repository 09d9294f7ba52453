use std::fmt;

use serde::{Deserialize, Serialize};

/// Boxed error produced by a [`Transport`](crate::rpc::Transport) implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum WasabiError {
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),

    #[error("encode request params: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to generate request id: {0}")]
    RequestId(#[source] rand::Error),

    #[error("HTTP transport failure: {0}")]
    Transport(#[source] BoxError),

    #[error("http status {0}")]
    HttpStatus(u16),

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error("unexpected empty result")]
    NullResult,

    #[error("decode result: {0}")]
    Decode(#[source] serde_json::Error),
}

impl WasabiError {
    /// The structured remote error, if the daemon answered with one.
    pub fn as_rpc(&self) -> Option<&RpcError> {
        match self {
            Self::Rpc(err) => Some(err),
            _ => None,
        }
    }
}

// ==============================================================================
// Configuration Errors
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("host must not be empty")]
    EmptyHost,

    #[error("host must not contain / or :")]
    HostSeparator,

    #[error("host `{host}` does not form a valid URL: {message}")]
    InvalidHost { host: String, message: String },

    #[error("rpc password must not be empty if rpc user is set")]
    MissingPassword,

    #[error("rpc user must not be empty if rpc password is set")]
    MissingUser,

    #[error("custom header key must not be empty")]
    EmptyHeaderName,

    #[error("custom header `{0}` must not have an empty value")]
    EmptyHeaderValue(String),

    #[error("custom header key must not be Authorization")]
    ReservedHeader,

    #[error("custom header `{name}` is not valid HTTP: {message}")]
    InvalidHeader { name: String, message: String },
}

// ==============================================================================
// JSON-RPC Errors
// ==============================================================================

/// JSON-RPC 2.0 error codes. Codes outside the standard set are kept
/// verbatim in [`RpcErrorCode::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum RpcErrorCode {
    ParseError,
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    InternalError,
    ServerError,
    Other(i64),
}

impl RpcErrorCode {
    pub fn code(self) -> i64 {
        match self {
            Self::ParseError => -32700,
            Self::InvalidRequest => -32600,
            Self::MethodNotFound => -32601,
            Self::InvalidParams => -32602,
            Self::InternalError => -32603,
            Self::ServerError => -32000,
            Self::Other(code) => code,
        }
    }
}

impl From<i64> for RpcErrorCode {
    fn from(code: i64) -> Self {
        match code {
            -32700 => Self::ParseError,
            -32600 => Self::InvalidRequest,
            -32601 => Self::MethodNotFound,
            -32602 => Self::InvalidParams,
            -32603 => Self::InternalError,
            -32000 => Self::ServerError,
            other => Self::Other(other),
        }
    }
}

impl From<RpcErrorCode> for i64 {
    fn from(code: RpcErrorCode) -> Self {
        code.code()
    }
}

impl fmt::Display for RpcErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Error object returned by the daemon in place of a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("{message} (code {code})")]
pub struct RpcError {
    pub code: RpcErrorCode,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl RpcError {
    /// A generic `-32000` server error, used when the daemon's reply cannot
    /// be decoded into a proper error object.
    pub fn server(message: impl Into<String>) -> Self {
        Self {
            code: RpcErrorCode::ServerError,
            message: message.into(),
            data: None,
        }
    }

    /// Classify the message against the daemon's known wallet errors.
    pub fn wallet_error(&self) -> Option<WalletError> {
        WalletError::from_message(&self.message)
    }
}

// ==============================================================================
// Wallet Errors
// ==============================================================================

/// Error messages the wallet daemon is known to report through the
/// JSON-RPC `message` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum WalletError {
    #[error("Wallet is not fully loaded yet.")]
    WalletNotFullyLoaded,
    #[error("Index file inconsistency detected.")]
    IndexFileInconsistency,
    #[error("Negative issuer balance")]
    NegativeIssuerBalance,
    #[error("Negative balance")]
    NegativeBalance,
    #[error("Incorrect password.")]
    IncorrectPassword,
    #[error("Payment could not be canceled because it is not pending.")]
    PaymentNotPending,
    #[error("Payment was not found.")]
    PaymentNotFound,
    #[error("Not enough coins registered to participate in the coinjoin.")]
    NotEnoughCoins,
    #[error("No secret in the watch-only mode.")]
    NoSecretInWatchOnlyMode,
    #[error("Output wallet name is invalid.")]
    OutputWalletNameInvalid,
    #[error("This RPC method is special and the handling method should not be called.")]
    RpcMethodSpecial,
    #[error("The coinjoin result type was not handled.")]
    CoinJoinResultTypeNotHandled,
    #[error("Blame rounds were not successful.")]
    BlameRoundsNotSuccessful,
    #[error("Not possible to subtract the fee.")]
    NotPossibleToSubtractFee,
    #[error("The original PSBT should not be finalized.")]
    OriginalPsbtFinalized,
    #[error("Transaction is not cancellable.")]
    TransactionNotCancellable,
    #[error("Transaction is not speedupable.")]
    TransactionNotSpeedupable,
    #[error("Cannot get fee estimations.")]
    CannotGetFeeEstimations,
}

impl WalletError {
    pub const ALL: [WalletError; 18] = [
        Self::WalletNotFullyLoaded,
        Self::IndexFileInconsistency,
        Self::NegativeIssuerBalance,
        Self::NegativeBalance,
        Self::IncorrectPassword,
        Self::PaymentNotPending,
        Self::PaymentNotFound,
        Self::NotEnoughCoins,
        Self::NoSecretInWatchOnlyMode,
        Self::OutputWalletNameInvalid,
        Self::RpcMethodSpecial,
        Self::CoinJoinResultTypeNotHandled,
        Self::BlameRoundsNotSuccessful,
        Self::NotPossibleToSubtractFee,
        Self::OriginalPsbtFinalized,
        Self::TransactionNotCancellable,
        Self::TransactionNotSpeedupable,
        Self::CannotGetFeeEstimations,
    ];

    pub fn from_message(message: &str) -> Option<Self> {
        let message = message.trim();
        Self::ALL
            .into_iter()
            .find(|known| known.to_string() == message)
    }
}
