use std::fmt;

/// Remote methods exposed by the wallet daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    GetStatus,
    CreateWallet,
    LoadWallet,
    ListCoins,
    ListUnspentCoins,
    GetWalletInfo,
    GetNewAddress,
    Send,
    Build,
    Broadcast,
    GetHistory,
    ListKeys,
    StartCoinJoin,
    StartCoinJoinSweep,
    StopCoinJoin,
    Stop,
    GetFeeRates,
    ListWallets,
    ExcludeFromCoinJoin,
    RecoverWallet,
    BuildUnsafeTransaction,
    PayInCoinJoin,
    ListPaymentsInCoinJoin,
    CancelPaymentInCoinJoin,
    CancelTransaction,
    SpeedUpTransaction,
}

impl Method {
    pub const ALL: [Method; 26] = [
        Self::GetStatus,
        Self::CreateWallet,
        Self::LoadWallet,
        Self::ListCoins,
        Self::ListUnspentCoins,
        Self::GetWalletInfo,
        Self::GetNewAddress,
        Self::Send,
        Self::Build,
        Self::Broadcast,
        Self::GetHistory,
        Self::ListKeys,
        Self::StartCoinJoin,
        Self::StartCoinJoinSweep,
        Self::StopCoinJoin,
        Self::Stop,
        Self::GetFeeRates,
        Self::ListWallets,
        Self::ExcludeFromCoinJoin,
        Self::RecoverWallet,
        Self::BuildUnsafeTransaction,
        Self::PayInCoinJoin,
        Self::ListPaymentsInCoinJoin,
        Self::CancelPaymentInCoinJoin,
        Self::CancelTransaction,
        Self::SpeedUpTransaction,
    ];

    /// Wire name used in the request's `method` field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GetStatus => "getstatus",
            Self::CreateWallet => "createwallet",
            Self::LoadWallet => "loadwallet",
            Self::ListCoins => "listcoins",
            Self::ListUnspentCoins => "listunspentcoins",
            Self::GetWalletInfo => "getwalletinfo",
            Self::GetNewAddress => "getnewaddress",
            Self::Send => "send",
            Self::Build => "build",
            Self::Broadcast => "broadcast",
            Self::GetHistory => "gethistory",
            Self::ListKeys => "listkeys",
            Self::StartCoinJoin => "startcoinjoin",
            Self::StartCoinJoinSweep => "startcoinjoinsweep",
            Self::StopCoinJoin => "stopcoinjoin",
            Self::Stop => "stop",
            Self::GetFeeRates => "getfeerates",
            Self::ListWallets => "listwallets",
            Self::ExcludeFromCoinJoin => "excludefromcoinjoin",
            Self::RecoverWallet => "recoverwallet",
            Self::BuildUnsafeTransaction => "buildunsafetransaction",
            Self::PayInCoinJoin => "payincoinjoin",
            Self::ListPaymentsInCoinJoin => "listpaymentsincoinjoin",
            Self::CancelPaymentInCoinJoin => "cancelpaymentincoinjoin",
            Self::CancelTransaction => "canceltransaction",
            Self::SpeedUpTransaction => "speeduptransaction",
        }
    }

    /// Whether the call is addressed to a wallet via the URL path. Wallet
    /// lifecycle and daemon-wide methods post to the root path instead.
    pub fn is_wallet_scoped(self) -> bool {
        !matches!(
            self,
            Self::GetStatus
                | Self::CreateWallet
                | Self::LoadWallet
                | Self::RecoverWallet
                | Self::ListWallets
                | Self::Stop
                | Self::GetFeeRates
        )
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
