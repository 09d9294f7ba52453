//! Wallet daemon RPC abstraction layer.
//!
//! Defines the [`WasabiRpc`] trait and provides an HTTP JSON-RPC
//! implementation ([`WasabiClient`]) over a pluggable [`Transport`].

mod http_adapter;
mod method;
#[cfg(test)]
pub mod mock;

pub use http_adapter::{HttpResponse, ReqwestTransport, Transport, WasabiClient};
pub use method::Method;

use async_trait::async_trait;
use bitcoin::Txid;

use crate::error::WasabiError;
use crate::types::{
    CoinJoinPayment, FeeRates, GeneratedKey, HistoryEntry, NewAddress, SendResult, Status,
    TransactionRequest, WalletCoin, WalletInfo, WalletSummary,
};

/// The wallet daemon's RPC surface.
///
/// Methods with no payload return `Ok(())` when the daemon answers with a
/// `null` result; every other method treats a `null` result as
/// [`WasabiError::NullResult`].
#[async_trait]
pub trait WasabiRpc: Send + Sync {
    /// Probe whether the daemon accepts TCP connections, without issuing
    /// a JSON-RPC call.
    async fn is_wallet_up(&self) -> bool;

    /// Daemon status and synchronization progress.
    async fn get_status(&self) -> Result<Status, WasabiError>;

    /// Create a wallet; returns the space-separated recovery words.
    async fn create_wallet(&self, wallet: &str, password: &str) -> Result<String, WasabiError>;

    /// Load a wallet. Required before a wallet is accessed for the first time.
    async fn load_wallet(&self, wallet: &str) -> Result<(), WasabiError>;

    /// Recover a wallet named `wallet` from its recovery words.
    async fn recover_wallet(
        &self,
        wallet: &str,
        mnemonic: &str,
        password: &str,
    ) -> Result<(), WasabiError>;

    async fn list_wallets(&self) -> Result<Vec<WalletSummary>, WasabiError>;

    /// Spent and unspent coins, confirmed or not.
    async fn list_coins(&self, wallet: &str) -> Result<Vec<WalletCoin>, WasabiError>;

    async fn list_unspent_coins(&self, wallet: &str) -> Result<Vec<WalletCoin>, WasabiError>;

    async fn get_wallet_info(&self, wallet: &str) -> Result<WalletInfo, WasabiError>;

    async fn get_new_address(&self, wallet: &str, label: &str)
        -> Result<NewAddress, WasabiError>;

    /// Build and broadcast a transaction.
    async fn send(
        &self,
        wallet: &str,
        request: &TransactionRequest,
    ) -> Result<SendResult, WasabiError>;

    /// Build a transaction without broadcasting it; returns the raw hex.
    async fn build(&self, wallet: &str, request: &TransactionRequest)
        -> Result<String, WasabiError>;

    /// Like [`build`](Self::build) but skips the fee sanity checks and may
    /// spend unconfirmed coins.
    async fn build_unsafe_transaction(
        &self,
        wallet: &str,
        request: &TransactionRequest,
    ) -> Result<String, WasabiError>;

    /// Broadcast a raw transaction hex.
    async fn broadcast(&self, wallet: &str, tx_hex: &str) -> Result<Txid, WasabiError>;

    async fn get_history(&self, wallet: &str) -> Result<Vec<HistoryEntry>, WasabiError>;

    async fn list_keys(&self, wallet: &str) -> Result<Vec<GeneratedKey>, WasabiError>;

    async fn start_coinjoin(
        &self,
        wallet: &str,
        password: &str,
        stop_when_all_mixed: bool,
        override_pleb_stop: bool,
    ) -> Result<(), WasabiError>;

    /// Coinjoin all funds of `wallet` into `output_wallet`.
    async fn start_coinjoin_sweep(
        &self,
        wallet: &str,
        password: &str,
        output_wallet: &str,
    ) -> Result<(), WasabiError>;

    async fn stop_coinjoin(&self, wallet: &str) -> Result<(), WasabiError>;

    /// Stop the daemon process.
    async fn stop(&self) -> Result<(), WasabiError>;

    async fn get_fee_rates(&self) -> Result<FeeRates, WasabiError>;

    /// Exclude a coin from coinjoins, or include it again when `exclude`
    /// is false.
    async fn exclude_from_coinjoin(
        &self,
        wallet: &str,
        txid: &Txid,
        index: u32,
        exclude: bool,
    ) -> Result<(), WasabiError>;

    /// Queue a payment to be made from a coinjoin; returns the payment id.
    async fn pay_in_coinjoin(
        &self,
        wallet: &str,
        address: &str,
        amount: u64,
        password: &str,
    ) -> Result<String, WasabiError>;

    async fn list_payments_in_coinjoin(
        &self,
        wallet: &str,
    ) -> Result<Vec<CoinJoinPayment>, WasabiError>;

    async fn cancel_payment_in_coinjoin(
        &self,
        wallet: &str,
        payment_id: &str,
    ) -> Result<(), WasabiError>;

    /// Build a transaction that double-spends `txid` back to the wallet.
    /// Returns raw hex; nothing is broadcast.
    async fn cancel_transaction(
        &self,
        wallet: &str,
        txid: &Txid,
        password: &str,
    ) -> Result<String, WasabiError>;

    /// Build a fee-bumping replacement for `txid`. Returns raw hex; nothing
    /// is broadcast.
    async fn speed_up_transaction(
        &self,
        wallet: &str,
        txid: &Txid,
        password: &str,
    ) -> Result<String, WasabiError>;
}
