use async_trait::async_trait;
use bitcoin::Txid;
use rand::rngs::OsRng;
use reqwest::StatusCode;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, trace};

use crate::config::{Config, Endpoint};
use crate::error::WasabiError;
use crate::types::{
    CoinJoinPayment, FeeRates, GeneratedKey, HistoryEntry, NewAddress, SendResult, Status,
    TransactionRequest, WalletCoin, WalletInfo, WalletSummary,
};

use super::super::{Method, WasabiRpc};
use super::connection::probe_tcp;
use super::protocol::{decode_response, encode_request};
use super::transport::{ReqwestTransport, Transport};

/// Path segment for calls that are not addressed to a wallet.
const ROOT: &str = "";

/// Wallet daemon JSON-RPC client over HTTP.
///
/// At most one request is in flight per client; concurrent callers wait on
/// a FIFO-fair lock and are served in arrival order.
pub struct WasabiClient {
    endpoint: Endpoint,
    transport: Box<dyn Transport>,
    in_flight: Mutex<()>,
}

impl WasabiClient {
    /// Validate `config` and build a client on the default reqwest transport.
    pub fn new(config: &Config) -> Result<Self, WasabiError> {
        let endpoint = config.validate()?;
        Ok(Self::from_parts(endpoint, ReqwestTransport::new()?))
    }

    /// Validate `config` and build a client on a caller-supplied transport.
    pub fn with_transport(
        config: &Config,
        transport: impl Transport + 'static,
    ) -> Result<Self, WasabiError> {
        let endpoint = config.validate()?;
        Ok(Self::from_parts(endpoint, transport))
    }

    fn from_parts(endpoint: Endpoint, transport: impl Transport + 'static) -> Self {
        Self {
            endpoint,
            transport: Box::new(transport),
            in_flight: Mutex::new(()),
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Run one call through encode, transport, and decode.
    ///
    /// `Ok(None)` is the null-result sentinel; callers decide whether it is
    /// a success.
    async fn rpc_call<P, T>(
        &self,
        method: Method,
        wallet: &str,
        params: &P,
    ) -> Result<Option<T>, WasabiError>
    where
        P: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        debug_assert!(
            method.is_wallet_scoped() || wallet.is_empty(),
            "{method} must not be addressed to a wallet"
        );

        let request = encode_request(&mut OsRng, method, params)?;
        let url = self.endpoint.url_for(wallet);
        debug!(
            rpc.id = request.id,
            rpc.method = method.as_str(),
            rpc.wallet = wallet,
            "rpc call"
        );

        let response = {
            let _guard = self.in_flight.lock().await;
            self.transport
                .post(url, self.endpoint.headers(), request.body)
                .await
                .map_err(WasabiError::Transport)?
        };
        debug!(
            rpc.id = request.id,
            rpc.method = method.as_str(),
            status = %response.status,
            body_len = response.body.len(),
            "rpc response"
        );
        trace!(
            rpc.id = request.id,
            rpc.method = method.as_str(),
            body = %response.body,
            "rpc response body"
        );

        if response.status != StatusCode::OK {
            return Err(WasabiError::HttpStatus(response.status.as_u16()));
        }

        decode_response(&response.body)
    }

    /// Call a method that must return a payload.
    async fn call<P, T>(&self, method: Method, wallet: &str, params: &P) -> Result<T, WasabiError>
    where
        P: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        self.rpc_call(method, wallet, params)
            .await?
            .ok_or(WasabiError::NullResult)
    }

    /// Call a method that returns nothing. A `null` result is success and
    /// any payload is discarded.
    async fn call_unit<P>(
        &self,
        method: Method,
        wallet: &str,
        params: &P,
    ) -> Result<(), WasabiError>
    where
        P: Serialize + Sync + ?Sized,
    {
        self.rpc_call::<P, IgnoredAny>(method, wallet, params)
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl WasabiRpc for WasabiClient {
    async fn is_wallet_up(&self) -> bool {
        probe_tcp(self.endpoint.host(), self.endpoint.port()).await
    }

    async fn get_status(&self) -> Result<Status, WasabiError> {
        self.call(Method::GetStatus, ROOT, &()).await
    }

    async fn create_wallet(&self, wallet: &str, password: &str) -> Result<String, WasabiError> {
        self.call(Method::CreateWallet, ROOT, &(wallet, password))
            .await
    }

    async fn load_wallet(&self, wallet: &str) -> Result<(), WasabiError> {
        self.call_unit(Method::LoadWallet, ROOT, &(wallet,)).await
    }

    async fn recover_wallet(
        &self,
        wallet: &str,
        mnemonic: &str,
        password: &str,
    ) -> Result<(), WasabiError> {
        self.call_unit(Method::RecoverWallet, ROOT, &(wallet, mnemonic, password))
            .await
    }

    async fn list_wallets(&self) -> Result<Vec<WalletSummary>, WasabiError> {
        self.call(Method::ListWallets, ROOT, &()).await
    }

    async fn list_coins(&self, wallet: &str) -> Result<Vec<WalletCoin>, WasabiError> {
        self.call(Method::ListCoins, wallet, &()).await
    }

    async fn list_unspent_coins(&self, wallet: &str) -> Result<Vec<WalletCoin>, WasabiError> {
        self.call(Method::ListUnspentCoins, wallet, &()).await
    }

    async fn get_wallet_info(&self, wallet: &str) -> Result<WalletInfo, WasabiError> {
        self.call(Method::GetWalletInfo, wallet, &()).await
    }

    async fn get_new_address(
        &self,
        wallet: &str,
        label: &str,
    ) -> Result<NewAddress, WasabiError> {
        self.call(Method::GetNewAddress, wallet, &(label,)).await
    }

    async fn send(
        &self,
        wallet: &str,
        request: &TransactionRequest,
    ) -> Result<SendResult, WasabiError> {
        self.call(Method::Send, wallet, request).await
    }

    async fn build(
        &self,
        wallet: &str,
        request: &TransactionRequest,
    ) -> Result<String, WasabiError> {
        self.call(Method::Build, wallet, request).await
    }

    async fn build_unsafe_transaction(
        &self,
        wallet: &str,
        request: &TransactionRequest,
    ) -> Result<String, WasabiError> {
        self.call(Method::BuildUnsafeTransaction, wallet, request)
            .await
    }

    async fn broadcast(&self, wallet: &str, tx_hex: &str) -> Result<Txid, WasabiError> {
        self.call(Method::Broadcast, wallet, &(tx_hex,)).await
    }

    async fn get_history(&self, wallet: &str) -> Result<Vec<HistoryEntry>, WasabiError> {
        self.call(Method::GetHistory, wallet, &()).await
    }

    async fn list_keys(&self, wallet: &str) -> Result<Vec<GeneratedKey>, WasabiError> {
        self.call(Method::ListKeys, wallet, &()).await
    }

    async fn start_coinjoin(
        &self,
        wallet: &str,
        password: &str,
        stop_when_all_mixed: bool,
        override_pleb_stop: bool,
    ) -> Result<(), WasabiError> {
        self.call_unit(
            Method::StartCoinJoin,
            wallet,
            &(password, stop_when_all_mixed, override_pleb_stop),
        )
        .await
    }

    async fn start_coinjoin_sweep(
        &self,
        wallet: &str,
        password: &str,
        output_wallet: &str,
    ) -> Result<(), WasabiError> {
        self.call_unit(Method::StartCoinJoinSweep, wallet, &(password, output_wallet))
            .await
    }

    async fn stop_coinjoin(&self, wallet: &str) -> Result<(), WasabiError> {
        self.call_unit(Method::StopCoinJoin, wallet, &()).await
    }

    async fn stop(&self) -> Result<(), WasabiError> {
        self.call_unit(Method::Stop, ROOT, &()).await
    }

    async fn get_fee_rates(&self) -> Result<FeeRates, WasabiError> {
        self.call(Method::GetFeeRates, ROOT, &()).await
    }

    async fn exclude_from_coinjoin(
        &self,
        wallet: &str,
        txid: &Txid,
        index: u32,
        exclude: bool,
    ) -> Result<(), WasabiError> {
        self.call_unit(Method::ExcludeFromCoinJoin, wallet, &(txid, index, exclude))
            .await
    }

    async fn pay_in_coinjoin(
        &self,
        wallet: &str,
        address: &str,
        amount: u64,
        password: &str,
    ) -> Result<String, WasabiError> {
        self.call(Method::PayInCoinJoin, wallet, &(address, amount, password))
            .await
    }

    async fn list_payments_in_coinjoin(
        &self,
        wallet: &str,
    ) -> Result<Vec<CoinJoinPayment>, WasabiError> {
        self.call(Method::ListPaymentsInCoinJoin, wallet, &()).await
    }

    async fn cancel_payment_in_coinjoin(
        &self,
        wallet: &str,
        payment_id: &str,
    ) -> Result<(), WasabiError> {
        self.call_unit(Method::CancelPaymentInCoinJoin, wallet, &(payment_id,))
            .await
    }

    async fn cancel_transaction(
        &self,
        wallet: &str,
        txid: &Txid,
        password: &str,
    ) -> Result<String, WasabiError> {
        self.call(Method::CancelTransaction, wallet, &(txid, password))
            .await
    }

    async fn speed_up_transaction(
        &self,
        wallet: &str,
        txid: &Txid,
        password: &str,
    ) -> Result<String, WasabiError> {
        self.call(Method::SpeedUpTransaction, wallet, &(txid, password))
            .await
    }
}
