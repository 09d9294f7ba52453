//! Request and response models for the wallet daemon's RPC methods.
//!
//! Field names follow the daemon's camelCase JSON. Amounts are satoshis.
//! Status-like strings decode into enums that keep unknown values in an
//! `Other` variant, so a newer daemon does not break decoding.

use std::collections::BTreeMap;
use std::fmt;

use bitcoin::{BlockHash, Txid};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::OffsetDateTime;

// ==============================================================================
// String Enums
// ==============================================================================

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => $text:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
            Other(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $text,)+
                    Self::Other(other) => other,
                }
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                match value.as_str() {
                    $($text => Self::$variant,)+
                    _ => Self::Other(value),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                String::deserialize(deserializer).map(Self::from)
            }
        }
    };
}

string_enum! {
    /// Bitcoin network the daemon runs on.
    pub enum BitcoinNetwork {
        Main => "Main",
        TestNet => "TestNet",
        RegTest => "RegTest",
    }
}

string_enum! {
    pub enum TorStatus {
        NotRunning => "Not running",
        Running => "Running",
        TurnedOff => "Turned off",
    }
}

string_enum! {
    /// Connection state between the daemon and its coordinator backend.
    pub enum BackendStatus {
        Connected => "Connected",
        Disconnected => "Disconnected",
    }
}

string_enum! {
    pub enum WalletState {
        Uninitialized => "Uninitialized",
        WaitingForInit => "WaitingForInit",
        Initialized => "Initialized",
        Starting => "Starting",
        Started => "Started",
        Stopping => "Stopping",
        Stopped => "Stopped",
    }
}

string_enum! {
    pub enum CoinJoinStatus {
        Idle => "Idle",
        InSchedule => "In schedule",
        InProgress => "In progress",
        InCriticalPhase => "In critical phase",
    }
}

string_enum! {
    pub enum PaymentStatus {
        Pending => "Pending",
        InProgress => "In progress",
        Finished => "Finished",
    }
}

// ==============================================================================
// Daemon Status
// ==============================================================================

/// Result of `getstatus`.
///
/// Only the tor and backend status and the best height are required; the
/// rest may be omitted by the daemon and decode to empty values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub tor_status: TorStatus,
    pub backend_status: BackendStatus,
    /// The daemon reports the height as a decimal string.
    #[serde(with = "u64_string")]
    pub best_blockchain_height: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_blockchain_hash: Option<BlockHash>,
    #[serde(default)]
    pub filters_count: u64,
    #[serde(default)]
    pub filters_left: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<BitcoinNetwork>,
    #[serde(default)]
    pub exchange_rate: f64,
    #[serde(default)]
    pub peers: Vec<BitcoinPeer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BitcoinPeer {
    pub is_connected: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub last_seen: OffsetDateTime,
    pub endpoint: String,
    pub user_agent: String,
}

// ==============================================================================
// Wallets
// ==============================================================================

/// Entry of `listwallets`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletSummary {
    #[serde(rename = "walletName")]
    pub name: String,
}

/// Result of `getwalletinfo`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletInfo {
    pub wallet_name: String,
    #[serde(default)]
    pub wallet_file: String,
    pub state: WalletState,
    #[serde(default)]
    pub master_key_fingerprint: String,
    #[serde(default)]
    pub anon_score_target: u32,
    #[serde(default)]
    pub is_watch_only: bool,
    #[serde(default)]
    pub is_hardware_wallet: bool,
    #[serde(rename = "isAutoCoinjoin", default)]
    pub is_auto_coinjoin: bool,
    #[serde(default)]
    pub is_red_coin_isolation: bool,
    #[serde(default)]
    pub accounts: Vec<WalletAccount>,
    /// Only reported once the wallet is fully loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<u64>,
    #[serde(
        rename = "coinjoinStatus",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub coinjoin_status: Option<CoinJoinStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletAccount {
    pub name: String,
    pub public_key: String,
    pub key_path: String,
}

// ==============================================================================
// Coins, Addresses, Keys
// ==============================================================================

/// Entry of `listcoins` / `listunspentcoins`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletCoin {
    pub txid: Txid,
    pub index: u32,
    pub amount: u64,
    #[serde(default)]
    pub anonymity_score: f64,
    #[serde(default)]
    pub confirmed: bool,
    #[serde(default)]
    pub confirmations: u32,
    #[serde(default)]
    pub key_path: String,
    #[serde(default)]
    pub address: String,
    /// Spending transaction, `None` while unspent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spent_by: Option<Txid>,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "excludedFromCoinjoin", default)]
    pub excluded_from_coinjoin: bool,
}

/// Result of `getnewaddress`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAddress {
    pub address: String,
    #[serde(default)]
    pub key_path: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub public_key: String,
    #[serde(default)]
    pub script_pub_key: String,
}

/// Entry of `listkeys`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedKey {
    pub full_key_path: String,
    #[serde(default)]
    pub internal: bool,
    #[serde(default)]
    pub key_state: i32,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub script_pub_key: String,
    #[serde(rename = "pubkey", default)]
    pub pub_key: String,
    #[serde(default)]
    pub pub_key_hash: String,
    #[serde(default)]
    pub address: String,
}

// ==============================================================================
// Transactions
// ==============================================================================

/// Destination of a built transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    #[serde(rename = "sendto")]
    pub send_to: String,
    pub amount: u64,
    #[serde(default)]
    pub label: String,
}

/// Outpoint selecting a wallet coin to spend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoinRef {
    #[serde(rename = "transactionid")]
    pub txid: Txid,
    pub index: u32,
}

/// Named parameters shared by `send`, `build`, and `buildunsafetransaction`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub payments: Vec<Payment>,
    pub coins: Vec<CoinRef>,
    /// Confirmation target in blocks.
    pub fee_target: u32,
    pub password: String,
}

/// Result of `send`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendResult {
    pub txid: Txid,
    /// Raw transaction hex.
    pub tx: String,
}

/// Entry of `gethistory`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(with = "time::serde::rfc3339")]
    pub datetime: OffsetDateTime,
    /// Zero while unconfirmed.
    #[serde(default)]
    pub height: i64,
    /// Signed balance change in satoshis.
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub label: String,
    pub tx: Txid,
    #[serde(rename = "islikelycoinjoin", default)]
    pub is_likely_coinjoin: bool,
}

/// Result of `getfeerates`: confirmation target in blocks to sat/vB.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeeRates(pub BTreeMap<u32, u64>);

impl FeeRates {
    pub fn for_target(&self, blocks: u32) -> Option<u64> {
        self.0.get(&blocks).copied()
    }
}

// ==============================================================================
// Payments In Coinjoin
// ==============================================================================

/// Entry of `listpaymentsincoinjoin`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinJoinPayment {
    /// Payment id (UUID), accepted by `cancelpaymentincoinjoin`.
    pub id: String,
    pub amount: u64,
    /// ScriptPubKey hex of the destination.
    pub destination: String,
    #[serde(default)]
    pub state: Vec<PaymentState>,
    pub address: String,
}

impl CoinJoinPayment {
    /// Most recent status in the payment's state history.
    pub fn current_status(&self) -> Option<&PaymentStatus> {
        self.state.last().map(|s| &s.status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentState {
    pub status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txid: Option<Txid>,
}

// ==============================================================================
// Serde Helpers
// ==============================================================================

mod u64_string {
    use serde::de::{self, Deserializer, Visitor};
    use serde::Serializer;
    use std::fmt;

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        struct U64StringVisitor;

        impl Visitor<'_> for U64StringVisitor {
            type Value = u64;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an unsigned integer encoded as a string")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<u64, E> {
                v.trim().parse().map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<u64, E> {
                Ok(v)
            }
        }

        deserializer.deserialize_any(U64StringVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{status_json, BLOCK_HASH, TXID_A};

    #[test]
    fn status_parses_string_encoded_height() {
        let status: Status = serde_json::from_value(status_json()).expect("status must decode");
        assert_eq!(status.best_blockchain_height, 800_000);
        assert_eq!(status.tor_status, TorStatus::Running);
        assert_eq!(status.backend_status, BackendStatus::Connected);
        assert_eq!(status.network, Some(BitcoinNetwork::Main));
        assert_eq!(
            status.best_blockchain_hash.map(|h| h.to_string()).as_deref(),
            Some(BLOCK_HASH)
        );
        assert_eq!(status.peers.len(), 1);
        assert!(status.peers[0].is_connected);

        let back = serde_json::to_value(&status).expect("status must encode");
        assert_eq!(back["bestBlockchainHeight"], "800000");
    }

    #[test]
    fn status_rejects_non_numeric_height() {
        let mut raw = status_json();
        raw["bestBlockchainHeight"] = serde_json::json!("tip");
        assert!(serde_json::from_value::<Status>(raw).is_err());
    }

    #[test]
    fn status_with_only_required_fields_decodes() {
        let status: Status = serde_json::from_str(
            r#"{"torStatus":"Running","backendStatus":"Connected","bestBlockchainHeight":"800000"}"#,
        )
        .expect("sparse status must decode");
        assert_eq!(status.best_blockchain_height, 800_000);
        assert_eq!(status.best_blockchain_hash, None);
        assert_eq!(status.network, None);
        assert_eq!(status.filters_left, 0);
        assert!(status.peers.is_empty());

        let missing_height = r#"{"torStatus":"Running","backendStatus":"Connected"}"#;
        assert!(serde_json::from_str::<Status>(missing_height).is_err());
    }

    #[test]
    fn sparse_wallet_records_decode_with_defaults() {
        let info: WalletInfo = serde_json::from_value(serde_json::json!({
            "walletName": "alice",
            "state": "Starting"
        }))
        .expect("sparse wallet info must decode");
        assert_eq!(info.state, WalletState::Starting);
        assert!(!info.is_watch_only);
        assert!(info.balance.is_none());

        let coin: WalletCoin = serde_json::from_value(serde_json::json!({
            "txid": TXID_A,
            "index": 0,
            "amount": 1_000
        }))
        .expect("sparse coin must decode");
        assert_eq!(coin.confirmations, 0);
        assert_eq!(coin.address, "");

        let key: GeneratedKey = serde_json::from_value(serde_json::json!({
            "fullKeyPath": "84'/0'/0'/0/0"
        }))
        .expect("sparse key must decode");
        assert!(!key.internal);

        let entry: HistoryEntry = serde_json::from_value(serde_json::json!({
            "datetime": "2024-03-01T10:15:00+00:00",
            "tx": TXID_A
        }))
        .expect("sparse history entry must decode");
        assert_eq!(entry.height, 0);
        assert_eq!(entry.amount, 0);
    }

    #[test]
    fn unknown_enum_values_are_preserved() {
        let status: TorStatus = serde_json::from_str("\"Starting up\"").expect("must decode");
        assert_eq!(status, TorStatus::Other("Starting up".into()));
        assert_eq!(status.to_string(), "Starting up");

        let status: CoinJoinStatus =
            serde_json::from_str("\"In critical phase\"").expect("must decode");
        assert_eq!(status, CoinJoinStatus::InCriticalPhase);
    }

    #[test]
    fn wallet_coin_with_and_without_spender() {
        let unspent: WalletCoin = serde_json::from_value(serde_json::json!({
            "txid": TXID_A,
            "index": 1,
            "amount": 25_000,
            "anonymityScore": 1.0,
            "confirmed": true,
            "confirmations": 6,
            "keyPath": "84'/0'/0'/0/3",
            "address": "bc1qexample",
            "spentBy": null,
            "excludedFromCoinjoin": true
        }))
        .expect("coin must decode");
        assert!(unspent.spent_by.is_none());
        assert!(unspent.excluded_from_coinjoin);
        assert_eq!(unspent.label, "");

        let spent: WalletCoin = serde_json::from_value(serde_json::json!({
            "txid": TXID_A,
            "index": 0,
            "amount": 1,
            "anonymityScore": 5.5,
            "confirmed": false,
            "confirmations": 0,
            "keyPath": "84'/0'/0'/1/0",
            "address": "bc1qother",
            "spentBy": TXID_A,
            "label": "change"
        }))
        .expect("spent coin must decode");
        assert_eq!(spent.spent_by, Some(unspent.txid));
    }

    #[test]
    fn transaction_request_uses_named_params() {
        let request = TransactionRequest {
            payments: vec![Payment {
                send_to: "bc1qdest".into(),
                amount: 10_000,
                label: "rent".into(),
            }],
            coins: vec![CoinRef {
                txid: TXID_A.parse().expect("static txid must parse"),
                index: 2,
            }],
            fee_target: 6,
            password: "pw".into(),
        };

        let value = serde_json::to_value(&request).expect("request must encode");
        assert_eq!(
            value,
            serde_json::json!({
                "payments": [{"sendto": "bc1qdest", "amount": 10_000, "label": "rent"}],
                "coins": [{"transactionid": TXID_A, "index": 2}],
                "feeTarget": 6,
                "password": "pw"
            })
        );
    }

    #[test]
    fn fee_rates_use_block_targets_as_keys() {
        let rates: FeeRates =
            serde_json::from_str(r#"{"2":45,"6":20,"144":3}"#).expect("fee rates must decode");
        assert_eq!(rates.for_target(6), Some(20));
        assert_eq!(rates.for_target(3), None);
        assert_eq!(rates.0.keys().copied().collect::<Vec<_>>(), vec![2, 6, 144]);
    }

    #[test]
    fn history_entry_parses_timestamp_and_negative_amount() {
        let entry: HistoryEntry = serde_json::from_value(serde_json::json!({
            "datetime": "2024-03-01T10:15:00+00:00",
            "height": 830_000,
            "amount": -15_000,
            "label": "",
            "tx": TXID_A,
            "islikelycoinjoin": false
        }))
        .expect("history entry must decode");
        assert_eq!(entry.amount, -15_000);
        assert_eq!(entry.datetime.year(), 2024);
    }

    #[test]
    fn payment_current_status_is_last_state() {
        let payment: CoinJoinPayment = serde_json::from_value(serde_json::json!({
            "id": "0d3f1c9e-7c1b-4c4e-9a53-5c1b2d5f9f10",
            "amount": 50_000,
            "destination": "0014abcd",
            "state": [{"status": "Pending"}, {"status": "In progress", "round": 7}],
            "address": "bc1qpay"
        }))
        .expect("payment must decode");
        assert_eq!(payment.current_status(), Some(&PaymentStatus::InProgress));
        assert_eq!(payment.state[1].round, Some(7));
    }
}
