//! Shared fixtures for `wasabi-rpc` unit tests.

use serde_json::{json, Value};

pub const TXID_A: &str = "4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b";
pub const TXID_B: &str = "e3bf3d07d4b0375638d5f1db5255fe07ba2c4cb067cd81b84ee974b6585fb468";
pub const BLOCK_HASH: &str = "00000000000000000002a7c4c1e48d76c5a37902165a270156b7a8d72728a054";

/// A `getstatus` result as the daemon reports it.
pub fn status_json() -> Value {
    json!({
        "torStatus": "Running",
        "backendStatus": "Connected",
        "bestBlockchainHeight": "800000",
        "bestBlockchainHash": BLOCK_HASH,
        "filtersCount": 800_001,
        "filtersLeft": 0,
        "network": "Main",
        "exchangeRate": 64_000.5,
        "peers": [{
            "isConnected": true,
            "lastSeen": "2024-03-01T10:15:00+00:00",
            "endpoint": "203.0.113.7:8333",
            "userAgent": "/Satoshi:26.0.0/"
        }]
    })
}

/// Wrap `result` in a successful JSON-RPC response envelope.
pub fn ok_response(result: Value) -> String {
    json!({"jsonrpc": "2.0", "result": result, "id": 1}).to_string()
}

/// JSON-RPC response envelope carrying an error object.
pub fn error_response(code: i64, message: &str) -> String {
    json!({
        "jsonrpc": "2.0",
        "error": {"code": code, "message": message},
        "id": 1
    })
    .to_string()
}
