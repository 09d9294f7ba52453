pub mod config;
pub mod error;
pub mod rpc;
pub mod types;

#[cfg(test)]
mod test_util;

pub use config::{Config, Endpoint, DEFAULT_PORT};
pub use error::{ConfigError, RpcError, RpcErrorCode, WalletError, WasabiError};
pub use rpc::{Method, WasabiClient, WasabiRpc};
