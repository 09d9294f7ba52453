//! JSON-RPC over HTTP client for the wallet daemon.
//!
//! Implements [`WasabiRpc`](super::WasabiRpc) by encoding typed calls into
//! JSON-RPC envelopes, posting them one at a time through a [`Transport`],
//! and decoding the reply envelope into typed results.

mod client;
mod connection;
mod protocol;
mod transport;

pub use client::WasabiClient;
pub use transport::{HttpResponse, ReqwestTransport, Transport};
