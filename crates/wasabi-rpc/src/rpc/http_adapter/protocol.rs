use rand::{CryptoRng, RngCore};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::error::{RpcError, WasabiError};

use super::super::Method;

#[derive(Serialize)]
pub(super) struct JsonRpcRequest<'a, P: ?Sized> {
    pub(super) jsonrpc: &'static str,
    pub(super) method: &'a str,
    pub(super) params: &'a P,
    pub(super) id: u64,
}

/// `result` and `error` both decode `null` as `None`. `error` stays raw so
/// an unrecognized error payload can be reported byte for byte.
#[derive(Deserialize)]
pub(super) struct JsonRpcResponse {
    pub(super) result: Option<serde_json::Value>,
    pub(super) error: Option<Box<RawValue>>,
}

pub(super) struct EncodedRequest {
    pub(super) id: u64,
    pub(super) body: Vec<u8>,
}

/// Serialize a request envelope with a fresh random id.
pub(super) fn encode_request<P, R>(
    rng: &mut R,
    method: Method,
    params: &P,
) -> Result<EncodedRequest, WasabiError>
where
    P: Serialize + ?Sized,
    R: RngCore + CryptoRng,
{
    let id = request_id(rng)?;
    let request = JsonRpcRequest {
        jsonrpc: "2.0",
        method: method.as_str(),
        params,
        id,
    };
    let body = serde_json::to_vec(&request).map_err(WasabiError::Encode)?;
    Ok(EncodedRequest { id, body })
}

/// Random id in `0..=i64::MAX`, so it stays non-negative for peers that
/// read ids as signed integers.
pub(super) fn request_id<R: RngCore + CryptoRng>(rng: &mut R) -> Result<u64, WasabiError> {
    let mut bytes = [0u8; 8];
    rng.try_fill_bytes(&mut bytes)
        .map_err(WasabiError::RequestId)?;
    Ok(u64::from_le_bytes(bytes) & i64::MAX as u64)
}

/// Decode a response body.
///
/// Returns `Ok(None)` for the null-result sentinel: no error and a missing
/// or `null` result. An error object always wins over a result.
pub(super) fn decode_response<T: DeserializeOwned>(body: &str) -> Result<Option<T>, WasabiError> {
    let decoded: JsonRpcResponse = serde_json::from_str(body).map_err(|e| {
        RpcError::server(format!("malformed JSON-RPC response: {e}; body={body}"))
    })?;

    if let Some(err) = decoded.error {
        return Err(parse_jsonrpc_error(&err).into());
    }

    match decoded.result {
        None => Ok(None),
        Some(result) => serde_json::from_value(result)
            .map(Some)
            .map_err(WasabiError::Decode),
    }
}

/// Parse a JSON-RPC error payload into an [`RpcError`].
///
/// Payloads that do not match `{"code", "message"?, "data"?}` become a
/// generic server error carrying the raw JSON text as its message.
pub(super) fn parse_jsonrpc_error(err: &RawValue) -> RpcError {
    match serde_json::from_str::<RpcError>(err.get()) {
        Ok(parsed) => parsed,
        Err(_) => RpcError::server(err.get()),
    }
}
