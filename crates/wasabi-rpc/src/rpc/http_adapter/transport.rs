use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{StatusCode, Url};

use crate::error::{BoxError, WasabiError};

/// Status and body of one HTTP exchange.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Sends one JSON-RPC request body as an HTTP POST.
///
/// The client serializes calls itself, so implementations never see two
/// concurrent `post` calls from the same client.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(
        &self,
        url: Url,
        headers: &HeaderMap,
        body: Vec<u8>,
    ) -> Result<HttpResponse, BoxError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn post(
        &self,
        url: Url,
        headers: &HeaderMap,
        body: Vec<u8>,
    ) -> Result<HttpResponse, BoxError> {
        (**self).post(url, headers, body).await
    }
}

/// Default [`Transport`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, WasabiError> {
        // No overall request timeout: building or sending a transaction can
        // legitimately keep the daemon busy for a long time.
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .tcp_nodelay(true)
            .build()
            .map_err(|e| WasabiError::Transport(Box::new(e)))?;
        Ok(Self { client })
    }

    /// Use a preconfigured client (proxies, TLS roots, timeouts).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn post(
        &self,
        url: Url,
        headers: &HeaderMap,
        body: Vec<u8>,
    ) -> Result<HttpResponse, BoxError> {
        let response = self
            .client
            .post(url)
            .headers(headers.clone())
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(body)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }
}
