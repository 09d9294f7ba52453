//! Connection settings for a wallet daemon and their validation.
//!
//! [`Config`] is what callers fill in; [`Config::validate`] turns it into an
//! immutable [`Endpoint`] holding the resolved port, base URL, and the full
//! header set sent with every request.

use std::collections::HashMap;
use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::Url;

use crate::error::ConfigError;

/// Port the wallet daemon listens on when none is configured.
pub const DEFAULT_PORT: u16 = 37128;

#[derive(Clone, Default)]
pub struct Config {
    /// Daemon host without scheme or port.
    pub host: String,
    /// Daemon port; `0` selects [`DEFAULT_PORT`].
    pub port: u16,
    /// Extra headers sent with every request. Must not contain
    /// `Authorization`; use the RPC credentials instead.
    pub custom_headers: HashMap<String, String>,
    pub rpc_user: Option<String>,
    pub rpc_password: Option<String>,
}

impl Config {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers.insert(name.into(), value.into());
        self
    }

    pub fn with_credentials(
        mut self,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.rpc_user = Some(user.into());
        self.rpc_password = Some(password.into());
        self
    }

    pub fn validate(&self) -> Result<Endpoint, ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        if self.host.contains(['/', ':']) {
            return Err(ConfigError::HostSeparator);
        }

        let port = if self.port == 0 {
            DEFAULT_PORT
        } else {
            self.port
        };
        let base_url = Url::parse(&format!("http://{}:{port}/", self.host)).map_err(|e| {
            ConfigError::InvalidHost {
                host: self.host.clone(),
                message: e.to_string(),
            }
        })?;

        let mut headers = custom_headers(&self.custom_headers)?;
        if let Some(value) = basic_auth(self.rpc_user.as_deref(), self.rpc_password.as_deref())? {
            headers.insert(AUTHORIZATION, value);
        }

        Ok(Endpoint {
            host: self.host.clone(),
            port,
            base_url,
            headers,
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("custom_headers", &self.custom_headers.keys())
            .field("rpc_user", &self.rpc_user)
            .field("rpc_password", &self.rpc_password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn custom_headers(raw: &HashMap<String, String>) -> Result<HeaderMap, ConfigError> {
    let mut headers = HeaderMap::with_capacity(raw.len() + 1);
    for (name, value) in raw {
        if name.is_empty() {
            return Err(ConfigError::EmptyHeaderName);
        }
        if value.is_empty() {
            return Err(ConfigError::EmptyHeaderValue(name.clone()));
        }

        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| ConfigError::InvalidHeader {
                name: name.clone(),
                message: e.to_string(),
            })?;
        // HeaderName is lowercased, so this also catches `authorization`.
        if header_name == AUTHORIZATION {
            return Err(ConfigError::ReservedHeader);
        }
        let header_value = HeaderValue::from_str(value).map_err(|e| ConfigError::InvalidHeader {
            name: name.clone(),
            message: e.to_string(),
        })?;
        headers.insert(header_name, header_value);
    }
    Ok(headers)
}

/// Empty strings count as unset, so `Some("")` behaves like `None`.
fn basic_auth(user: Option<&str>, pass: Option<&str>) -> Result<Option<HeaderValue>, ConfigError> {
    let user = user.filter(|u| !u.is_empty());
    let pass = pass.filter(|p| !p.is_empty());

    let (user, pass) = match (user, pass) {
        (Some(u), Some(p)) => (u, p),
        (Some(_), None) => return Err(ConfigError::MissingPassword),
        (None, Some(_)) => return Err(ConfigError::MissingUser),
        (None, None) => return Ok(None),
    };

    let encoded = STANDARD.encode(format!("{user}:{pass}"));
    let mut value =
        HeaderValue::from_str(&format!("Basic {encoded}")).map_err(|e| ConfigError::InvalidHeader {
            name: AUTHORIZATION.to_string(),
            message: e.to_string(),
        })?;
    value.set_sensitive(true);
    Ok(Some(value))
}

/// Validated, immutable connection target.
#[derive(Debug, Clone)]
pub struct Endpoint {
    host: String,
    port: u16,
    base_url: Url,
    headers: HeaderMap,
}

impl Endpoint {
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// URL for a call scoped to `wallet`; an empty name targets the root path.
    pub fn url_for(&self, wallet: &str) -> Url {
        let mut url = self.base_url.clone();
        if !wallet.is_empty() {
            if let Ok(mut segments) = url.path_segments_mut() {
                segments.pop_if_empty().push(wallet);
            }
        }
        url
    }
}
