// # HTTP Transport
//
// This crate provides the reqwest-based [`Transport`] used by the agent to
// reach provider update endpoints.
//
// ## Request lifecycle
//
// 1. **Open**: the request is assembled from the URL, user agent, headers
//    and connection preference. A failure here is reported as
//    `TransportError::Open`.
// 2. **Begin**: the request is executed. Connection, TLS and timeout
//    failures are reported as `TransportError::Begin`.
// 3. The status code is returned and the response is dropped unread.
//
// ## TLS
//
// Provider endpoints are contacted without certificate verification unless
// the request asks for it. Two clients are built up front, one per mode, so
// connections are pooled across entries and cycles.
//
// ## Security
//
// - Request URLs carry tokens, so errors are rendered without the URL
// - `Authorization` header values are never logged

use async_trait::async_trait;
use ddns_core::traits::{Transport, TransportError, UpdateRequest};
use ddns_core::{Error, Result};
use reqwest::header::{CONNECTION, HeaderValue, USER_AGENT};
use std::fmt;
use std::time::Duration;
use tracing::{debug, trace};

/// Default timeout for a single update request
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// reqwest-backed transport
pub struct HttpTransport {
    /// Client that verifies server certificates
    verifying: reqwest::Client,

    /// Client that accepts any server certificate
    insecure: reqwest::Client,
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport").finish_non_exhaustive()
    }
}

impl HttpTransport {
    /// Create a transport with the default timeout
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if the TLS backend cannot be initialized.
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_HTTP_TIMEOUT)
    }

    /// Create a transport with a custom per-request timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let verifying = build_client(timeout, true)?;
        let insecure = build_client(timeout, false)?;
        debug!("HTTP transport ready (timeout {:?})", timeout);

        Ok(Self {
            verifying,
            insecure,
        })
    }

    fn client_for(&self, request: &UpdateRequest) -> &reqwest::Client {
        if request.verify_tls {
            &self.verifying
        } else {
            &self.insecure
        }
    }

    /// Assemble the request without sending it
    fn open(&self, request: &UpdateRequest) -> std::result::Result<reqwest::Request, TransportError> {
        let mut builder = self
            .client_for(request)
            .get(request.url.as_str())
            .header(USER_AGENT, request.user_agent.as_str());

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if !request.keep_alive {
            builder = builder.header(CONNECTION, HeaderValue::from_static("close"));
        }

        builder
            .build()
            .map_err(|e| TransportError::Open(error_code(e)))
    }
}

fn build_client(timeout: Duration, verify_tls: bool) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .danger_accept_invalid_certs(!verify_tls)
        .build()
        .map_err(|e| Error::transport(format!("Failed to build HTTP client: {}", e)))
}

/// Short failure description with the URL stripped
fn error_code(err: reqwest::Error) -> String {
    if err.is_timeout() {
        return "timeout".to_string();
    }
    if err.is_connect() {
        return "connect".to_string();
    }
    err.without_url().to_string()
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, request: &UpdateRequest) -> std::result::Result<u16, TransportError> {
        let prepared = self.open(request)?;
        trace!("GET {}", prepared.url().path());

        let response = self
            .client_for(request)
            .execute(prepared)
            .await
            .map_err(|e| TransportError::Begin(error_code(e)))?;

        let status = response.status().as_u16();
        debug!("{} answered {}", response.url().host_str().unwrap_or("?"), status);
        Ok(status)
    }
}
