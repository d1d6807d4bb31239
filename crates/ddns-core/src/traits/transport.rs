// # Update Transport Trait
//
// Defines the interface the update engine uses to dispatch one HTTP GET.
//
// ## Implementations
//
// - reqwest: `ddns-http` crate
//
// ## Resource Scope
//
// Each call to [`Transport::get`] owns exactly one request context for the
// duration of the call. Implementations must release it before returning,
// on success and on every failure path, so nothing accumulates across
// polling cycles.

use async_trait::async_trait;
use std::fmt;

/// A fully built update request
///
/// The engine decides every property of the request; the transport only
/// carries it out.
#[derive(Clone, PartialEq, Eq)]
pub struct UpdateRequest {
    /// Target URL, already substituted
    pub url: String,

    /// Extra request headers, in insertion order
    pub headers: Vec<(String, String)>,

    /// Value for the `User-Agent` header
    pub user_agent: String,

    /// Whether TLS certificates are verified
    pub verify_tls: bool,

    /// Whether the connection is kept alive for reuse
    pub keep_alive: bool,
}

impl UpdateRequest {
    /// Create a GET request with the agent defaults
    ///
    /// TLS verification is disabled and keep-alive is enabled.
    pub fn get(url: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
            user_agent: user_agent.into(),
            verify_tls: false,
            keep_alive: true,
        }
    }

    /// Add a named header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Look up a header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

// Custom Debug implementation that hides header values (they carry credentials)
impl fmt::Debug for UpdateRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header_names: Vec<&str> = self.headers.iter().map(|(k, _)| k.as_str()).collect();
        f.debug_struct("UpdateRequest")
            .field("url", &"<REDACTED>")
            .field("headers", &header_names)
            .field("user_agent", &self.user_agent)
            .field("verify_tls", &self.verify_tls)
            .field("keep_alive", &self.keep_alive)
            .finish()
    }
}

/// Per-request transport failure
///
/// The payload is an opaque code from the transport, only ever logged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The request context could not be created
    #[error("open err {0}")]
    Open(String),

    /// The request could not be sent or no response arrived
    #[error("begin err {0}")]
    Begin(String),
}

/// Trait for HTTP transport implementations
///
/// # Single-shot
///
/// One call, one request. No retries, no background tasks; a failed entry is
/// simply attempted again on the next cycle.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform the request and return the HTTP status code
    ///
    /// # Returns
    ///
    /// - `Ok(status)`: a response was received (any status)
    /// - `Err(TransportError::Open)`: the request could not be prepared
    /// - `Err(TransportError::Begin)`: the request could not be performed
    async fn get(&self, request: &UpdateRequest) -> Result<u16, TransportError>;
}
