//! Provider update engine
//!
//! The UpdateEngine is responsible for:
//! - Resolving each entry's provider
//! - Deriving Basic-Auth credentials when only user/pass are configured
//! - Building and dispatching one GET request per entry
//! - Reporting the outcome on the console and in the event log
//!
//! ## Architecture
//!
//! ```text
//!  EntryTable ──► ProviderRegistry ──► UpdateRequest ──► Transport
//!                                                           │
//!                     Display ◄── status line ◄─────────────┤
//!                     EventLog ◄── failures ◄───────────────┘
//! ```
//!
//! ## Cycle Semantics
//!
//! 1. Entries are processed strictly one at a time, in table order
//! 2. Every failure is logged and the cycle moves on to the next entry
//! 3. No entry is ever removed or disabled; the next cycle retries it
//! 4. There are no retries within a cycle

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use tracing::{debug, info, warn};

use crate::config::{Entry, EntryTable, Field};
use crate::registry::{self, ProviderDescriptor};
use crate::traits::{Clock, Display, EventLog, Transport, TransportError, UpdateRequest};

/// `User-Agent` sent with every update request
pub const USER_AGENT: &str = concat!("ddnsd/", env!("CARGO_PKG_VERSION"), " (dynamic DNS updater)");

/// Outcome of one entry within a cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Provider identifier not in the registry
    UnknownProvider { provider: String },

    /// The transport could not prepare the request
    OpenFailed { domain: String, code: String },

    /// The transport could not perform the request
    BeginFailed { domain: String, code: String },

    /// A response arrived
    Completed { domain: String, status: u16 },
}

impl UpdateOutcome {
    /// Whether the provider accepted the update (2xx)
    pub fn is_success(&self) -> bool {
        matches!(self, UpdateOutcome::Completed { status, .. } if is_success_status(*status))
    }
}

fn is_success_status(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Core update engine
///
/// Owns the collaborators it needs for a cycle; the entry table is lent to
/// each [`UpdateEngine::run_cycle`] call so the engine never holds state
/// between cycles.
pub struct UpdateEngine {
    /// HTTP transport
    transport: Box<dyn Transport>,

    /// Timestamp source
    clock: Box<dyn Clock>,

    /// Append-only event log
    event_log: Box<dyn EventLog>,
}

impl UpdateEngine {
    /// Create a new engine
    ///
    /// # Parameters
    ///
    /// - `transport`: Transport implementation
    /// - `clock`: Clock used for console and log timestamps
    /// - `event_log`: Event log sink
    pub fn new(
        transport: Box<dyn Transport>,
        clock: Box<dyn Clock>,
        event_log: Box<dyn EventLog>,
    ) -> Self {
        Self {
            transport,
            clock,
            event_log,
        }
    }

    /// Clock shared with the rest of the agent
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Run one update cycle over every entry
    ///
    /// Synthesized Basic-Auth secrets are written back into `entries`.
    ///
    /// # Returns
    ///
    /// One outcome per entry, in table order
    pub async fn run_cycle<D: Display + ?Sized>(
        &self,
        entries: &mut EntryTable,
        display: &mut D,
    ) -> Vec<UpdateOutcome> {
        debug!("Starting update cycle over {} entries", entries.len());

        let mut outcomes = Vec::with_capacity(entries.len());
        for entry in entries.iter_mut() {
            outcomes.push(self.update_entry(entry, display).await);
        }

        let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
        info!("Update cycle finished: {}/{} succeeded", succeeded, outcomes.len());
        outcomes
    }

    /// Update a single entry
    async fn update_entry<D: Display + ?Sized>(
        &self,
        entry: &mut Entry,
        display: &mut D,
    ) -> UpdateOutcome {
        let Some(provider) = registry::lookup(entry.provider()) else {
            info!("Unknown provider '{}' for {}", entry.provider(), entry.domain());
            self.log_event(&format!("Unknown provider: {}", entry.provider()));
            return UpdateOutcome::UnknownProvider {
                provider: entry.provider().to_string(),
            };
        };

        if provider.basic_auth {
            fill_basic_auth_secret(entry);
        }

        let request = build_request(provider, entry);
        let domain = entry.domain().to_string();

        match self.transport.get(&request).await {
            Ok(status) => {
                let line = format!(
                    "{} - Updated {} (status {})",
                    self.clock.timestamp(),
                    domain,
                    status
                );
                if let Err(e) = display.print_line(&line) {
                    warn!("Failed to print status line: {}", e);
                }

                if is_success_status(status) {
                    info!("Updated {} via {} (status {})", domain, provider.identifier, status);
                } else {
                    warn!("Provider {} rejected {} (status {})", provider.identifier, domain, status);
                    self.log_event(&format!("{} HTTP {}", domain, status));
                }
                UpdateOutcome::Completed { domain, status }
            }
            Err(e) => {
                warn!("Request for {} failed: {}", domain, e);
                self.log_event(&format!("{} {}", domain, e));
                match e {
                    TransportError::Open(code) => UpdateOutcome::OpenFailed { domain, code },
                    TransportError::Begin(code) => UpdateOutcome::BeginFailed { domain, code },
                }
            }
        }
    }

    /// Append a timestamped line to the event log
    fn log_event(&self, message: &str) {
        let line = format!("{} - {}", self.clock.timestamp(), message);
        if let Err(e) = self.event_log.append(&line) {
            warn!("Failed to write event log: {}", e);
        }
    }
}

/// Derive the Basic-Auth secret from user/pass when it is missing
///
/// Only applies when `secret` is empty and both `user` and `pass` are set.
/// The result is stored in the entry so later cycles reuse it.
pub fn fill_basic_auth_secret(entry: &mut Entry) -> bool {
    if !entry.secret().is_empty() || entry.user().is_empty() || entry.pass().is_empty() {
        return false;
    }

    let encoded = basic_auth_value(entry.user(), entry.pass());
    entry.set(Field::Secret, &encoded);
    debug!("Derived Basic-Auth credential for {}", entry.domain());
    true
}

/// Base64 of `"<user>:<pass>"`, RFC 4648 standard alphabet with padding
pub fn basic_auth_value(user: &str, pass: &str) -> String {
    STANDARD.encode(format!("{}:{}", user, pass))
}

/// Build the request for an entry
///
/// The `Authorization` header is attached only for Basic-Auth providers
/// with a non-empty secret.
pub fn build_request(provider: &ProviderDescriptor, entry: &Entry) -> UpdateRequest {
    let url = provider.update_url(entry.domain(), entry.secret());
    let request = UpdateRequest::get(url, USER_AGENT);

    if provider.basic_auth && !entry.secret().is_empty() {
        request.with_header("Authorization", format!("Basic {}", entry.secret()))
    } else {
        request
    }
}
