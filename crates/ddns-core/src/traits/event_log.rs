//! Append-only event log
//!
//! Records the per-entry failures and startup errors a user may want to
//! inspect later. This is separate from `tracing` diagnostics: lines here are
//! plain text meant for the person operating the agent.

use std::io;

/// Sink for event log lines
pub trait EventLog: Send + Sync {
    /// Append one line (without trailing newline)
    fn append(&self, line: &str) -> io::Result<()>;
}
