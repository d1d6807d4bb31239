//! Fatal startup reporting
//!
//! A startup failure is recorded in the event log, shown on screen, and held
//! there until the user acknowledges it (or the host stops) so it is not
//! lost when the process exits.

use std::path::Path;
use std::time::Duration;
use tracing::{error, warn};

use crate::error::{Error, Result};
use crate::scheduler::wait_for_confirm;
use crate::traits::{Clock, Console, EventLog};

/// Format of a configuration file line, shown when the file is missing
const ENTRY_FORMAT_HINT: &str = "  <provider>,<domain>[,<secret>[,<user>[,<pass>]]]";

/// What to record and show for one fatal startup error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FatalReport {
    log_message: String,
    screen: Vec<String>,
}

impl FatalReport {
    /// Report for a configuration file that could not be loaded
    pub fn config_load(err: &Error, path: &Path) -> Self {
        match err {
            Error::ConfigNotFound(_) => Self {
                log_message: format!("Could not find {}", path.display()),
                screen: vec![
                    format!("Could not find {}", path.display()),
                    "Create it with one entry per line:".to_string(),
                    ENTRY_FORMAT_HINT.to_string(),
                ],
            },
            other => Self {
                log_message: format!("Could not read {}: {}", path.display(), other),
                screen: vec![
                    format!("Could not read {}", path.display()),
                    other.to_string(),
                ],
            },
        }
    }

    /// Report for an HTTP stack that failed to initialize
    pub fn transport_init(err: &Error) -> Self {
        Self {
            log_message: format!("HTTP init err: {}", err),
            screen: vec![
                "HTTP transport could not be initialized".to_string(),
                err.to_string(),
            ],
        }
    }

    /// Append an extra screen line
    pub fn with_line(mut self, line: impl Into<String>) -> Self {
        self.screen.push(line.into());
        self
    }

    /// Event log message, without timestamp
    pub fn log_message(&self) -> &str {
        &self.log_message
    }

    pub fn screen_lines(&self) -> &[String] {
        &self.screen
    }
}

/// Log, display and hold a fatal startup error
///
/// With `ack_hint` set, the hint is shown and the call waits for the confirm
/// key; with `None` (no interactive input) it returns right after drawing.
///
/// # Returns
///
/// `true` if the user acknowledged, `false` otherwise
pub async fn report_fatal<C: Console + ?Sized>(
    report: &FatalReport,
    console: &mut C,
    clock: &dyn Clock,
    event_log: &dyn EventLog,
    ack_hint: Option<&str>,
    tick: Duration,
) -> Result<bool> {
    error!("{}", report.log_message);
    let line = format!("{} - {}", clock.timestamp(), report.log_message);
    if let Err(e) = event_log.append(&line) {
        warn!("Failed to write event log: {}", e);
    }

    console.clear()?;
    for line in &report.screen {
        console.print_line(line)?;
    }

    let Some(hint) = ack_hint else {
        return Ok(false);
    };
    console.print_line("")?;
    console.print_line(hint)?;
    Ok(wait_for_confirm(console, tick).await)
}
