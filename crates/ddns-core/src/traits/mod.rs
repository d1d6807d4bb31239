//! Collaborator traits for the DDNS agent
//!
//! This module defines the abstract interfaces the core depends on but does
//! not implement.
//!
//! - [`Transport`]: Perform one HTTP GET and report the status code
//! - [`Clock`]: Current UTC time
//! - [`EventLog`]: Append-only event log
//! - [`Console`]: Display, key signals, text prompts and host loop control

pub mod transport;
pub mod clock;
pub mod event_log;
pub mod console;

pub use transport::{Transport, TransportError, UpdateRequest};
pub use clock::{Clock, SystemClock, TIMESTAMP_FORMAT};
pub use event_log::EventLog;
pub use console::{Console, Display, HostControl, Key, KeySet, KeySource, TextInput};
