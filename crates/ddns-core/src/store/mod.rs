//! Durable storage for the DDNS agent
//!
//! - [`ConfigStore`]: the configuration file (the only durable store)
//! - [`FileEventLog`]: the append-only event log file

pub mod format;
pub mod file;
pub mod log;

pub use file::ConfigStore;
pub use log::FileEventLog;
