//! Error types for the DDNS agent
//!
//! This module defines all error types used throughout the crate.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for DDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DDNS agent
#[derive(Error, Debug)]
pub enum Error {
    /// The configuration file does not exist
    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// File and console I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The HTTP transport could not be initialized
    #[error("Transport error: {0}")]
    Transport(String),

    /// The entry table is already at capacity
    #[error("Entry table is full ({0} entries)")]
    CapacityExceeded(usize),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Create a transport initialization error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
