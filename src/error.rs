//! Error types for memline
//!
//! Provides a unified error type for all client operations.

use thiserror::Error;

/// Result type alias using MemlineError
pub type Result<T> = std::result::Result<T, MemlineError>;

/// Unified error type for memline operations
#[derive(Debug, Error)]
pub enum MemlineError {
    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Operation Outcomes
    // -------------------------------------------------------------------------
    /// The requested key was absent from an otherwise valid response
    #[error("The item with key {key:?} was not found")]
    ItemNotFound { key: String },

    /// The server answered a `set` with something other than `STORED`
    #[error("Could not set key {key:?} to {value_prefix:?}... (server replied {response:?})")]
    SetFailed {
        key: String,
        value_prefix: String,
        response: String,
    },

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    /// A response line matched none of the expected grammars.
    /// The connection is in an undefined state afterwards.
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl MemlineError {
    /// True for a cache miss
    pub fn is_not_found(&self) -> bool {
        matches!(self, MemlineError::ItemNotFound { .. })
    }

    /// True when the server sent something the parser could not accept
    pub fn is_protocol(&self) -> bool {
        matches!(self, MemlineError::Protocol(_))
    }

    /// True for errors raised by the underlying stream
    pub fn is_transport(&self) -> bool {
        matches!(self, MemlineError::Io(_))
    }
}
