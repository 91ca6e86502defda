//! Command definitions
//!
//! Represents requests sent to the server.

use crate::error::{MemlineError, Result};

/// Longest key the server accepts
pub const MAX_KEY_LENGTH: usize = 250;

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    Get,
    Set,
    Stats,
    Malformed,
}

impl CommandType {
    /// Protocol verb written at the start of the request line
    pub fn verb(&self) -> &'static str {
        match self {
            CommandType::Get => "get",
            CommandType::Set | CommandType::Malformed => "set",
            CommandType::Stats => "stats",
        }
    }
}

/// A request to the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fetch one or more keys
    Get { keys: Vec<String> },

    /// Store a value unconditionally
    Set {
        key: String,
        value: Vec<u8>,
        flags: u32,
        exptime: i32,
        noreply: bool,
    },

    /// Dump general-purpose server statistics
    Stats,

    /// A `set` with the wrong field count. The server drops the connection.
    Malformed,
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Get { .. } => CommandType::Get,
            Command::Set { .. } => CommandType::Set,
            Command::Stats => CommandType::Stats,
            Command::Malformed => CommandType::Malformed,
        }
    }

    /// Check every key this command carries
    pub fn validate(&self) -> Result<()> {
        match self {
            Command::Get { keys } => {
                if keys.is_empty() {
                    return Err(MemlineError::InvalidKey(
                        "get requires at least one key".to_string(),
                    ));
                }
                keys.iter().try_for_each(|key| validate_key(key))
            }
            Command::Set { key, .. } => validate_key(key),
            Command::Stats | Command::Malformed => Ok(()),
        }
    }
}

/// Check that a key can be written to the wire without corrupting the request
///
/// Keys must be non-empty, at most [`MAX_KEY_LENGTH`] bytes, and free of
/// whitespace and control bytes.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(MemlineError::InvalidKey("key is empty".to_string()));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(MemlineError::InvalidKey(format!(
            "key is {} bytes long (max {})",
            key.len(),
            MAX_KEY_LENGTH
        )));
    }
    if let Some(bad) = key.bytes().find(|b| b.is_ascii_whitespace() || b.is_ascii_control()) {
        return Err(MemlineError::InvalidKey(format!(
            "key {:?} contains byte 0x{:02x}",
            key, bad
        )));
    }
    Ok(())
}
