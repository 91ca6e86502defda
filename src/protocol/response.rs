//! Response definitions
//!
//! Represents what the server sends back.

use std::fmt;

use super::ordered::OrderedMap;

/// One cache entry returned by a retrieval command
#[derive(Clone, PartialEq, Eq)]
pub struct Item {
    /// Key the value was stored under
    pub key: String,

    /// Opaque flags set by the writer, round-tripped verbatim
    pub flags: u32,

    /// Raw payload, exactly as long as the server declared
    pub value: Vec<u8>,
}

impl Item {
    pub fn new(key: impl Into<String>, flags: u32, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            flags,
            value: value.into(),
        }
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Item")
            .field("key", &self.key)
            .field("flags", &self.flags)
            .field("value", &String::from_utf8_lossy(&self.value))
            .finish()
    }
}

/// Multi-get result: key -> item, in server emission order
pub type ItemMap = OrderedMap<Item>;

/// Stats result: stat name -> stat value, in server emission order
pub type StatsTable = OrderedMap<String>;

/// Parsed `VALUE <key> <flags> <bytes>` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueHeader {
    pub key: String,
    pub flags: u32,
    pub len: usize,
}

/// Classification of one line read during a retrieval response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// A value header; a payload of `len` bytes plus CRLF follows
    Value(ValueHeader),

    /// The `END` line
    Terminator,

    /// Anything else (the raw line is kept for diagnostics)
    Malformed(Vec<u8>),
}
