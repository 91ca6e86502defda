//! Protocol Module
//!
//! Encoding and decoding for the memcache text protocol.
//!
//! ## Request Format
//! ```text
//! <verb> <arg> <arg> ...\r\n[<data>\r\n]
//! ```
//!
//! ### Commands
//! - get:   `get <key>*`
//! - set:   `set <key> <flags> <exptime> <bytes> [noreply]` + data block
//! - stats: `stats`
//!
//! ## Response Format
//! Line-oriented, with raw data blocks whose length comes from the
//! preceding header:
//! ```text
//! VALUE <key> <flags> <bytes>\r\n
//! <data block of exactly <bytes> bytes>\r\n
//! END\r\n
//! ```
//!
//! ### Reply Lines
//! - `VALUE ...`: one retrieved item
//! - `STAT <name> <value>`: one statistic
//! - `STORED`: set succeeded
//! - `END`: end of a multi-line response

mod command;
mod response;
mod ordered;
mod codec;

pub use command::{validate_key, Command, CommandType, MAX_KEY_LENGTH};
pub use response::{Item, ItemMap, LineKind, StatsTable, ValueHeader};
pub use ordered::OrderedMap;
pub use codec::{
    classify_line, encode_command, encode_get, encode_set, encode_stats, parse_stat_line,
    read_set_reply, read_stats, read_values, CRLF, END, MALFORMED_SET, STORED,
};
