//! Protocol codec
//!
//! Request encoding and response parsing for the text protocol.
//!
//! ## Wire Format
//!
//! ### Requests
//! ```text
//! get <k1> <k2> ...\r\n
//! set <key> <flags> <exptime> <bytes> [noreply]\r\n<data>\r\n
//! stats\r\n
//! ```
//!
//! ### Responses
//! ```text
//! VALUE <key> <flags> <bytes>\r\n<data>\r\n ... END\r\n
//! STAT <name> <value>\r\n ... END\r\n
//! STORED\r\n
//! ```

use crate::error::{MemlineError, Result};
use crate::network::Transport;
use super::{Command, Item, ItemMap, LineKind, StatsTable, ValueHeader};

/// Line terminator
pub const CRLF: &[u8] = b"\r\n";

/// Ends every multi-line response
pub const END: &[u8] = b"END\r\n";

/// Successful `set` reply
pub const STORED: &[u8] = b"STORED\r\n";

/// Request with a field count no `set` accepts
pub const MALFORMED_SET: &[u8] = b"set 0 1\r\n";

/// How much of a rejected value ends up in a `SetFailed` error
const VALUE_PREFIX_LEN: usize = 10;

// =============================================================================
// Command Encoding
// =============================================================================

/// Encode a command to bytes
///
/// No validation happens here; see [`Command::validate`].
pub fn encode_command(command: &Command) -> Vec<u8> {
    match command {
        Command::Get { keys } => {
            let joined = keys.join(" ");
            let mut message = Vec::with_capacity(4 + joined.len() + CRLF.len());
            message.extend_from_slice(b"get ");
            message.extend_from_slice(joined.as_bytes());
            message.extend_from_slice(CRLF);
            message
        }
        Command::Set {
            key,
            value,
            flags,
            exptime,
            noreply,
        } => {
            // The noreply field is left empty rather than omitted, so a plain
            // set keeps the space before CRLF.
            let header = format!(
                "set {} {} {} {} {}\r\n",
                key,
                flags,
                exptime,
                value.len(),
                if *noreply { "noreply" } else { "" }
            );
            let mut message = Vec::with_capacity(header.len() + value.len() + CRLF.len());
            message.extend_from_slice(header.as_bytes());
            message.extend_from_slice(value);
            message.extend_from_slice(CRLF);
            message
        }
        Command::Stats => b"stats\r\n".to_vec(),
        Command::Malformed => MALFORMED_SET.to_vec(),
    }
}

/// Encode a `get` for one or more keys
pub fn encode_get<K: AsRef<str>>(keys: &[K]) -> Result<Vec<u8>> {
    let command = Command::Get {
        keys: keys.iter().map(|k| k.as_ref().to_string()).collect(),
    };
    command.validate()?;
    Ok(encode_command(&command))
}

/// Encode a `set` header plus payload
pub fn encode_set(
    key: &str,
    value: &[u8],
    flags: u32,
    exptime: i32,
    noreply: bool,
) -> Result<Vec<u8>> {
    let command = Command::Set {
        key: key.to_string(),
        value: value.to_vec(),
        flags,
        exptime,
        noreply,
    };
    command.validate()?;
    Ok(encode_command(&command))
}

/// Encode a `stats` request
pub fn encode_stats() -> Vec<u8> {
    encode_command(&Command::Stats)
}

// =============================================================================
// Line Classification
// =============================================================================

/// Classify one line of a retrieval response
pub fn classify_line(line: &[u8]) -> LineKind {
    if line == END {
        return LineKind::Terminator;
    }
    match parse_value_header(line) {
        Some(header) => LineKind::Value(header),
        None => LineKind::Malformed(line.to_vec()),
    }
}

/// Parse `VALUE <key> <flags> <bytes>\r\n`
fn parse_value_header(line: &[u8]) -> Option<ValueHeader> {
    let body = line.strip_suffix(CRLF)?;
    let mut fields = body.split(|&b| b == b' ');

    if fields.next()? != b"VALUE" {
        return None;
    }
    let key = fields.next()?;
    let flags = fields.next()?;
    let len = fields.next()?;
    if fields.next().is_some() {
        return None;
    }

    if key.is_empty() || key.iter().any(|b| b.is_ascii_whitespace()) {
        return None;
    }

    Some(ValueHeader {
        key: std::str::from_utf8(key).ok()?.to_string(),
        flags: parse_decimal(flags)?,
        len: parse_decimal(len)?,
    })
}

/// Parse a run of ASCII digits, rejecting signs and overflow
fn parse_decimal<N: std::str::FromStr>(field: &[u8]) -> Option<N> {
    if field.is_empty() || !field.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(field).ok()?.parse().ok()
}

/// Parse `STAT <name> <value>\r\n` into a name/value pair
///
/// The value is everything after the second space, so values may contain spaces.
pub fn parse_stat_line(line: &[u8]) -> Result<(String, String)> {
    let text = String::from_utf8_lossy(line);
    let mut parts = text.splitn(3, ' ');

    match (parts.next(), parts.next(), parts.next()) {
        (Some("STAT"), Some(name), Some(value)) if !name.is_empty() => {
            Ok((name.to_string(), value.trim().to_string()))
        }
        _ => Err(MemlineError::Protocol(format!(
            "malformed stats line: {:?}",
            text.trim_end()
        ))),
    }
}

// =============================================================================
// Response Parsing
// =============================================================================

/// Read a `stats` response up to and including `END`
pub fn read_stats<T: Transport + ?Sized>(transport: &mut T) -> Result<StatsTable> {
    let mut stats = StatsTable::new();

    loop {
        let line = transport.read_line()?;
        if line == END {
            break;
        }
        let (name, value) = parse_stat_line(&line)?;
        tracing::trace!("STAT {} = {}", name, value);
        stats.insert(name, value);
    }

    Ok(stats)
}

/// Read a multi-get response up to and including `END`
///
/// Headers are read line by line; each payload is read by its declared
/// length, so CR/LF bytes inside a value never end it early.
pub fn read_values<T: Transport + ?Sized>(transport: &mut T) -> Result<ItemMap> {
    let mut items = ItemMap::new();

    loop {
        let line = transport.read_line()?;

        let header = match classify_line(&line) {
            LineKind::Value(header) => header,
            LineKind::Terminator => break,
            LineKind::Malformed(line) => {
                tracing::debug!("Unexpected line in get response: {:?}", String::from_utf8_lossy(&line));
                return Err(MemlineError::Protocol(format!(
                    "expected VALUE or END, got {:?}",
                    String::from_utf8_lossy(&line).trim_end()
                )));
            }
        };

        let framed_len = header.len.checked_add(CRLF.len()).ok_or_else(|| {
            MemlineError::Protocol(format!("value length {} out of range", header.len))
        })?;
        let mut data = transport.read_exact(framed_len)?;
        if !data.ends_with(CRLF) {
            return Err(MemlineError::Protocol(format!(
                "value for {:?} not followed by CRLF",
                header.key
            )));
        }
        data.truncate(header.len);

        tracing::trace!("VALUE {} flags={} bytes={}", header.key, header.flags, header.len);
        items.insert(header.key.clone(), Item::new(header.key, header.flags, data));

        if transport.peek_contains(END, true)? {
            break;
        }
    }

    Ok(items)
}

/// Read the single-line reply to a `set`
pub fn read_set_reply<T: Transport + ?Sized>(transport: &mut T, key: &str, value: &[u8]) -> Result<()> {
    let reply = transport.read_line()?;
    if reply == STORED {
        return Ok(());
    }

    let prefix = &value[..value.len().min(VALUE_PREFIX_LEN)];
    let response = String::from_utf8_lossy(&reply).trim_end().to_string();
    tracing::debug!("set {:?} rejected: {}", key, response);

    Err(MemlineError::SetFailed {
        key: key.to_string(),
        value_prefix: String::from_utf8_lossy(prefix).into_owned(),
        response,
    })
}
