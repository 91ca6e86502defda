//! Protocol Client
//!
//! Issues commands over one transport and parses the replies.
//!
//! ## Concurrency
//! A `Client` owns a single stream and runs a strict write-then-read
//! sequence per call; there is no pipelining. Sharing one across threads
//! requires external locking, which [`SharedClient`] provides.

use std::io::Write;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::ClientConfig;
use crate::error::{MemlineError, Result};
use crate::network::{TcpTransport, Transport};
use crate::protocol::{
    encode_command, read_set_reply, read_stats, read_values, Command, Item, ItemMap, StatsTable,
};

/// Per-write options for `set`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreOptions {
    /// Opaque flags stored alongside the value
    pub flags: u32,

    /// Expiration time (0 = never, relative seconds, or a unix timestamp)
    pub exptime: i32,

    /// Skip the server acknowledgment.
    ///
    /// The server's reply is never read, so a rejected write goes unnoticed.
    pub noreply: bool,
}

impl StoreOptions {
    pub fn flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    pub fn exptime(mut self, exptime: i32) -> Self {
        self.exptime = exptime;
        self
    }

    pub fn noreply(mut self, noreply: bool) -> Self {
        self.noreply = noreply;
        self
    }
}

/// Client for one memcache server connection
pub struct Client<T: Transport = TcpTransport> {
    /// Stream to the server
    transport: T,

    /// Reject unsafe keys before they reach the wire
    validate_keys: bool,

    /// Max bytes returned by the malformed command probe
    probe_read_limit: usize,
}

impl Client<TcpTransport> {
    /// Connect using the given config
    pub fn connect(config: &ClientConfig) -> Result<Self> {
        let transport = TcpTransport::connect(config)?;
        Ok(Self {
            transport,
            validate_keys: config.validate_keys,
            probe_read_limit: config.probe_read_limit,
        })
    }
}

impl<T: Transport> Client<T> {
    /// Wrap an already-open transport with default settings
    pub fn with_transport(transport: T) -> Self {
        Self::with_transport_and_config(transport, &ClientConfig::default())
    }

    /// Wrap an already-open transport, taking protocol settings from `config`
    pub fn with_transport_and_config(transport: T, config: &ClientConfig) -> Self {
        Self {
            transport,
            validate_keys: config.validate_keys,
            probe_read_limit: config.probe_read_limit,
        }
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_inner(self) -> T {
        self.transport
    }

    /// Validate (if enabled), encode and write a command
    fn send(&mut self, command: &Command) -> Result<()> {
        if self.validate_keys {
            command.validate()?;
        }
        let bytes = encode_command(command);
        tracing::trace!("Sending {} ({} bytes)", command.command_type().verb(), bytes.len());
        self.transport.write(&bytes)
    }

    // =========================================================================
    // Retrieval
    // =========================================================================

    /// Fetch several keys in one round trip
    ///
    /// Keys the server does not hold are simply absent from the result.
    pub fn get_multi<K: AsRef<str>>(&mut self, keys: &[K]) -> Result<ItemMap> {
        let command = Command::Get {
            keys: keys.iter().map(|k| k.as_ref().to_string()).collect(),
        };
        tracing::debug!("get {} key(s)", keys.len());
        self.send(&command)?;
        read_values(&mut self.transport)
    }

    /// Fetch one key, failing with `ItemNotFound` on a miss
    pub fn get(&mut self, key: &str) -> Result<Item> {
        self.get_multi(&[key])?
            .remove(key)
            .ok_or_else(|| MemlineError::ItemNotFound {
                key: key.to_string(),
            })
    }

    // =========================================================================
    // Storage
    // =========================================================================

    /// Store a value with zero flags, no expiry, and an acknowledged reply
    pub fn set(&mut self, key: &str, value: &[u8]) -> Result<()> {
        self.set_with(key, value, StoreOptions::default())
    }

    /// Store a value
    ///
    /// With `options.noreply` set, nothing is read back and the call
    /// succeeds once the bytes are written, whatever the server decides.
    pub fn set_with(&mut self, key: &str, value: &[u8], options: StoreOptions) -> Result<()> {
        let command = Command::Set {
            key: key.to_string(),
            value: value.to_vec(),
            flags: options.flags,
            exptime: options.exptime,
            noreply: options.noreply,
        };
        tracing::debug!("set {:?} ({} bytes, noreply={})", key, value.len(), options.noreply);
        self.send(&command)?;

        if options.noreply {
            return Ok(());
        }
        read_set_reply(&mut self.transport, key, value)
    }

    // =========================================================================
    // Stats
    // =========================================================================

    /// Fetch general-purpose server statistics in server order
    pub fn get_stats(&mut self) -> Result<StatsTable> {
        tracing::debug!("stats");
        self.send(&Command::Stats)?;
        read_stats(&mut self.transport)
    }

    /// Write `name: value` lines for every statistic
    pub fn print_stats<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let stats = self.get_stats()?;
        for (name, value) in stats.iter() {
            writeln!(out, "{}: {}", name, value)?;
        }
        Ok(())
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    /// Send an invalid `set` that makes the server drop the connection
    ///
    /// Returns whatever arrived in one bounded read, trimmed of surrounding
    /// whitespace (often empty). The client is unusable afterwards.
    pub fn send_malformed_command(&mut self) -> Result<Vec<u8>> {
        tracing::debug!("Sending malformed command probe");
        self.send(&Command::Malformed)?;
        let reply = self.transport.read(self.probe_read_limit)?;

        let start = reply
            .iter()
            .position(|b| !b.is_ascii_whitespace())
            .unwrap_or(reply.len());
        let end = reply
            .iter()
            .rposition(|b| !b.is_ascii_whitespace())
            .map_or(start, |pos| pos + 1);
        Ok(reply[start..end].to_vec())
    }
}

/// A [`Client`] behind a lock, for use from several threads
///
/// Each call holds the lock for its whole request/response exchange.
pub struct SharedClient<T: Transport = TcpTransport> {
    inner: Arc<Mutex<Client<T>>>,
}

impl<T: Transport> Clone for SharedClient<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Transport> SharedClient<T> {
    pub fn new(client: Client<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(client)),
        }
    }

    /// Run `f` with exclusive access to the client
    pub fn with<R>(&self, f: impl FnOnce(&mut Client<T>) -> R) -> R {
        let mut client = self.inner.lock();
        f(&mut *client)
    }

    pub fn get(&self, key: &str) -> Result<Item> {
        self.with(|c| c.get(key))
    }

    pub fn get_multi<K: AsRef<str>>(&self, keys: &[K]) -> Result<ItemMap> {
        self.with(|c| c.get_multi(keys))
    }

    pub fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.with(|c| c.set(key, value))
    }

    pub fn set_with(&self, key: &str, value: &[u8], options: StoreOptions) -> Result<()> {
        self.with(|c| c.set_with(key, value, options))
    }

    pub fn get_stats(&self) -> Result<StatsTable> {
        self.with(|c| c.get_stats())
    }
}
