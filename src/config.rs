//! Configuration for memline
//!
//! Centralized client configuration with sensible defaults.

use crate::client::Client;
use crate::error::Result;
use crate::network::TcpTransport;

/// Default memcached listen address
pub const DEFAULT_SERVER_ADDR: &str = "127.0.0.1:11211";

/// Main configuration for a memline client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Server address (host:port)
    pub server_addr: String,

    /// Connect timeout (milliseconds, 0 = OS default)
    pub connect_timeout_ms: u64,

    /// Socket read timeout (milliseconds, 0 = none)
    pub read_timeout_ms: u64,

    /// Socket write timeout (milliseconds, 0 = none)
    pub write_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Stream Configuration
    // -------------------------------------------------------------------------
    /// Initial capacity of the read buffer (in bytes)
    pub read_buffer_capacity: usize,

    /// Max bytes collected by the malformed command probe
    pub probe_read_limit: usize,

    // -------------------------------------------------------------------------
    // Protocol Configuration
    // -------------------------------------------------------------------------
    /// Reject keys that would corrupt the wire format
    pub validate_keys: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_addr: DEFAULT_SERVER_ADDR.to_string(),
            connect_timeout_ms: 1000,
            read_timeout_ms: 5000,
            write_timeout_ms: 5000,
            read_buffer_capacity: 8 * 1024, // 8 KB
            probe_read_limit: 4096,
            validate_keys: true,
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Connect to the configured server and return a ready client
    pub fn connect(&self) -> Result<Client<TcpTransport>> {
        Client::connect(self)
    }
}

/// Builder for ClientConfig
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the server address (host:port)
    pub fn server_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.server_addr = addr.into();
        self
    }

    /// Set the connect timeout (in milliseconds)
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set the initial read buffer capacity (in bytes)
    pub fn read_buffer_capacity(mut self, size: usize) -> Self {
        self.config.read_buffer_capacity = size;
        self
    }

    /// Set the byte limit for the malformed command probe
    pub fn probe_read_limit(mut self, size: usize) -> Self {
        self.config.probe_read_limit = size;
        self
    }

    /// Enable or disable key validation
    pub fn validate_keys(mut self, enabled: bool) -> Self {
        self.config.validate_keys = enabled;
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}
