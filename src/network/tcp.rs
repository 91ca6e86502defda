//! TCP Transport
//!
//! Opens and configures the socket a client talks over.

use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::config::ClientConfig;
use crate::error::{MemlineError, Result};
use super::stream::BufferedStream;

/// Buffered transport over a TCP socket
pub type TcpTransport = BufferedStream<TcpStream>;

impl BufferedStream<TcpStream> {
    /// Connect to `config.server_addr` and apply the configured timeouts
    pub fn connect(config: &ClientConfig) -> Result<Self> {
        let addr = resolve(&config.server_addr)?;

        let stream = if config.connect_timeout_ms > 0 {
            TcpStream::connect_timeout(&addr, Duration::from_millis(config.connect_timeout_ms))?
        } else {
            TcpStream::connect(addr)?
        };

        // Disable Nagle's algorithm: every request is a small write followed by a read
        stream.set_nodelay(true)?;

        if config.read_timeout_ms > 0 {
            stream.set_read_timeout(Some(Duration::from_millis(config.read_timeout_ms)))?;
        }
        if config.write_timeout_ms > 0 {
            stream.set_write_timeout(Some(Duration::from_millis(config.write_timeout_ms)))?;
        }

        tracing::debug!("Connected to {}", addr);

        Ok(BufferedStream::with_capacity(config.read_buffer_capacity, stream))
    }

    /// Address of the connected server
    pub fn peer_addr(&self) -> Result<SocketAddr> {
        Ok(self.get_ref().peer_addr()?)
    }
}

/// Resolve `host:port`, taking the first address
fn resolve(server_addr: &str) -> Result<SocketAddr> {
    server_addr
        .to_socket_addrs()
        .map_err(|e| MemlineError::Config(format!("cannot resolve {:?}: {}", server_addr, e)))?
        .next()
        .ok_or_else(|| MemlineError::Config(format!("{:?} resolved to no addresses", server_addr)))
}
