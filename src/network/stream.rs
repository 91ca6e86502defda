//! Buffered byte stream
//!
//! The transport contract the protocol layer reads from, and a buffered
//! implementation over any `Read + Write` handle.

use std::io::{self, Read, Write};

use bytes::{Buf, BytesMut};

use crate::error::Result;

/// Default initial read buffer capacity (8 KB)
pub const DEFAULT_READ_CAPACITY: usize = 8 * 1024;

/// Size of each read from the underlying handle
const READ_CHUNK: usize = 4096;

/// Ordered byte channel to one server
///
/// Every method blocks until it can answer or the underlying handle fails.
/// Errors are returned as-is; callers must treat the stream as unusable
/// after any failure.
pub trait Transport {
    /// Send bytes verbatim
    fn write(&mut self, bytes: &[u8]) -> Result<()>;

    /// Next line, including its `\n` terminator
    fn read_line(&mut self) -> Result<Vec<u8>>;

    /// Exactly `n` bytes
    fn read_exact(&mut self, n: usize) -> Result<Vec<u8>>;

    /// Whether the next bytes equal `pattern`
    ///
    /// With `consume` set, a match advances the stream past the pattern.
    /// A non-match never advances.
    fn peek_contains(&mut self, pattern: &[u8], consume: bool) -> Result<bool>;

    /// Best-effort read of up to `max_n` bytes with no framing
    fn read(&mut self, max_n: usize) -> Result<Vec<u8>>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write(bytes)
    }

    fn read_line(&mut self) -> Result<Vec<u8>> {
        (**self).read_line()
    }

    fn read_exact(&mut self, n: usize) -> Result<Vec<u8>> {
        (**self).read_exact(n)
    }

    fn peek_contains(&mut self, pattern: &[u8], consume: bool) -> Result<bool> {
        (**self).peek_contains(pattern, consume)
    }

    fn read(&mut self, max_n: usize) -> Result<Vec<u8>> {
        (**self).read(max_n)
    }
}

/// A [`Transport`] that buffers reads from `S`
pub struct BufferedStream<S> {
    /// Underlying handle
    inner: S,

    /// Bytes received but not yet handed out
    buf: BytesMut,
}

impl<S: Read + Write> BufferedStream<S> {
    pub fn new(inner: S) -> Self {
        Self::with_capacity(DEFAULT_READ_CAPACITY, inner)
    }

    pub fn with_capacity(capacity: usize, inner: S) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(capacity),
        }
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    /// Unwrap the handle. Buffered but unread bytes are lost.
    pub fn into_inner(self) -> S {
        self.inner
    }

    /// Number of bytes buffered and not yet consumed
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Pull one chunk from the handle into the buffer
    ///
    /// Returns the number of bytes added; 0 means the peer closed.
    fn fill(&mut self) -> io::Result<usize> {
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            match self.inner.read(&mut chunk) {
                Ok(n) => {
                    self.buf.extend_from_slice(&chunk[..n]);
                    return Ok(n);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// Fill until at least `n` bytes are buffered
    fn fill_to(&mut self, n: usize) -> io::Result<()> {
        while self.buf.len() < n {
            if self.fill()? == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!(
                        "connection closed: wanted {} bytes, got {}",
                        n,
                        self.buf.len()
                    ),
                ));
            }
        }
        Ok(())
    }
}

impl<S: Read + Write> Transport for BufferedStream<S> {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.inner.write_all(bytes)?;
        self.inner.flush()?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<Vec<u8>> {
        let mut scanned = 0;
        loop {
            if let Some(pos) = self.buf[scanned..].iter().position(|&b| b == b'\n') {
                let line = self.buf.split_to(scanned + pos + 1);
                return Ok(line.to_vec());
            }
            scanned = self.buf.len();

            if self.fill()? == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("connection closed mid-line after {} bytes", self.buf.len()),
                )
                .into());
            }
        }
    }

    fn read_exact(&mut self, n: usize) -> Result<Vec<u8>> {
        self.fill_to(n)?;
        Ok(self.buf.split_to(n).to_vec())
    }

    fn peek_contains(&mut self, pattern: &[u8], consume: bool) -> Result<bool> {
        loop {
            let have = self.buf.len().min(pattern.len());
            if self.buf[..have] != pattern[..have] {
                return Ok(false);
            }
            if have == pattern.len() {
                break;
            }
            // Prefix matches so far; need more bytes to decide
            if self.fill()? == 0 {
                return Ok(false);
            }
        }

        if consume {
            self.buf.advance(pattern.len());
        }
        Ok(true)
    }

    fn read(&mut self, max_n: usize) -> Result<Vec<u8>> {
        if self.buf.is_empty() {
            match self.fill() {
                Ok(_) => {}
                // A reset is how the server signals it dropped us
                Err(e) if e.kind() == io::ErrorKind::ConnectionReset => {
                    tracing::debug!("Connection reset during raw read");
                    return Ok(Vec::new());
                }
                Err(e) => return Err(e.into()),
            }
        }

        let n = self.buf.len().min(max_n);
        Ok(self.buf.split_to(n).to_vec())
    }
}
