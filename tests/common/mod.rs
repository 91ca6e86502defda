//! Shared test helpers
//!
//! An in-memory duplex stream standing in for a server socket.

#![allow(dead_code)]

use std::io::{self, Cursor, Read, Write};

use memline::network::BufferedStream;
use memline::Client;

/// Scripted server: reads come from `input`, writes are captured
pub struct MockStream {
    input: Cursor<Vec<u8>>,
    pub written: Vec<u8>,
    /// Max bytes handed out per read call (0 = unlimited)
    chunk: usize,
    /// Fail reads with ConnectionReset once input is exhausted
    reset_at_end: bool,
}

impl MockStream {
    pub fn new(input: &[u8]) -> Self {
        Self {
            input: Cursor::new(input.to_vec()),
            written: Vec::new(),
            chunk: 0,
            reset_at_end: false,
        }
    }

    /// Deliver input at most `chunk` bytes at a time
    pub fn chunked(input: &[u8], chunk: usize) -> Self {
        Self {
            chunk,
            ..Self::new(input)
        }
    }

    pub fn resetting(input: &[u8]) -> Self {
        Self {
            reset_at_end: true,
            ..Self::new(input)
        }
    }

    /// Bytes not yet read
    pub fn remaining(&self) -> usize {
        self.input.get_ref().len() - self.input.position() as usize
    }
}

impl Read for MockStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.reset_at_end && self.remaining() == 0 {
            return Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset by peer"));
        }
        let limit = if self.chunk == 0 { buf.len() } else { self.chunk.min(buf.len()) };
        self.input.read(&mut buf[..limit])
    }
}

impl Write for MockStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub fn stream(input: &[u8]) -> BufferedStream<MockStream> {
    BufferedStream::new(MockStream::new(input))
}

pub fn client(input: &[u8]) -> Client<BufferedStream<MockStream>> {
    Client::with_transport(stream(input))
}

/// What the client wrote to the server
pub fn written(client: Client<BufferedStream<MockStream>>) -> Vec<u8> {
    client.into_inner().into_inner().written
}
