//! Network Module
//!
//! Byte-stream transport to a single server.
//!
//! ## Architecture
//! - `Transport` trait: line read, exact read, peek, raw read, write
//! - `BufferedStream<S>`: buffered implementation over any `Read + Write`
//! - `TcpTransport`: `BufferedStream` over a configured `TcpStream`

mod stream;
mod tcp;

pub use stream::{BufferedStream, Transport, DEFAULT_READ_CAPACITY};
pub use tcp::TcpTransport;
