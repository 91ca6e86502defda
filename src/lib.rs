//! # memline
//!
//! A blocking client for the memcache text protocol:
//! - Byte-exact request encoding (`get`, `set`, `stats`)
//! - Incremental response parsing that mixes text lines with
//!   length-prefixed binary payloads
//! - Typed results (`Item`, ordered `StatsTable`) and typed failures
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Application                             │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                  Client (protocol)                          │
//! │        encode command → write → parse response              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                 Transport (network)                         │
//! │   read_line / read_exact / peek_contains / read / write     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!                       ▼
//!                  TCP socket
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use memline::{ClientConfig, StoreOptions};
//!
//! let mut client = ClientConfig::builder()
//!     .server_addr("127.0.0.1:11211")
//!     .build()
//!     .connect()?;
//!
//! client.set_with("greeting", b"hello", StoreOptions::default().flags(7))?;
//! let item = client.get("greeting")?;
//! assert_eq!(item.value, b"hello");
//! # Ok::<(), memline::MemlineError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod network;
pub mod protocol;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{MemlineError, Result};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use client::{Client, SharedClient, StoreOptions};
pub use protocol::{Item, ItemMap, StatsTable};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of memline
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
