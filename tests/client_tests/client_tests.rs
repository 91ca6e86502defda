//! Client Tests
//!
//! End-to-end client behavior against scripted server replies.

#[path = "../common/mod.rs"]
mod common;

use common::{client, stream, written, MockStream};
use memline::network::BufferedStream;
use memline::{Client, ClientConfig, Item, MemlineError, SharedClient, StoreOptions};

// =============================================================================
// get / get_multi
// =============================================================================

#[test]
fn test_get_multi_example_exchange() {
    let mut c = client(b"VALUE a 0 3\r\nfoo\r\nVALUE b 5 3\r\nbar\r\nEND\r\n");
    let items = c.get_multi(&["a", "b"]).unwrap();

    assert_eq!(items.get("a"), Some(&Item::new("a", 0, "foo")));
    assert_eq!(items.get("b"), Some(&Item::new("b", 5, "bar")));
    assert_eq!(written(c), b"get a b\r\n");
}

#[test]
fn test_get_multi_partial_hit() {
    let mut c = client(b"VALUE b 0 2\r\nhi\r\nEND\r\n");
    let items = c.get_multi(&["a", "b", "c"]).unwrap();

    assert_eq!(items.keys().collect::<Vec<_>>(), vec!["b"]);
}

#[test]
fn test_get_multi_accepts_owned_keys() {
    let keys = vec!["x".to_string(), "y".to_string()];
    let mut c = client(b"END\r\n");
    assert!(c.get_multi(&keys).unwrap().is_empty());
    assert_eq!(written(c), b"get x y\r\n");
}

#[test]
fn test_get_hit() {
    let mut c = client(b"VALUE color 32 3\r\nred\r\nEND\r\n");
    let item = c.get("color").unwrap();

    assert_eq!(item.key, "color");
    assert_eq!(item.flags, 32);
    assert_eq!(item.value, b"red");
}

#[test]
fn test_get_miss_is_not_a_protocol_error() {
    let mut c = client(b"END\r\n");
    let err = c.get("missing").unwrap_err();

    assert!(err.is_not_found());
    assert!(!err.is_protocol());
    match err {
        MemlineError::ItemNotFound { key } => assert_eq!(key, "missing"),
        other => panic!("Expected ItemNotFound, got {:?}", other),
    }
}

#[test]
fn test_get_invalid_key_writes_nothing() {
    let mut c = client(b"");
    let err = c.get("two words").unwrap_err();

    assert!(matches!(err, MemlineError::InvalidKey(_)));
    assert!(written(c).is_empty());
}

#[test]
fn test_validation_can_be_disabled() {
    let config = ClientConfig::builder().validate_keys(false).build();
    let mut c = Client::with_transport_and_config(stream(b"END\r\n"), &config);

    assert!(c.get_multi(&["two words"]).unwrap().is_empty());
    assert_eq!(c.into_inner().into_inner().written, b"get two words\r\n");
}

#[test]
fn test_get_connection_closed() {
    let mut c = client(b"VALUE a 0 3\r\n");
    assert!(c.get("a").unwrap_err().is_transport());
}

// =============================================================================
// set
// =============================================================================

#[test]
fn test_set_stored() {
    let mut c = client(b"STORED\r\n");
    c.set("x", b"hello").unwrap();
    assert_eq!(written(c), b"set x 0 0 5 \r\nhello\r\n");
}

#[test]
fn test_set_with_options() {
    let mut c = client(b"STORED\r\n");
    let options = StoreOptions::default().flags(9).exptime(60);
    c.set_with("x", b"v", options).unwrap();
    assert_eq!(written(c), b"set x 9 60 1 \r\nv\r\n");
}

#[test]
fn test_set_failed() {
    let mut c = client(b"SERVER_ERROR object too large for cache\r\n");
    let err = c.set("big", b"a value that is long").unwrap_err();

    match err {
        MemlineError::SetFailed {
            key, value_prefix, ..
        } => {
            assert_eq!(key, "big");
            assert_eq!(value_prefix, "a value th");
        }
        other => panic!("Expected SetFailed, got {:?}", other),
    }
}

#[test]
fn test_set_noreply_reads_nothing() {
    // Whatever the server would say stays unread
    let mut c = client(b"NOT_STORED\r\n");
    c.set_with("x", b"v", StoreOptions::default().noreply(true))
        .unwrap();

    let mock = c.into_inner().into_inner();
    assert_eq!(mock.written, b"set x 0 0 1 noreply\r\nv\r\n");
    assert_eq!(mock.remaining(), b"NOT_STORED\r\n".len());
}

#[test]
fn test_set_then_get_round_trip() {
    let value = b"line one\r\nline two\r\n".to_vec();
    let mut wire = b"STORED\r\n".to_vec();
    wire.extend_from_slice(format!("VALUE k 77 {}\r\n", value.len()).as_bytes());
    wire.extend_from_slice(&value);
    wire.extend_from_slice(b"\r\nEND\r\n");

    let mut c = client(&wire);
    c.set_with("k", &value, StoreOptions::default().flags(77)).unwrap();
    let item = c.get("k").unwrap();

    assert_eq!(item.value, value);
    assert_eq!(item.flags, 77);
}

// =============================================================================
// stats
// =============================================================================

#[test]
fn test_get_stats() {
    let mut c = client(b"STAT pid 7\r\nSTAT version 1.6.21\r\nEND\r\n");
    let stats = c.get_stats().unwrap();

    assert_eq!(stats.keys().collect::<Vec<_>>(), vec!["pid", "version"]);
    assert_eq!(stats.get("version").map(String::as_str), Some("1.6.21"));
    assert_eq!(written(c), b"stats\r\n");
}

#[test]
fn test_print_stats() {
    let mut c = client(b"STAT pid 7\r\nSTAT uptime 100\r\nEND\r\n");
    let mut out = Vec::new();
    c.print_stats(&mut out).unwrap();
    assert_eq!(out, b"pid: 7\nuptime: 100\n");
}

// =============================================================================
// malformed command probe
// =============================================================================

#[test]
fn test_malformed_probe_returns_trimmed_reply() {
    let mut c = client(b"  CLIENT_ERROR bad command line format\r\n");
    let reply = c.send_malformed_command().unwrap();

    assert_eq!(reply, b"CLIENT_ERROR bad command line format");
    assert_eq!(written(c), b"set 0 1\r\n");
}

#[test]
fn test_malformed_probe_connection_dropped() {
    let mut c = Client::with_transport(BufferedStream::new(MockStream::resetting(b"")));
    assert!(c.send_malformed_command().unwrap().is_empty());
}

#[test]
fn test_malformed_probe_respects_limit() {
    let config = ClientConfig::builder().probe_read_limit(5).build();
    let mut c = Client::with_transport_and_config(stream(b"ERROR\r\nmore"), &config);
    assert_eq!(c.send_malformed_command().unwrap(), b"ERROR");
}

// =============================================================================
// SharedClient
// =============================================================================

#[test]
fn test_shared_client_serializes_calls() {
    let shared = SharedClient::new(client(b"STORED\r\nVALUE k 0 1\r\nv\r\nEND\r\n"));
    let other = shared.clone();

    shared.set("k", b"v").unwrap();
    assert_eq!(other.get("k").unwrap().value, b"v");

    let sent = shared.with(|c| c.transport_mut().get_ref().written.clone());
    assert_eq!(sent, b"set k 0 0 1 \r\nv\r\nget k\r\n");
}
