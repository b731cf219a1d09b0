//! Tests for text/byte conversions
//!
//! These tests verify:
//! - Borrowed views share the caller's buffer
//! - Owned conversions copy
//! - Invalid UTF-8 is rejected

use kvbench::codec::{bytes_to_str, bytes_to_string, str_to_bytes, string_to_bytes};
use kvbench::KvError;

// =============================================================================
// Text/Byte Conversion Tests
// =============================================================================

#[test]
fn test_bytes_to_str_borrows() {
    let bytes = b"abc".to_vec();
    let text = bytes_to_str(&bytes).unwrap();
    assert_eq!(text, "abc");
    assert_eq!(text.as_ptr(), bytes.as_ptr());
}

#[test]
fn test_str_to_bytes_borrows() {
    let text = String::from("abc");
    let bytes = str_to_bytes(&text);
    assert_eq!(bytes, b"abc");
    assert_eq!(bytes.as_ptr(), text.as_ptr());
}

#[test]
fn test_owned_conversions_copy() {
    let bytes = b"hello".to_vec();
    let text = bytes_to_string(&bytes).unwrap();
    assert_eq!(text, "hello");
    assert_ne!(text.as_ptr(), bytes.as_ptr());

    let back = string_to_bytes(&text);
    assert_eq!(back, bytes);
}

#[test]
fn test_empty_conversions() {
    assert_eq!(bytes_to_str(b"").unwrap(), "");
    assert!(string_to_bytes("").is_empty());
}

#[test]
fn test_invalid_utf8_rejected() {
    let result = bytes_to_str(&[0xff, 0xfe, 0xfd]);
    assert!(matches!(result, Err(KvError::Utf8(_))));
    assert!(bytes_to_string(&[0xc3]).is_err());
}
