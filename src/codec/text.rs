//! Text/byte conversions
//!
//! The borrowed forms are zero-copy: the returned view lives no longer than
//! its source, and the borrow checker forbids mutating the source while the
//! view is alive. The owned forms make exactly one copy.

use crate::error::Result;

/// Borrow bytes as text without copying
///
/// Fails with `KvError::Utf8` if the bytes are not valid UTF-8.
pub fn bytes_to_str(bytes: &[u8]) -> Result<&str> {
    Ok(std::str::from_utf8(bytes)?)
}

/// Borrow text as bytes without copying
pub fn str_to_bytes(text: &str) -> &[u8] {
    text.as_bytes()
}

/// Copy bytes into an owned `String`
pub fn bytes_to_string(bytes: &[u8]) -> Result<String> {
    bytes_to_str(bytes).map(str::to_owned)
}

/// Copy text into an owned byte vector
pub fn string_to_bytes(text: &str) -> Vec<u8> {
    text.as_bytes().to_vec()
}
