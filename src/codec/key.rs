//! Key codec
//!
//! Digit text ⇄ u64 ⇄ 8-byte big-endian binary key.

use crate::error::{KvError, Result};

/// Width of a binary key in bytes
pub const KEY_SIZE: usize = 8;

/// Fixed-width big-endian key
pub type BinaryKey = [u8; KEY_SIZE];

/// Parse decimal digit text into an integer key
///
/// Accepts ASCII digits only, leading zeros allowed. Empty text, signs,
/// whitespace and values above `u64::MAX` are rejected with `KvError::Parse`.
pub fn digits_to_integer(text: &str) -> Result<u64> {
    if text.is_empty() {
        return Err(parse_error(text, "empty input"));
    }

    // u64::from_str also takes a leading '+', which digit text must not carry
    if let Some(pos) = text.bytes().position(|b| !b.is_ascii_digit()) {
        return Err(parse_error(
            text,
            &format!("non-digit character at byte {}", pos),
        ));
    }

    text.parse::<u64>()
        .map_err(|_| parse_error(text, "value exceeds 18446744073709551615"))
}

/// Parse decimal digit text straight into a binary key
pub fn digits_to_binary(text: &str) -> Result<BinaryKey> {
    digits_to_integer(text).map(integer_to_binary)
}

/// Encode an integer as a big-endian binary key
pub fn integer_to_binary(n: u64) -> BinaryKey {
    n.to_be_bytes()
}

/// Decode the first 8 bytes of `bytes` as a big-endian integer
///
/// Bytes past the eighth are ignored. Shorter input fails with
/// `KvError::Length`.
pub fn binary_to_integer(bytes: &[u8]) -> Result<u64> {
    let head: BinaryKey = bytes
        .get(..KEY_SIZE)
        .and_then(|head| head.try_into().ok())
        .ok_or(KvError::Length {
            expected: KEY_SIZE,
            actual: bytes.len(),
        })?;

    Ok(u64::from_be_bytes(head))
}

/// Decode a binary key into canonical digit text ("0" for zero, no leading zeros)
pub fn binary_to_digits(bytes: &[u8]) -> Result<String> {
    binary_to_integer(bytes).map(|n| n.to_string())
}

fn parse_error(input: &str, reason: &str) -> KvError {
    KvError::Parse {
        input: input.to_string(),
        reason: reason.to_string(),
    }
}
