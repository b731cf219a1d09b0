//! Codec Module
//!
//! Pure, stateless conversions between the three forms of a key and
//! between text and raw bytes.
//!
//! ## Key Forms
//! ```text
//!   digit text          integer             binary key
//!  ┌───────────┐      ┌────────────┐      ┌─────────────────────────┐
//!  │ "123456"  │ ───▶ │ 123456u64  │ ───▶ │ 00 00 00 00 00 01 e2 40 │
//!  └───────────┘ ◀─── └────────────┘ ◀─── └─────────────────────────┘
//! ```
//!
//! Binary keys are big-endian, so comparing two binary keys byte by byte
//! gives the same answer as comparing the integers. Any ordered backend
//! can therefore keep numeric keys in plain lexicographic order.
//!
//! All functions are free of shared state and safe to call from any thread.
//! Malformed input is reported through `KvError`, never by panicking and
//! never by returning a zero or empty key.

mod key;
mod text;

pub use key::{
    binary_to_digits, binary_to_integer, digits_to_binary, digits_to_integer, integer_to_binary,
    BinaryKey, KEY_SIZE,
};
pub use text::{bytes_to_str, bytes_to_string, str_to_bytes, string_to_bytes};
