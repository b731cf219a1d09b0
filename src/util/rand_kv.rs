//! Random test data
//!
//! Filler values for benchmarks and tests.

use rand::Rng;

use crate::codec::{integer_to_binary, BinaryKey};

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// `n` random bytes drawn from `[a-zA-Z0-9]`
pub fn random_string(n: usize) -> Vec<u8> {
    random_string_with(&mut rand::thread_rng(), n)
}

/// Same as `random_string`, driven by the caller's RNG (for seeded runs)
pub fn random_string_with<R: Rng>(rng: &mut R, n: usize) -> Vec<u8> {
    (0..n)
        .map(|_| LETTERS[rng.gen_range(0..LETTERS.len())])
        .collect()
}

/// Binary key for test index `i`
pub fn get_test_key(i: u64) -> BinaryKey {
    integer_to_binary(i)
}

/// Recognizable value for test index `i`
pub fn get_test_value(i: u64) -> Vec<u8> {
    let mut value = format!("kvbench-value-{:09}-", i).into_bytes();
    value.extend(random_string(16));
    value
}
