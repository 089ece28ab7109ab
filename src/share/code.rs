//! Access code generation.
//!
//! Codes are short, human-typable identifiers drawn uniformly from an
//! uppercase alphanumeric alphabet. Uniqueness is enforced against the
//! store; generation only guarantees the format.

use rand::Rng;

/// Alphabet the access codes are drawn from.
pub const ACCESS_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of a generated access code.
///
/// 36^8 combinations, so collisions against realistic record counts are
/// rare; the store-side retry loop handles the remainder.
pub const ACCESS_CODE_LENGTH: usize = 8;

/// Generate a random access code.
pub fn generate_access_code() -> String {
    let mut rng = rand::rng();
    (0..ACCESS_CODE_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..ACCESS_CODE_ALPHABET.len());
            ACCESS_CODE_ALPHABET[idx] as char
        })
        .collect()
}
