//! Stable string hashing for map keys.
//!
//! Keys are compared by a precomputed CRC-64 instead of by their text. Two
//! distinct keys with the same checksum are treated as the same key.

use crc::{Crc, CRC_64_XZ};

const KEY_CRC: Crc<u64> = Crc::<u64>::new(&CRC_64_XZ);

/// Hash the UTF-8 bytes of `s`. The result is stable across runs and platforms.
pub fn hash_str(s: &str) -> u64 {
    KEY_CRC.checksum(s.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        assert_eq!(hash_str("graphics"), hash_str("graphics"));
    }

    #[test]
    fn distinct_keys_differ() {
        assert_ne!(hash_str("width"), hash_str("height"));
        assert_ne!(hash_str(""), hash_str(" "));
    }

    #[test]
    fn matches_crc64_xz_check_value() {
        assert_eq!(hash_str("123456789"), 0x995d_c9bb_df19_39fa);
    }
}
