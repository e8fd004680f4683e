//! Filename hashing used to index records inside the data archives.
//!
//! Matches the reference implementation's signed 16/32-bit arithmetic
//! exactly, including the sign-extension of individual filename bytes
//! and the borrow that can propagate from `h2` into `h1`'s half of the
//! combined 32-bit value when `h2` is negative.

/// Right-to-left polynomial hash, truncated to 16 bits.
fn hash1(name: &[u8], seed: i32) -> u16 {
    let mut h: i32 = 0;
    for &c in name.iter().rev() {
        h = h.wrapping_mul(seed).wrapping_add((c as i8) as i32);
    }
    (h & 0xFFFF) as u16
}

/// Position-weighted hash over all but the last character, truncated to 16 bits.
fn hash2(name: &[u8]) -> u16 {
    let mut h: i32 = 0;
    if !name.is_empty() {
        for (i, &c) in name[..name.len() - 1].iter().enumerate() {
            h = h.wrapping_add((i as i32).wrapping_mul((c as i8) as i32));
        }
    }
    (h & 0xFFFF) as u16
}

/// Computes the 32-bit filename identifier stored in archive records.
pub fn filename_hash(name: &str) -> u32 {
    let bytes = name.as_bytes();
    let h1 = hash1(bytes, 0x101) as i16;
    let h2 = hash2(bytes) as i16;
    (((h1 as i32) << 16).wrapping_add(h2 as i32)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        assert_eq!(filename_hash("ACCO.LZ"), filename_hash("ACCO.LZ"));
        assert_eq!(filename_hash("COMPASS.LZ"), filename_hash("COMPASS.LZ"));
        assert_eq!(filename_hash("THEME.MUS"), filename_hash("THEME.MUS"));
    }

    /// Frozen against the reference implementation's `calcFilenameHash`, per
    /// spec's golden-test-vector mandate for these three engine filenames.
    #[test]
    fn matches_reference_golden_vectors() {
        assert_eq!(filename_hash("COMPASS.LZ"), 0x3cea0a10);
        assert_eq!(filename_hash("ACCO.LZ"), 0x07ea03ea);
        assert_eq!(filename_hash("THEME.MUS"), 0x6e9607d4);
    }

    #[test]
    fn different_names_usually_differ() {
        assert_ne!(filename_hash("COMPASS.LZ"), filename_hash("WATER.LZ"));
        assert_ne!(filename_hash("ACCO.LZ"), filename_hash("ACCOCOLR.BIN"));
    }

    #[test]
    fn single_character_name_has_empty_hash2_range() {
        // hash2 sums over indices 0..len-1, so a one-character name never
        // touches any byte and always contributes zero to the low half.
        assert_eq!(hash2(b"A"), 0);
    }

    #[test]
    fn hash1_scans_right_to_left() {
        // Swapping the first and last byte changes hash1 (which weights
        // the last byte first) but not a hash2-style left-to-right sum
        // missing the last byte entirely, so the two names collide on
        // hash2 while differing on hash1.
        assert_ne!(hash1(b"AB", 0x101), hash1(b"BA", 0x101));
    }
}
