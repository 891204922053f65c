//! Bit position derivation
//!
//! Each key yields `hash_count` positions in `[0, bit_count)` from only two
//! base hashes, `position_i = (h1 + i * h2) mod bit_count`. Collisions between
//! positions are allowed; setting or testing a bit twice is harmless.

use crate::hash::HashPair;
use crate::types::FilterParameters;

/// Raw bytes that were expected to be UTF-8 but are not.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    #[error("input is not valid UTF-8 (valid up to byte {valid_up_to})")]
    InvalidUtf8 { valid_up_to: usize },
}

/// Allocation-free iterator over the bit positions of one key.
#[derive(Debug, Clone)]
pub struct Positions {
    pair: HashPair,
    bit_count: u32,
    next: u32,
    count: u32,
}

impl Positions {
    fn empty() -> Self {
        Self {
            pair: HashPair::Narrow { h1: 0, h2: 0 },
            bit_count: 1,
            next: 0,
            count: 0,
        }
    }
}

impl Iterator for Positions {
    type Item = u32;

    #[inline]
    fn next(&mut self) -> Option<u32> {
        if self.next >= self.count {
            return None;
        }
        let pos = self.pair.probe(self.next, self.bit_count);
        self.next += 1;
        Some(pos)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.count - self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Positions {}

/// Positions of a string key (hashed as its UTF-8 bytes).
#[inline]
pub fn positions(input: &str, params: &FilterParameters) -> Positions {
    positions_of_bytes(input.as_bytes(), params)
}

/// Positions of a byte key. Empty input yields no positions.
///
/// `params` must already be valid; a zero `bit_count` yields no positions
/// rather than dividing by zero.
pub fn positions_of_bytes(data: &[u8], params: &FilterParameters) -> Positions {
    if data.is_empty() || params.bit_count == 0 {
        return Positions::empty();
    }
    Positions {
        pair: params.hash_mode.pair(data),
        bit_count: params.bit_count,
        next: 0,
        count: params.hash_count,
    }
}

/// Positions of raw bytes that must decode as UTF-8.
pub fn positions_of_utf8(data: &[u8], params: &FilterParameters) -> Result<Positions, PositionError> {
    let text = std::str::from_utf8(data)
        .map_err(|e| PositionError::InvalidUtf8 { valid_up_to: e.valid_up_to() })?;
    Ok(positions(text, params))
}

/// Test whether bit `pos` is set in a little-endian-within-byte bit array.
#[inline]
pub fn bit_is_set(bits: &[u8], pos: u32) -> bool {
    let pos = pos as usize;
    bits.get(pos / 8).is_some_and(|byte| byte & (1 << (pos % 8)) != 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::HashMode;

    fn params(bit_count: u32, hash_count: u32) -> FilterParameters {
        FilterParameters { bit_count, hash_count, hash_mode: HashMode::default() }
    }

    #[test]
    fn test_golden_positions_for_shorts() {
        let got: Vec<u32> = positions("/shorts/", &params(4096, 4)).collect();
        assert_eq!(got, vec![1015, 451, 3983, 3419]);
    }

    #[test]
    fn test_golden_positions_sha256_mode() {
        let p = FilterParameters { hash_mode: HashMode::Sha256Split, ..params(4096, 4) };
        let got: Vec<u32> = positions("/shorts/", &p).collect();
        assert_eq!(got, vec![4073, 1603, 3229, 759]);
    }

    #[test]
    fn test_yields_exactly_hash_count_positions_in_bounds() {
        for &(m, k) in &[(1u32, 1u32), (7, 3), (4096, 4), (100_003, 13)] {
            let got: Vec<u32> = positions("reel_item_watch", &params(m, k)).collect();
            assert_eq!(got.len(), k as usize);
            assert!(got.iter().all(|&p| p < m));
        }
    }

    #[test]
    fn test_deterministic_across_calls() {
        let p = params(4096, 7);
        let a: Vec<u32> = positions("el=shortspage", &p).collect();
        let b: Vec<u32> = positions("el=shortspage", &p).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_input_has_no_positions() {
        assert_eq!(positions("", &params(4096, 4)).count(), 0);
    }

    #[test]
    fn test_invalid_utf8_is_reported() {
        let err = positions_of_utf8(b"ab\xffcd", &params(4096, 4)).unwrap_err();
        assert_eq!(err, PositionError::InvalidUtf8 { valid_up_to: 2 });
        assert!(positions_of_utf8(b"/shorts/", &params(4096, 4)).is_ok());
    }

    #[test]
    fn test_bit_is_set_reads_low_bit_first() {
        let bits = [0b0000_0010u8, 0b1000_0000];
        assert!(bit_is_set(&bits, 1));
        assert!(!bit_is_set(&bits, 0));
        assert!(bit_is_set(&bits, 15));
        assert!(!bit_is_set(&bits, 16));
    }
}
