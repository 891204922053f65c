//! Hash functions for the FocusFeed prefilter
//!
//! Two hash modes exist and an artifact records exactly one of them:
//!
//! - `Murmur3`: two seeded passes of Murmur3 x86 32-bit (`seed`, `seed + 1`).
//! - `Sha256Split`: the first and second eight bytes of SHA-256, little-endian.
//!
//! The two modes produce different bit layouts. Builder and evaluator must
//! agree bit-for-bit, so all arithmetic here is wrapping and width-exact.

use sha2::{Digest, Sha256};

/// Default seed for the Murmur3 mode.
pub const DEFAULT_SEED: u32 = 0x5F37_59DF;

/// Wire identifier for [`HashMode::Murmur3`].
pub const MODE_MURMUR3: u8 = 1;

/// Wire identifier for [`HashMode::Sha256Split`].
pub const MODE_SHA256_SPLIT: u8 = 2;

/// How the two base hashes of a key are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashMode {
    /// `h1 = murmur3_32(key, seed)`, `h2 = murmur3_32(key, seed + 1)`.
    Murmur3 { seed: u32 },
    /// `h1`, `h2` = bytes `0..8` and `8..16` of SHA-256(key).
    Sha256Split,
}

impl Default for HashMode {
    fn default() -> Self {
        Self::Murmur3 { seed: DEFAULT_SEED }
    }
}

impl HashMode {
    /// Identifier stored in the artifact header.
    #[inline]
    pub const fn wire_id(&self) -> u8 {
        match self {
            Self::Murmur3 { .. } => MODE_MURMUR3,
            Self::Sha256Split => MODE_SHA256_SPLIT,
        }
    }

    /// Seed stored in the artifact header (0 for modes without one).
    #[inline]
    pub const fn seed(&self) -> u32 {
        match self {
            Self::Murmur3 { seed } => *seed,
            Self::Sha256Split => 0,
        }
    }

    /// Rebuild a mode from its header fields.
    pub const fn from_wire(id: u8, seed: u32) -> Option<Self> {
        match id {
            MODE_MURMUR3 => Some(Self::Murmur3 { seed }),
            MODE_SHA256_SPLIT => Some(Self::Sha256Split),
            _ => None,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Murmur3 { .. } => "murmur3",
            Self::Sha256Split => "sha256-split",
        }
    }

    /// Derive the two base hashes for `data`.
    #[inline]
    pub fn pair(&self, data: &[u8]) -> HashPair {
        match *self {
            Self::Murmur3 { seed } => HashPair::Narrow {
                h1: murmur3_32(data, seed),
                h2: murmur3_32(data, seed.wrapping_add(1)),
            },
            Self::Sha256Split => {
                let (h1, h2) = sha256_pair(data);
                HashPair::Wide { h1, h2 }
            }
        }
    }
}

/// Two independent base hashes for one key, in the width of their mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashPair {
    Narrow { h1: u32, h2: u32 },
    Wide { h1: u64, h2: u64 },
}

impl HashPair {
    /// Position of probe `i`: `(h1 + i * h2) mod bit_count`, wrapping in the
    /// hash width before the reduction.
    #[inline]
    pub fn probe(&self, i: u32, bit_count: u32) -> u32 {
        match *self {
            Self::Narrow { h1, h2 } => h1.wrapping_add(i.wrapping_mul(h2)) % bit_count,
            Self::Wide { h1, h2 } => {
                let h = h1.wrapping_add((i as u64).wrapping_mul(h2));
                (h % bit_count as u64) as u32
            }
        }
    }
}

/// Murmur3 32-bit hash implementation.
/// Optimized for short strings (typical pattern and URL window lengths).
#[inline]
pub fn murmur3_32(data: &[u8], seed: u32) -> u32 {
    const C1: u32 = 0xcc9e2d51;
    const C2: u32 = 0x1b873593;

    let len = data.len();
    let mut h = seed;

    let mut blocks = data.chunks_exact(4);
    for block in &mut blocks {
        let k = u32::from_le_bytes([block[0], block[1], block[2], block[3]]);
        let k = k.wrapping_mul(C1).rotate_left(15).wrapping_mul(C2);

        h ^= k;
        h = h.rotate_left(13);
        h = h.wrapping_mul(5).wrapping_add(0xe6546b64);
    }

    // Tail: 0..=3 bytes, never read past the slice
    let tail = blocks.remainder();
    let mut k: u32 = 0;
    if tail.len() >= 3 {
        k ^= (tail[2] as u32) << 16;
    }
    if tail.len() >= 2 {
        k ^= (tail[1] as u32) << 8;
    }
    if !tail.is_empty() {
        k ^= tail[0] as u32;
        h ^= k.wrapping_mul(C1).rotate_left(15).wrapping_mul(C2);
    }

    // Finalization
    h ^= len as u32;
    h ^= h >> 16;
    h = h.wrapping_mul(0x85ebca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2ae35);
    h ^= h >> 16;

    h
}

/// First and second 64-bit little-endian words of SHA-256(data).
pub fn sha256_pair(data: &[u8]) -> (u64, u64) {
    let digest = Sha256::digest(data);
    let mut lo = [0u8; 8];
    let mut hi = [0u8; 8];
    lo.copy_from_slice(&digest[..8]);
    hi.copy_from_slice(&digest[8..16]);
    (u64::from_le_bytes(lo), u64::from_le_bytes(hi))
}

/// Compute CRC32 for artifact integrity checking.
/// Uses the standard CRC32 polynomial (IEEE 802.3).
pub fn crc32(data: &[u8]) -> u32 {
    crc32_update(0xffffffff, data) ^ 0xffffffff
}

/// Feed `data` into a running (non-finalized) CRC32 state.
pub(crate) fn crc32_update(mut crc: u32, data: &[u8]) -> u32 {
    static CRC32_TABLE: [u32; 256] = {
        let mut table = [0u32; 256];
        let mut i = 0;
        while i < 256 {
            let mut c = i as u32;
            let mut j = 0;
            while j < 8 {
                c = if c & 1 != 0 {
                    0xedb88320 ^ (c >> 1)
                } else {
                    c >> 1
                };
                j += 1;
            }
            table[i] = c;
            i += 1;
        }
        table
    };

    for &byte in data {
        crc = CRC32_TABLE[((crc ^ byte as u32) & 0xff) as usize] ^ (crc >> 8);
    }
    crc
}

/// CRC32 over `data` with the four bytes at `skip..skip + 4` left out.
///
/// Panics if `data.len() < skip + 4`; callers pass a buffer that already
/// holds a full header.
pub fn crc32_skipping(data: &[u8], skip: usize) -> u32 {
    let crc = crc32_update(0xffffffff, &data[..skip]);
    crc32_update(crc, &data[skip + 4..]) ^ 0xffffffff
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_murmur3_reference_vectors() {
        assert_eq!(murmur3_32(b"", 0), 0);
        assert_eq!(murmur3_32(b"", 1), 0x514e28b7);
        assert_eq!(murmur3_32(b"test", 0), 0xba6bd213);
        assert_eq!(murmur3_32(b"Hello, world!", 1234), 0xfaf6cdb3);
    }

    #[test]
    fn test_murmur3_golden_shorts() {
        assert_eq!(murmur3_32(b"/shorts/", DEFAULT_SEED), 0x7642c3f7);
        assert_eq!(murmur3_32(b"/shorts/", DEFAULT_SEED + 1), 0xb4c57dcc);
    }

    #[test]
    fn test_murmur3_different_seeds() {
        let h1 = murmur3_32(b"example.com", 0);
        let h2 = murmur3_32(b"example.com", 1);
        assert_ne!(h1, h2);
    }

    #[test]
    fn test_murmur3_tail_lengths() {
        // 2- and 3-byte tails
        assert_eq!(murmur3_32(b"ab", 0), 0x9bbfd75f);
        assert_eq!(murmur3_32(b"abc", 0), 0xb3dd93fa);
        assert_eq!(murmur3_32(b"reel_watch_sequence", DEFAULT_SEED), 0x081116a1);
        assert_eq!(murmur3_32(b"reel_item_watch", DEFAULT_SEED), 0xdcb96efb);
        assert_eq!(murmur3_32(b"el=shortspage", DEFAULT_SEED), 0xab0d595f);
    }

    #[test]
    fn test_sha256_pair_golden_shorts() {
        let (h1, h2) = sha256_pair(b"/shorts/");
        assert_eq!(h1, 0x8203d04a00878fe9);
        assert_eq!(h2, 0x03d899a2c2cc265a);
    }

    #[test]
    fn test_mode_wire_round_trip() {
        let murmur = HashMode::Murmur3 { seed: 42 };
        assert_eq!(HashMode::from_wire(murmur.wire_id(), murmur.seed()), Some(murmur));
        assert_eq!(HashMode::from_wire(MODE_SHA256_SPLIT, 0), Some(HashMode::Sha256Split));
        assert_eq!(HashMode::from_wire(0, 0), None);
        assert_eq!(HashMode::default().seed(), DEFAULT_SEED);
    }

    #[test]
    fn test_narrow_probe_wraps_in_32_bits() {
        let pair = HashPair::Narrow { h1: u32::MAX, h2: 2 };
        // u32::MAX + 2 wraps to 1
        assert_eq!(pair.probe(1, 1000), 1);
    }

    #[test]
    fn test_wide_probe_wraps_in_64_bits() {
        let pair = HashPair::Wide { h1: u64::MAX, h2: 2 };
        assert_eq!(pair.probe(1, 1000), 1);
    }

    #[test]
    fn test_crc32_known_value() {
        assert_eq!(crc32(b"123456789"), 0xcbf43926);
    }

    #[test]
    #[should_panic]
    fn test_crc32_skipping_short_buffer_panics() {
        crc32_skipping(&[0u8; 6], 4);
    }

    #[test]
    fn test_crc32_skipping_matches_manual_concat() {
        let data = [1u8, 2, 3, 4, 5, 6, 7, 8, 9, 10];
        let mut manual = Vec::new();
        manual.extend_from_slice(&data[..3]);
        manual.extend_from_slice(&data[7..]);
        assert_eq!(crc32_skipping(&data, 3), crc32(&manual));
    }
}
