//! Zero-copy FFB Artifact Reader

use crate::hash::{crc32_skipping, HashMode};
use crate::positions::{bit_is_set, positions_of_bytes};
use crate::types::{FilterParameters, ParameterError};
use super::format::*;

/// Error type for artifact loading.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Invalid magic bytes")]
    InvalidMagic,
    #[error("Unsupported version: {0}")]
    UnsupportedVersion(u16),
    #[error("Unexpected header size: {0}")]
    InvalidHeaderSize(u32),
    #[error("Unknown hash mode: {0}")]
    UnknownHashMode(u8),
    #[error("Invalid filter parameters: {0}")]
    InvalidParameters(#[from] ParameterError),
    #[error("Length mismatch: expected {expected} bytes, found {found}")]
    LengthMismatch { expected: usize, found: usize },
    #[error("CRC32 mismatch: stored={stored:#010x}, computed={computed:#010x}")]
    Crc32Mismatch { stored: u32, computed: u32 },
    #[error("Data too short")]
    DataTooShort,
}

/// Zero-copy view of an exported prefilter artifact.
///
/// This is the first stage of the filtering protocol, tested the same way an
/// external evaluator tests the exported bytes.
#[derive(Debug, Clone, Copy)]
pub struct Prefilter<'a> {
    params: FilterParameters,
    flags: ArtifactFlags,
    pattern_count: u32,
    windows: &'a [u8],
    bits: &'a [u8],
}

impl<'a> Prefilter<'a> {
    /// Load an artifact from bytes.
    pub fn load(data: &'a [u8]) -> Result<Self, ArtifactError> {
        if data.len() < HEADER_SIZE {
            return Err(ArtifactError::DataTooShort);
        }

        if !validate_magic(data) {
            return Err(ArtifactError::InvalidMagic);
        }

        let version = read_u16_le(data, header::VERSION);
        if version != FFB_VERSION {
            return Err(ArtifactError::UnsupportedVersion(version));
        }

        let header_bytes = read_u32_le(data, header::HEADER_BYTES);
        if header_bytes as usize != HEADER_SIZE {
            return Err(ArtifactError::InvalidHeaderSize(header_bytes));
        }

        let flags = ArtifactFlags::from_bits_truncate(read_u16_le(data, header::FLAGS));
        let mode_id = data[header::HASH_MODE];
        let seed = read_u32_le(data, header::SEED);
        let hash_mode =
            HashMode::from_wire(mode_id, seed).ok_or(ArtifactError::UnknownHashMode(mode_id))?;

        let params = FilterParameters {
            bit_count: read_u32_le(data, header::BIT_COUNT),
            hash_count: read_u32_le(data, header::HASH_COUNT),
            hash_mode,
        };
        params.validate()?;

        let pattern_count = read_u32_le(data, header::PATTERN_COUNT);
        let window_count = read_u32_le(data, header::WINDOW_COUNT) as usize;

        let expected = window_count
            .checked_mul(WINDOW_ENTRY_SIZE)
            .and_then(|w| w.checked_add(HEADER_SIZE + params.byte_len()))
            .ok_or(ArtifactError::DataTooShort)?;
        if data.len() != expected {
            return Err(ArtifactError::LengthMismatch { expected, found: data.len() });
        }

        if flags.contains(ArtifactFlags::HAS_CRC32) {
            let stored = read_u32_le(data, header::CRC32);
            let computed = crc32_skipping(data, header::CRC32);
            if stored != computed {
                return Err(ArtifactError::Crc32Mismatch { stored, computed });
            }
        }

        let bits_offset = HEADER_SIZE + window_count * WINDOW_ENTRY_SIZE;
        Ok(Self {
            params,
            flags,
            pattern_count,
            windows: &data[HEADER_SIZE..bits_offset],
            bits: &data[bits_offset..],
        })
    }

    pub fn params(&self) -> &FilterParameters {
        &self.params
    }

    pub fn flags(&self) -> ArtifactFlags {
        self.flags
    }

    /// Number of patterns the filter was built from.
    pub fn pattern_count(&self) -> u32 {
        self.pattern_count
    }

    /// The raw filter bits, `ceil(bit_count / 8)` bytes.
    pub fn bits(&self) -> &'a [u8] {
        self.bits
    }

    /// Pattern byte lengths recorded by the builder.
    pub fn window_lengths(&self) -> impl Iterator<Item = u32> + 'a {
        self.windows
            .chunks_exact(WINDOW_ENTRY_SIZE)
            .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
    }

    /// Number of bits set to 1.
    pub fn set_bit_count(&self) -> u32 {
        self.bits.iter().map(|b| b.count_ones()).sum()
    }

    /// `false` means `key` is definitely not a pattern; `true` means maybe.
    #[inline]
    pub fn might_contain(&self, key: &str) -> bool {
        self.might_contain_bytes(key.as_bytes())
    }

    pub fn might_contain_bytes(&self, key: &[u8]) -> bool {
        if key.is_empty() {
            return false;
        }
        positions_of_bytes(key, &self.params).all(|pos| bit_is_set(self.bits, pos))
    }

    /// `false` means no pattern can occur in `url`; `true` means the URL must
    /// go to the exact verdict stage.
    ///
    /// Every byte window of the lowercased URL whose length is a recorded
    /// pattern length is tested. A pattern occurring in the URL is exactly
    /// one of those windows, so this never misses a blocked URL.
    pub fn might_match_url(&self, url: &str) -> bool {
        let url = url.to_lowercase();
        let bytes = url.as_bytes();
        self.window_lengths().any(|len| {
            let len = len as usize;
            len != 0
                && len <= bytes.len()
                && bytes.windows(len).any(|window| self.might_contain_bytes(window))
        })
    }
}
