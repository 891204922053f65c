use ff_core::artifact::{
    artifact_len, header, ArtifactFlags, FFB_MAGIC, FFB_VERSION, HEADER_SIZE, WINDOW_ENTRY_SIZE,
};
use ff_core::hash::crc32_skipping;
use ff_core::positions::{bit_is_set, positions};
use ff_core::{FilterParameters, ParameterError, PatternSet, PositionError};

/// Error type for filter construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("Invalid filter parameters: {0}")]
    Parameters(#[from] ParameterError),
}

/// A built Bloom filter together with everything needed to interpret it.
///
/// Immutable once built. Every refresh produces a new artifact from the full
/// pattern set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BloomFilterArtifact {
    bits: Vec<u8>,
    params: FilterParameters,
    pattern_count: u32,
    window_lengths: Vec<u32>,
}

impl BloomFilterArtifact {
    pub fn params(&self) -> &FilterParameters {
        &self.params
    }

    /// Filter bytes, exactly `ceil(bit_count / 8)` long.
    pub fn bits(&self) -> &[u8] {
        &self.bits
    }

    pub fn pattern_count(&self) -> u32 {
        self.pattern_count
    }

    pub fn window_lengths(&self) -> &[u32] {
        &self.window_lengths
    }

    pub fn set_bit_count(&self) -> u32 {
        self.bits.iter().map(|b| b.count_ones()).sum()
    }

    /// Fraction of bits set.
    pub fn fill_ratio(&self) -> f64 {
        self.set_bit_count() as f64 / self.params.bit_count as f64
    }

    /// Expected false positive rate for one key, `(1 - e^(-k*n/m))^k`.
    pub fn estimated_false_positive_rate(&self) -> f64 {
        let k = self.params.hash_count as f64;
        let n = self.pattern_count as f64;
        let m = self.params.bit_count as f64;
        (1.0 - (-k * n / m).exp()).powf(k)
    }

    /// In-process membership test, same answer as `Prefilter::might_contain`.
    pub fn might_contain(&self, key: &str) -> bool {
        !key.is_empty() && positions(key, &self.params).all(|pos| bit_is_set(&self.bits, pos))
    }

    /// Serialize to the FFB export format.
    pub fn to_bytes(&self) -> Vec<u8> {
        let window_count = self.window_lengths.len();
        let mut buffer = vec![0u8; artifact_len(window_count, self.bits.len())];

        buffer[header::MAGIC..header::MAGIC + 4].copy_from_slice(&FFB_MAGIC);
        write_u16_le(&mut buffer, header::VERSION, FFB_VERSION);
        write_u16_le(&mut buffer, header::FLAGS, ArtifactFlags::HAS_CRC32.bits());
        write_u32_le(&mut buffer, header::HEADER_BYTES, HEADER_SIZE as u32);
        write_u32_le(&mut buffer, header::BIT_COUNT, self.params.bit_count);
        write_u32_le(&mut buffer, header::HASH_COUNT, self.params.hash_count);
        buffer[header::HASH_MODE] = self.params.hash_mode.wire_id();
        write_u32_le(&mut buffer, header::SEED, self.params.hash_mode.seed());
        write_u32_le(&mut buffer, header::PATTERN_COUNT, self.pattern_count);
        write_u32_le(&mut buffer, header::WINDOW_COUNT, window_count as u32);

        for (index, len) in self.window_lengths.iter().enumerate() {
            write_u32_le(&mut buffer, HEADER_SIZE + index * WINDOW_ENTRY_SIZE, *len);
        }

        let bits_offset = HEADER_SIZE + window_count * WINDOW_ENTRY_SIZE;
        buffer[bits_offset..].copy_from_slice(&self.bits);

        let crc = crc32_skipping(&buffer, header::CRC32);
        write_u32_le(&mut buffer, header::CRC32, crc);

        buffer
    }
}

/// Build a Bloom filter over every pattern in `patterns`.
///
/// Pure: allocates the returned artifact and nothing else. Pattern order does
/// not affect the result.
pub fn build_filter(
    patterns: &PatternSet,
    params: &FilterParameters,
) -> Result<BloomFilterArtifact, BuildError> {
    params.validate()?;

    if patterns.is_empty() {
        log::warn!("building prefilter from an empty pattern set");
    }

    let mut bits = vec![0u8; params.byte_len()];
    for pattern in patterns.iter() {
        for pos in positions(pattern, params) {
            let pos = pos as usize;
            bits[pos / 8] |= 1 << (pos % 8);
        }
    }

    let artifact = BloomFilterArtifact {
        bits,
        params: *params,
        pattern_count: patterns.len() as u32,
        window_lengths: patterns.window_lengths(),
    };

    log::debug!(
        "built prefilter: {} patterns, {} bits, k={}, mode={}, {} bits set",
        artifact.pattern_count,
        params.bit_count,
        params.hash_count,
        params.hash_mode.name(),
        artifact.set_bit_count()
    );

    Ok(artifact)
}

/// Why a raw pattern was left out of a batch build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Empty,
    Encoding(PositionError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPattern {
    pub index: usize,
    pub reason: SkipReason,
}

/// Result of [`build_from_raw`].
#[derive(Debug, Clone)]
pub struct RawBuild {
    pub artifact: BloomFilterArtifact,
    pub skipped: Vec<SkippedPattern>,
}

/// Batch build over raw byte patterns.
///
/// Entries that are empty or not UTF-8 are skipped and reported; they do not
/// stop the remaining patterns from being inserted.
pub fn build_from_raw(raw: &[&[u8]], params: &FilterParameters) -> Result<RawBuild, BuildError> {
    params.validate()?;

    let mut accepted = Vec::with_capacity(raw.len());
    let mut skipped = Vec::new();

    for (index, bytes) in raw.iter().enumerate() {
        match std::str::from_utf8(bytes) {
            Ok("") => skipped.push(SkippedPattern { index, reason: SkipReason::Empty }),
            Ok(text) => accepted.push(text),
            Err(e) => {
                log::warn!("skipping pattern #{index}: not valid UTF-8");
                skipped.push(SkippedPattern {
                    index,
                    reason: SkipReason::Encoding(PositionError::InvalidUtf8 {
                        valid_up_to: e.valid_up_to(),
                    }),
                });
            }
        }
    }

    let patterns = PatternSet::new(accepted)?;
    let artifact = build_filter(&patterns, params)?;

    Ok(RawBuild { artifact, skipped })
}

fn write_u16_le(data: &mut [u8], offset: usize, value: u16) {
    let bytes = value.to_le_bytes();
    data[offset..offset + 2].copy_from_slice(&bytes);
}

fn write_u32_le(data: &mut [u8], offset: usize, value: u32) {
    let bytes = value.to_le_bytes();
    data[offset..offset + 4].copy_from_slice(&bytes);
}
