//! Core type definitions for FocusFeed
//!
//! These types map directly to the artifact header fields and are shared by
//! the builder and the reader.

use crate::hash::HashMode;

/// Largest accepted bit count (2^31).
pub const MAX_BIT_COUNT: u32 = 1 << 31;

/// Largest accepted probe count per key.
pub const MAX_HASH_COUNT: u32 = 64;

pub const DEFAULT_BIT_COUNT: u32 = 4096;
pub const DEFAULT_HASH_COUNT: u32 = 4;

// =============================================================================
// Parameter Errors
// =============================================================================

/// Malformed filter configuration, detected before anything is built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParameterError {
    #[error("bit count must be positive")]
    ZeroBitCount,
    #[error("hash count must be positive")]
    ZeroHashCount,
    #[error("bit count {0} exceeds maximum of 2^31")]
    BitCountTooLarge(u32),
    #[error("hash count {0} exceeds maximum of 64")]
    HashCountTooLarge(u32),
    #[error("pattern #{index} is empty")]
    EmptyPattern { index: usize },
}

// =============================================================================
// Filter Parameters
// =============================================================================

/// Size, fan-out and hash mode of a filter.
///
/// Must be identical between the artifact that is built and the evaluator
/// that interprets it. A mismatch is not detectable from the bits alone, which
/// is why the artifact header carries every field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FilterParameters {
    pub bit_count: u32,
    pub hash_count: u32,
    pub hash_mode: HashMode,
}

impl Default for FilterParameters {
    fn default() -> Self {
        Self {
            bit_count: DEFAULT_BIT_COUNT,
            hash_count: DEFAULT_HASH_COUNT,
            hash_mode: HashMode::default(),
        }
    }
}

impl FilterParameters {
    /// Create parameters after validating them.
    pub fn new(bit_count: u32, hash_count: u32, hash_mode: HashMode) -> Result<Self, ParameterError> {
        let params = Self { bit_count, hash_count, hash_mode };
        params.validate()?;
        Ok(params)
    }

    /// Reject degenerate or oversized parameters.
    pub fn validate(&self) -> Result<(), ParameterError> {
        if self.bit_count == 0 {
            return Err(ParameterError::ZeroBitCount);
        }
        if self.bit_count > MAX_BIT_COUNT {
            return Err(ParameterError::BitCountTooLarge(self.bit_count));
        }
        if self.hash_count == 0 {
            return Err(ParameterError::ZeroHashCount);
        }
        if self.hash_count > MAX_HASH_COUNT {
            return Err(ParameterError::HashCountTooLarge(self.hash_count));
        }
        Ok(())
    }

    /// Length of the bit array in bytes: `ceil(bit_count / 8)`.
    #[inline]
    pub const fn byte_len(&self) -> usize {
        (self.bit_count as usize).div_ceil(8)
    }
}

// =============================================================================
// Verdict
// =============================================================================

/// Final decision for one URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// No blocked pattern occurs in the URL
    Allow,
    /// At least one blocked pattern occurs in the URL
    Block,
}

impl Verdict {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Block => "block",
        }
    }

    pub const fn is_block(&self) -> bool {
        matches!(self, Self::Block)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_counts() {
        assert_eq!(
            FilterParameters::new(0, 4, HashMode::default()),
            Err(ParameterError::ZeroBitCount)
        );
        assert_eq!(
            FilterParameters::new(4096, 0, HashMode::default()),
            Err(ParameterError::ZeroHashCount)
        );
    }

    #[test]
    fn test_rejects_oversized_counts() {
        assert_eq!(
            FilterParameters::new(MAX_BIT_COUNT + 1, 4, HashMode::default()),
            Err(ParameterError::BitCountTooLarge(MAX_BIT_COUNT + 1))
        );
        assert_eq!(
            FilterParameters::new(64, MAX_HASH_COUNT + 1, HashMode::Sha256Split),
            Err(ParameterError::HashCountTooLarge(MAX_HASH_COUNT + 1))
        );
    }

    #[test]
    fn test_byte_len_rounds_up() {
        let mut params = FilterParameters::default();
        assert_eq!(params.byte_len(), 512);
        params.bit_count = 1;
        assert_eq!(params.byte_len(), 1);
        params.bit_count = 9;
        assert_eq!(params.byte_len(), 2);
        params.bit_count = 16;
        assert_eq!(params.byte_len(), 2);
    }

    #[test]
    fn test_verdict_display() {
        assert_eq!(Verdict::Block.to_string(), "block");
        assert_eq!(Verdict::Allow.to_string(), "allow");
        assert!(Verdict::Block.is_block());
    }
}
