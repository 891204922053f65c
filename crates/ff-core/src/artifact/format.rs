//! FFB Artifact Format v1 Constants
//!
//! All values are little-endian.

/// Magic bytes: "FFB1"
pub const FFB_MAGIC: [u8; 4] = [0x46, 0x46, 0x42, 0x31];

/// Current format version
pub const FFB_VERSION: u16 = 1;

/// Header size in bytes
pub const HEADER_SIZE: usize = 40;

/// Size of one window length entry
pub const WINDOW_ENTRY_SIZE: usize = 4;

// =============================================================================
// Header Field Offsets
// =============================================================================

/// Header field byte offsets.
pub mod header {
    /// u8[4] magic = "FFB1"
    pub const MAGIC: usize = 0;
    /// u16 version
    pub const VERSION: usize = 4;
    /// u16 flags
    pub const FLAGS: usize = 6;
    /// u32 headerBytes (always 40)
    pub const HEADER_BYTES: usize = 8;
    /// u32 bitCount
    pub const BIT_COUNT: usize = 12;
    /// u32 hashCount
    pub const HASH_COUNT: usize = 16;
    /// u8 hash mode id, followed by 3 reserved bytes
    pub const HASH_MODE: usize = 20;
    /// u32 seed (0 when the mode has none)
    pub const SEED: usize = 24;
    /// u32 number of patterns the filter was built from
    pub const PATTERN_COUNT: usize = 28;
    /// u32 number of window length entries
    pub const WINDOW_COUNT: usize = 32;
    /// u32 CRC32 of every other byte in the artifact
    pub const CRC32: usize = 36;
}

bitflags::bitflags! {
    /// Header flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ArtifactFlags: u16 {
        /// Artifact includes CRC32 checksum
        const HAS_CRC32 = 1 << 0;
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Total artifact length for the given window count and filter byte length.
#[inline]
pub const fn artifact_len(window_count: usize, filter_bytes: usize) -> usize {
    HEADER_SIZE + window_count * WINDOW_ENTRY_SIZE + filter_bytes
}

/// Validate magic bytes.
#[inline]
pub fn validate_magic(data: &[u8]) -> bool {
    data.len() >= 4 && data[header::MAGIC..header::MAGIC + 4] == FFB_MAGIC
}

/// Read u16 little-endian.
#[inline]
pub fn read_u16_le(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

/// Read u32 little-endian.
#[inline]
pub fn read_u32_le(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([data[offset], data[offset + 1], data[offset + 2], data[offset + 3]])
}
