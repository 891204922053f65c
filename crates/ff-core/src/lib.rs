//! FocusFeed Core Library
//!
//! This crate provides the read side of the FocusFeed URL prefilter: the hash
//! primitives, bit position derivation, the blocked pattern set and the exact
//! verdict engine, plus a zero-copy reader for exported filter artifacts.
//!
//! # Architecture
//!
//! Filtering is a two-stage protocol. A Bloom filter artifact built from the
//! pattern set is tested first; only URLs it reports as "maybe member" are
//! handed to the exact [`verdict`] stage. The two stages share nothing but the
//! artifact parameters, so neither calls the other here.
//!
//! # Modules
//!
//! - `hash`: Murmur3 and SHA-256 derived hash pairs, CRC32
//! - `positions`: double-hashing bit position derivation
//! - `patterns`: the immutable blocked pattern set
//! - `verdict`: exact case-insensitive substring confirmation
//! - `artifact`: binary artifact format and the `Prefilter` reader
//! - `types`: filter parameters, verdicts and parameter errors

pub mod artifact;
pub mod hash;
pub mod patterns;
pub mod positions;
pub mod types;
pub mod verdict;

// Re-export commonly used types
pub use artifact::{ArtifactError, Prefilter};
pub use hash::{murmur3_32, HashMode, HashPair};
pub use patterns::PatternSet;
pub use positions::{positions, positions_of_bytes, positions_of_utf8, PositionError, Positions};
pub use types::{FilterParameters, ParameterError, Verdict};
pub use verdict::verdict;
