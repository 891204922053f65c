//! FocusFeed Prefilter Compiler
//!
//! This crate turns pattern lists into exported Bloom filter artifacts.

pub mod parser;
pub mod optimizer;
pub mod builder;

pub use builder::{
    build_filter, build_from_raw, BloomFilterArtifact, BuildError, RawBuild, SkipReason, SkippedPattern,
};
pub use optimizer::{optimize_patterns, OptimizeStats};
pub use parser::{parse_pattern_list, ParsedList, RejectedLine};
