//! FFB Artifact Format and Reader
//!
//! This module provides the binary layout and zero-copy reader
//! for exported prefilter artifacts.

mod format;
mod loader;

pub use format::*;
pub use loader::*;
