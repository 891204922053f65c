//! Build configuration
//!
//! Values are resolved in order: command-line flags, then the JSON config
//! file, then built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};

use ff_compiler::{optimize_patterns, parse_pattern_list, RejectedLine};
use ff_core::hash::DEFAULT_SEED;
use ff_core::types::{DEFAULT_BIT_COUNT, DEFAULT_HASH_COUNT};
use ff_core::{FilterParameters, HashMode, PatternSet};

/// Hash mode as written in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashModeConfig {
    Murmur3 { seed: u32 },
    Sha256Split,
}

impl From<HashModeConfig> for HashMode {
    fn from(mode: HashModeConfig) -> Self {
        match mode {
            HashModeConfig::Murmur3 { seed } => HashMode::Murmur3 { seed },
            HashModeConfig::Sha256Split => HashMode::Sha256Split,
        }
    }
}

/// JSON config file contents. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub bit_count: Option<u32>,
    pub hash_count: Option<u32>,
    pub hash_mode: Option<HashModeConfig>,
    pub patterns: Option<Vec<String>>,
    pub patterns_file: Option<PathBuf>,
}

impl FileConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Invalid config file")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read '{}'", path.display()))?;
        let mut config = Self::from_json(&text)
            .with_context(|| format!("Failed to parse '{}'", path.display()))?;

        // Pattern files are relative to the config file
        if let Some(file) = config.patterns_file.take() {
            let base = path.parent().unwrap_or_else(|| Path::new("."));
            config.patterns_file = Some(base.join(file));
        }
        Ok(config)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Murmur3,
    Sha256,
}

/// Where the pattern set comes from.
#[derive(Args, Debug, Clone, Default)]
pub struct PatternArgs {
    /// Pattern list file (one substring per line)
    #[arg(short, long)]
    pub patterns: Option<PathBuf>,

    /// JSON config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Filter parameters and pattern source for a build.
#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    #[command(flatten)]
    pub source: PatternArgs,

    /// Filter size in bits
    #[arg(long)]
    pub bits: Option<u32>,

    /// Bit positions per pattern
    #[arg(long)]
    pub hashes: Option<u32>,

    /// Hash mode
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Murmur3 seed (decimal or 0x-prefixed hex)
    #[arg(long, value_parser = parse_seed)]
    pub seed: Option<u32>,
}

/// A pattern set together with how it was obtained.
#[derive(Debug, Clone)]
pub struct LoadedPatterns {
    pub set: PatternSet,
    pub origin: String,
    pub rejected: Vec<RejectedLine>,
    pub deduped: usize,
}

pub fn parse_seed(text: &str) -> Result<u32, String> {
    let text = text.trim();
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => text.parse::<u32>(),
    };
    parsed.map_err(|e| format!("invalid seed '{text}': {e}"))
}

impl PatternArgs {
    pub fn file_config(&self) -> Result<FileConfig> {
        match &self.config {
            Some(path) => FileConfig::load(path),
            None => Ok(FileConfig::default()),
        }
    }

    /// Load the pattern set from the first configured source.
    pub fn load_patterns(&self, config: &FileConfig) -> Result<LoadedPatterns> {
        let file = self.patterns.as_ref().or(config.patterns_file.as_ref());

        let (mut patterns, origin, rejected) = if let Some(path) = file {
            let data = fs::read(path)
                .with_context(|| format!("Failed to read '{}'", path.display()))?;
            let parsed = parse_pattern_list(&data);
            (parsed.patterns, path.display().to_string(), parsed.rejected)
        } else if let Some(list) = &config.patterns {
            (list.clone(), "config".to_string(), Vec::new())
        } else {
            let set = PatternSet::default();
            return Ok(LoadedPatterns {
                set,
                origin: "built-in".to_string(),
                rejected: Vec::new(),
                deduped: 0,
            });
        };

        for rejected in &rejected {
            tracing::warn!(line = rejected.line, error = %rejected.error, "skipped pattern line");
        }

        let stats = optimize_patterns(&mut patterns);
        let set = PatternSet::new(&patterns).context("Invalid pattern set")?;

        Ok(LoadedPatterns {
            set,
            origin,
            rejected,
            deduped: stats.deduped,
        })
    }
}

impl BuildArgs {
    /// Resolve filter parameters from flags, config file and defaults.
    pub fn resolve_params(&self, config: &FileConfig) -> Result<FilterParameters> {
        let bit_count = self.bits.or(config.bit_count).unwrap_or(DEFAULT_BIT_COUNT);
        let hash_count = self.hashes.or(config.hash_count).unwrap_or(DEFAULT_HASH_COUNT);

        let configured: Option<HashMode> = config.hash_mode.map(HashMode::from);
        let hash_mode = match (self.mode, configured) {
            (Some(ModeArg::Sha256), _) => HashMode::Sha256Split,
            (Some(ModeArg::Murmur3), Some(HashMode::Murmur3 { seed })) => HashMode::Murmur3 { seed },
            (Some(ModeArg::Murmur3), _) => HashMode::Murmur3 { seed: DEFAULT_SEED },
            (None, Some(mode)) => mode,
            (None, None) => HashMode::default(),
        };

        let hash_mode = match (hash_mode, self.seed) {
            (HashMode::Murmur3 { .. }, Some(seed)) => HashMode::Murmur3 { seed },
            (HashMode::Sha256Split, Some(_)) => {
                bail!("--seed only applies to the murmur3 hash mode")
            }
            (mode, None) => mode,
        };

        FilterParameters::new(bit_count, hash_count, hash_mode).context("Invalid filter parameters")
    }
}
