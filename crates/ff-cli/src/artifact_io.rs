use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};

use ff_compiler::{build_filter, BloomFilterArtifact};
use ff_core::Prefilter;

use crate::config::{BuildArgs, LoadedPatterns};

#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub artifact: BloomFilterArtifact,
    pub bytes: Vec<u8>,
    pub patterns: LoadedPatterns,
    pub total_ms: f64,
}

/// Resolve configuration, build the filter and verify the exported bytes load.
pub fn build_artifact_bytes(args: &BuildArgs) -> Result<BuildOutput> {
    let start = Instant::now();

    let config = args.source.file_config()?;
    let params = args.resolve_params(&config)?;
    let patterns = args.source.load_patterns(&config)?;

    let artifact = build_filter(&patterns.set, &params).context("Failed to build prefilter")?;
    let bytes = artifact.to_bytes();

    Prefilter::load(&bytes).context("Generated artifact failed validation")?;

    Ok(BuildOutput {
        artifact,
        bytes,
        patterns,
        total_ms: start.elapsed().as_secs_f64() * 1000.0,
    })
}

/// Write `bytes` to `path` through a temporary sibling file and a rename, so
/// readers never observe a partially written artifact.
pub fn write_artifact(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create '{}'", parent.display()))?;
    }

    let tmp = temp_path(path);
    fs::write(&tmp, bytes).with_context(|| format!("Failed to write '{}'", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("Failed to move '{}' to '{}'", tmp.display(), path.display()))?;
    Ok(())
}

pub fn read_artifact(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Failed to read '{}'", path.display()))
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_and_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("prefilter.ffb");

        let output = build_artifact_bytes(&BuildArgs::default()).unwrap();
        write_artifact(&path, &output.bytes).unwrap();

        let bytes = read_artifact(&path).unwrap();
        assert_eq!(bytes, output.bytes);
        assert!(!dir.path().join("out").join("prefilter.ffb.tmp").exists());

        let prefilter = Prefilter::load(&bytes).unwrap();
        assert_eq!(prefilter.pattern_count(), 5);
    }

    #[test]
    fn test_overwrites_existing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefilter.ffb");
        fs::write(&path, b"stale").unwrap();

        let output = build_artifact_bytes(&BuildArgs::default()).unwrap();
        write_artifact(&path, &output.bytes).unwrap();
        assert_eq!(read_artifact(&path).unwrap(), output.bytes);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_artifact(&dir.path().join("nope.ffb")).is_err());
    }
}
