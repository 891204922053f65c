//! FocusFeed CLI
//!
//! CLI tool for building, inspecting and exercising prefilter artifacts.

mod artifact_io;
mod check;
mod config;
mod refresh;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use ff_core::artifact::FFB_VERSION;
use ff_core::Prefilter;

use crate::artifact_io::{build_artifact_bytes, read_artifact, write_artifact};
use crate::check::check_url;
use crate::config::{BuildArgs, PatternArgs};
use crate::refresh::{run_refresh, RefreshOptions};

#[derive(Parser)]
#[command(name = "ff-cli")]
#[command(about = "FocusFeed prefilter builder and tools")]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a prefilter artifact from a pattern set
    Build {
        #[command(flatten)]
        build: BuildArgs,

        /// Output artifact file
        #[arg(short, long, default_value = "prefilter.ffb")]
        output: PathBuf,
    },

    /// Validate a prefilter artifact
    Validate {
        /// Artifact file to validate
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Dump artifact info
    Info {
        /// Artifact file to inspect
        #[arg(short, long)]
        input: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run URLs through the prefilter and the exact verdict
    Check {
        /// Artifact file to test against
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        source: PatternArgs,

        /// URLs to check
        #[arg(required = true)]
        urls: Vec<String>,
    },

    /// Rebuild the artifact on a fixed interval
    Refresh {
        #[command(flatten)]
        build: BuildArgs,

        /// Output artifact file
        #[arg(short, long, default_value = "prefilter.ffb")]
        output: PathBuf,

        /// Seconds between rebuilds
        #[arg(long, default_value_t = 3600)]
        interval: u64,

        /// Stop after this many rebuilds
        #[arg(long)]
        cycles: Option<u64>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Build { build, output } => cmd_build(&build, &output),
        Commands::Validate { input } => cmd_validate(&input),
        Commands::Info { input, json } => cmd_info(&input, json),
        Commands::Check { input, source, urls } => cmd_check(&input, &source, &urls),
        Commands::Refresh { build, output, interval, cycles } => run_refresh(RefreshOptions {
            build,
            output,
            interval: Duration::from_secs(interval.max(1)),
            cycles,
        })
        .map(|_| ()),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_build(args: &BuildArgs, output: &Path) -> Result<()> {
    let built = build_artifact_bytes(args)?;
    write_artifact(output, &built.bytes)?;

    let artifact = &built.artifact;
    let params = artifact.params();
    println!("Built prefilter '{}'", output.display());
    println!("  Patterns:  {} from {} ({} duplicates removed, {} lines rejected)",
        artifact.pattern_count(),
        built.patterns.origin,
        built.patterns.deduped,
        built.patterns.rejected.len(),
    );
    println!("  Filter:    {} bits, k={}, mode={} (seed {:#010x})",
        params.bit_count, params.hash_count, params.hash_mode.name(), params.hash_mode.seed());
    println!("  Set bits:  {} ({:.3}% full, est. FP rate {:.2e})",
        artifact.set_bit_count(),
        artifact.fill_ratio() * 100.0,
        artifact.estimated_false_positive_rate(),
    );
    println!("  Size:      {} bytes", built.bytes.len());
    println!("  Time:      {:.1}ms", built.total_ms);

    Ok(())
}

fn cmd_validate(input: &Path) -> Result<()> {
    let bytes = read_artifact(input)?;
    let prefilter = Prefilter::load(&bytes).context("Invalid artifact")?;

    println!("Artifact '{}' is valid", input.display());
    println!("  Version:   {}", FFB_VERSION);
    println!("  Patterns:  {}", prefilter.pattern_count());
    println!("  Size:      {} bytes", bytes.len());

    Ok(())
}

#[derive(Serialize)]
struct ArtifactInfo {
    version: u16,
    size_bytes: usize,
    bit_count: u32,
    hash_count: u32,
    hash_mode: &'static str,
    seed: u32,
    pattern_count: u32,
    window_lengths: Vec<u32>,
    set_bits: u32,
    fill_ratio: f64,
}

fn cmd_info(input: &Path, json: bool) -> Result<()> {
    let bytes = read_artifact(input)?;
    let prefilter = Prefilter::load(&bytes).context("Invalid artifact")?;
    let params = prefilter.params();

    let info = ArtifactInfo {
        version: FFB_VERSION,
        size_bytes: bytes.len(),
        bit_count: params.bit_count,
        hash_count: params.hash_count,
        hash_mode: params.hash_mode.name(),
        seed: params.hash_mode.seed(),
        pattern_count: prefilter.pattern_count(),
        window_lengths: prefilter.window_lengths().collect(),
        set_bits: prefilter.set_bit_count(),
        fill_ratio: prefilter.set_bit_count() as f64 / params.bit_count as f64,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("Artifact: {}", input.display());
    println!("  Magic:       FFB1");
    println!("  Version:     {}", info.version);
    println!("  Total size:  {} bytes", info.size_bytes);
    println!();
    println!("Filter:");
    println!("  Bits:        {}", info.bit_count);
    println!("  Hashes:      {}", info.hash_count);
    println!("  Mode:        {} (seed {:#010x})", info.hash_mode, info.seed);
    println!("  Set bits:    {} ({:.3}% full)", info.set_bits, info.fill_ratio * 100.0);
    println!();
    println!("Patterns:");
    println!("  Count:       {}", info.pattern_count);
    println!("  Lengths:     {:?}", info.window_lengths);

    Ok(())
}

fn cmd_check(input: &Path, source: &PatternArgs, urls: &[String]) -> Result<()> {
    let bytes = read_artifact(input)?;
    let prefilter = Prefilter::load(&bytes).context("Invalid artifact")?;

    let config = source.file_config()?;
    let patterns = source.load_patterns(&config)?;
    if patterns.set.len() as u32 != prefilter.pattern_count() {
        tracing::warn!(
            artifact = prefilter.pattern_count(),
            local = patterns.set.len(),
            "pattern count differs from the artifact; was it built from the same list?"
        );
    }

    for url in urls {
        let outcome = check_url(&prefilter, &patterns.set, url);
        println!("{:<5}  {}  ({})", outcome.verdict, url, outcome.describe());
    }

    Ok(())
}
