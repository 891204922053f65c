//! Periodic artifact refresh
//!
//! Rebuilds the prefilter from its sources on a fixed cadence and replaces the
//! exported file. Each cycle starts from the full pattern set; a failed cycle
//! is logged and the previous artifact stays in place.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::time::{interval, MissedTickBehavior};

use crate::artifact_io::{build_artifact_bytes, write_artifact};
use crate::config::BuildArgs;

pub struct RefreshOptions {
    pub build: BuildArgs,
    pub output: PathBuf,
    pub interval: Duration,
    /// Stop after this many cycles; run until Ctrl-C when `None`.
    pub cycles: Option<u64>,
}

/// Cycles run before the loop stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    pub completed: u64,
    pub failed: u64,
}

pub fn run_refresh(opts: RefreshOptions) -> Result<RefreshSummary> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start runtime")?;
    runtime.block_on(refresh_loop(opts))
}

async fn refresh_loop(opts: RefreshOptions) -> Result<RefreshSummary> {
    let mut ticker = interval(opts.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::info!(
        output = %opts.output.display(),
        interval_secs = opts.interval.as_secs(),
        "starting prefilter refresh"
    );

    let mut summary = RefreshSummary::default();
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                tracing::info!(completed = summary.completed, failed = summary.failed, "refresh stopped");
                return Ok(summary);
            }
        }

        match refresh_once(&opts) {
            Ok(set_bits) => {
                tracing::info!(cycle = summary.completed + 1, set_bits, "prefilter refreshed")
            }
            Err(e) => {
                tracing::error!(cycle = summary.completed + 1, "refresh failed: {e:#}");
                summary.failed += 1;
            }
        }

        summary.completed += 1;
        if opts.cycles.is_some_and(|limit| summary.completed >= limit) {
            return Ok(summary);
        }
    }
}

fn refresh_once(opts: &RefreshOptions) -> Result<u32> {
    let output = build_artifact_bytes(&opts.build)?;
    write_artifact(&opts.output, &output.bytes)?;
    Ok(output.artifact.set_bit_count())
}
