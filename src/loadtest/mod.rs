//! Loadgen command handlers.
//!
//! This module contains the argument types and handlers for the populate,
//! segments, parallel and plan commands.

pub mod parallel;
pub mod plan;
pub mod populate;
pub mod segments;

use anyhow::Context;
use clap::Args;
use loadgen_core::Size;
use loadtest_populate::{CommonPopulateArgs, CountingSink, InsertSink, JsonlSink};
use std::path::PathBuf;

pub use parallel::run_parallel;
pub use plan::run_plan;
pub use populate::run_populate;
pub use segments::run_segments;

/// Arguments for streaming one byte budget into a sink.
#[derive(Args, Clone, Debug)]
pub struct PopulateArgs {
    #[command(flatten)]
    pub common: CommonPopulateArgs,

    /// Total modeled size to insert (e.g. 1GB, 256MB)
    #[arg(long)]
    pub size: Size,
}

/// Arguments for producing one sealed segment per listed size.
#[derive(Args, Clone, Debug)]
pub struct SegmentsArgs {
    #[command(flatten)]
    pub common: CommonPopulateArgs,

    /// Segment distribution YAML file
    #[arg(long, conflicts_with = "sizes")]
    pub distribution: Option<PathBuf>,

    /// Segment sizes, comma-separated (e.g. 16MB,32MB)
    #[arg(long, value_delimiter = ',')]
    pub sizes: Vec<Size>,
}

/// Arguments for a fixed-count insert over concurrent workers.
#[derive(Args, Clone, Debug)]
pub struct ParallelArgs {
    #[command(flatten)]
    pub common: CommonPopulateArgs,

    /// Total number of rows to insert
    #[arg(long)]
    pub total_count: u64,

    /// Rows per batch; each batch is one worker task
    #[arg(long, default_value = "5000")]
    pub num_per_batch: u64,

    /// Maximum number of batches in flight
    #[arg(long, default_value_t = loadtest_populate::DEFAULT_MAX_WORKERS)]
    pub max_workers: usize,
}

/// Arguments for printing a batch plan without generating rows.
#[derive(Args, Clone, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub common: CommonPopulateArgs,

    /// Total modeled size to plan for
    #[arg(long)]
    pub size: Size,
}

/// Open the sink selected by the common arguments.
pub(crate) async fn open_sink(
    common: &CommonPopulateArgs,
    prefix: &str,
) -> anyhow::Result<Box<dyn InsertSink>> {
    if common.dry_run {
        tracing::info!("[DRY-RUN] Rows are generated and counted but not written");
        return Ok(Box::new(CountingSink::new()));
    }

    let sink = JsonlSink::create(&common.output_dir, prefix)
        .await
        .with_context(|| format!("Failed to create output directory {:?}", common.output_dir))?;
    Ok(Box::new(sink))
}
