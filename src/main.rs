//! Command-line interface for vecdb-loadgen
//!
//! # Usage Examples
//!
//! ```bash
//! # Stream a byte budget, flushing once at the end
//! vecdb-loadgen populate --preset default --dim 768 --size 512MB
//!
//! # Segment distribution from a YAML file
//! vecdb-loadgen segments --schema collection.yaml --distribution dist.yaml
//!
//! # Fixed-count insert with bounded parallelism
//! vecdb-loadgen parallel --preset default --total-count 120000 --num-per-batch 5000
//!
//! # Batch plan only
//! vecdb-loadgen plan --preset default --size 1GB
//! ```
//!
//! Logging is controlled with `RUST_LOG` (e.g. `RUST_LOG=info`).

use clap::{Parser, Subcommand};
use vecdb_loadgen::loadtest::{run_parallel, run_plan, run_populate, run_segments};
use vecdb_loadgen::{ParallelArgs, PlanArgs, PopulateArgs, SegmentsArgs};

#[derive(Parser)]
#[command(name = "vecdb-loadgen")]
#[command(about = "Schema-driven synthetic data generator for vector database load tests")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Insert one byte budget and flush once
    Populate(PopulateArgs),

    /// Insert one flushed segment per size of a distribution
    Segments(SegmentsArgs),

    /// Insert a fixed row count over concurrent workers
    Parallel(ParallelArgs),

    /// Print the batch plan for a byte budget
    Plan(PlanArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Populate(args) => {
            run_populate(args).await?;
        }
        Commands::Segments(args) => {
            run_segments(args).await?;
        }
        Commands::Parallel(args) => {
            let report = run_parallel(args).await?;
            tracing::info!(
                "Parallel insert finished: {} rows in {} batches, {:?}",
                report.rows_inserted,
                report.batches,
                report.duration
            );
        }
        Commands::Plan(args) => {
            run_plan(args)?;
        }
    }

    Ok(())
}
