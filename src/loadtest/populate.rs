//! Populate command runner.

use anyhow::Context;
use loadtest_generator::GenerationSession;
use loadtest_populate::{PopulateMetrics, SegmentPopulator};

use super::{open_sink, PopulateArgs};

/// Stream `args.size` worth of rows into the sink and flush once.
pub async fn run_populate(args: PopulateArgs) -> anyhow::Result<PopulateMetrics> {
    let schema = args
        .common
        .load_schema()
        .context("Failed to load collection schema")?;
    let collection = schema.name.clone();

    let session = GenerationSession::new(schema, args.common.session_config())
        .with_context(|| format!("Invalid schema for collection '{collection}'"))?;

    tracing::info!(
        "Populating '{}' with {} ({} bytes per row, seed={:?})",
        collection,
        args.size,
        session.size_model().row_bytes(),
        args.common.seed
    );

    let sink = open_sink(&args.common, &collection).await?;
    let mut populator = SegmentPopulator::new(session, sink, args.common.max_batch_bytes())?;

    let metrics = populator
        .stream_insert(args.size)
        .await
        .with_context(|| format!("Failed to populate collection '{collection}'"))?;

    tracing::info!(
        "Populated {}: {} rows in {} batches, {:?} ({:.2} rows/sec)",
        collection,
        metrics.rows_inserted,
        metrics.batches,
        metrics.total_duration,
        metrics.rows_per_second()
    );

    Ok(metrics)
}
