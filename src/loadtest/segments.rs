//! Segments command runner.

use anyhow::Context;
use loadtest_generator::GenerationSession;
use loadtest_populate::{PopulateMetrics, SegmentDistribution, SegmentPopulator};

use super::{open_sink, SegmentsArgs};

/// Produce one flushed segment per size of the distribution.
pub async fn run_segments(args: SegmentsArgs) -> anyhow::Result<Vec<PopulateMetrics>> {
    let schema = args
        .common
        .load_schema()
        .context("Failed to load collection schema")?;

    let dist = match &args.distribution {
        Some(path) => SegmentDistribution::from_file(path)
            .with_context(|| format!("Failed to load segment distribution from {path:?}"))?,
        None if !args.sizes.is_empty() => {
            SegmentDistribution::new(schema.name.clone(), args.sizes.clone())
        }
        None => anyhow::bail!("either --distribution or --sizes is required"),
    };

    if dist.collection_name != schema.name {
        tracing::warn!(
            "Distribution targets '{}' but schema is '{}'",
            dist.collection_name,
            schema.name
        );
    }

    let session = GenerationSession::new(schema, args.common.session_config())
        .context("Invalid collection schema")?;
    let sink = open_sink(&args.common, &dist.collection_name).await?;
    let mut populator = SegmentPopulator::new(session, sink, args.common.max_batch_bytes())?;

    let segments = populator
        .populate_distribution(&dist)
        .await
        .with_context(|| format!("Failed to populate segments for {dist}"))?;

    let total_rows: u64 = segments.iter().map(|m| m.rows_inserted).sum();
    tracing::info!(
        "Generated {} segments, {} rows in total",
        segments.len(),
        total_rows
    );

    Ok(segments)
}
