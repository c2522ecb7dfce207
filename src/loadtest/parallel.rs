//! Parallel insert command runner.

use anyhow::Context;
use loadtest_populate::{
    parallel_insert, CountingSink, InsertSink, JsonlSink, ParallelInsertConfig,
    ParallelInsertReport,
};

use super::ParallelArgs;

/// Insert `args.total_count` rows as independent batches over bounded workers.
pub async fn run_parallel(args: ParallelArgs) -> anyhow::Result<ParallelInsertReport> {
    let schema = args
        .common
        .load_schema()
        .context("Failed to load collection schema")?;
    let collection = schema.name.clone();

    let config = ParallelInsertConfig::new(args.total_count, args.num_per_batch)
        .with_max_workers(args.max_workers);

    if !args.common.dry_run {
        tokio::fs::create_dir_all(&args.common.output_dir)
            .await
            .with_context(|| {
                format!(
                    "Failed to create output directory {:?}",
                    args.common.output_dir
                )
            })?;
    }

    tracing::info!(
        "Inserting {} rows into '{}' in batches of {} with {} workers",
        args.total_count,
        collection,
        args.num_per_batch,
        args.max_workers
    );

    let dry_run = args.common.dry_run;
    let output_dir = args.common.output_dir.clone();
    let report = parallel_insert(
        &schema,
        &config,
        &args.common.session_config(),
        |number| {
            let sink: Box<dyn InsertSink> = if dry_run {
                Box::new(CountingSink::new())
            } else {
                Box::new(JsonlSink::new(
                    &output_dir,
                    &format!("{collection}-batch{number:04}"),
                ))
            };
            Ok(sink)
        },
    )
    .await
    .with_context(|| format!("Parallel insert into '{collection}' failed"))?;

    Ok(report)
}
