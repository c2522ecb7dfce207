//! Plan command runner.

use anyhow::Context;
use loadgen_core::SizeModel;
use loadtest_generator::BatchPlan;

use super::PlanArgs;

/// Compute the batch plan for `args.size` and print it as JSON.
pub fn run_plan(args: PlanArgs) -> anyhow::Result<BatchPlan> {
    let schema = args
        .common
        .load_schema()
        .context("Failed to load collection schema")?;
    let model = SizeModel::new(&schema)
        .with_context(|| format!("Cannot size collection '{}'", schema.name))?;
    let plan = BatchPlan::new(&model, args.size.as_bytes(), args.common.max_batch_bytes())?;

    tracing::info!(
        "Plan for '{}': {} rows in {} batches ({} full, {} tail rows)",
        schema.name,
        plan.total_rows(),
        plan.batch_count(),
        plan.full_batches(),
        plan.tail_rows()
    );

    let summary = serde_json::json!({
        "collection": schema.name,
        "bytes_per_row": plan.row_bytes(),
        "total_bytes": plan.total_bytes(),
        "max_batch_bytes": plan.max_batch_bytes(),
        "rows_per_batch": plan.rows_per_batch(),
        "batch_count": plan.batch_count(),
        "total_rows": plan.total_rows(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(plan)
}
