//! Byte-budgeted population of an insert sink.

use crate::distribution::SegmentDistribution;
use crate::error::PopulatorError;
use crate::metrics::PopulateMetrics;
use crate::sink::InsertSink;
use loadgen_core::Size;
use loadtest_generator::{BatchPlan, GenerationSession, GeneratorError};
use std::time::{Duration, Instant};
use tracing::{debug, info};

const MIB: f64 = 1024.0 * 1024.0;

/// Drives one generation session into one sink.
///
/// Row ids keep counting across every call, so consecutive segments never
/// reuse a primary key.
pub struct SegmentPopulator<S: InsertSink> {
    session: GenerationSession,
    sink: S,
    max_batch_bytes: u64,
}

impl<S: InsertSink> SegmentPopulator<S> {
    /// Create a populator emitting batches of at most `max_batch_bytes`.
    pub fn new(
        session: GenerationSession,
        sink: S,
        max_batch_bytes: u64,
    ) -> Result<Self, PopulatorError> {
        if max_batch_bytes == 0 {
            return Err(GeneratorError::InvalidBatchSize(max_batch_bytes).into());
        }
        Ok(Self {
            session,
            sink,
            max_batch_bytes,
        })
    }

    pub fn session(&self) -> &GenerationSession {
        &self.session
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Plan for `total_bytes` without generating anything.
    pub fn plan(&self, total_bytes: u64) -> Result<BatchPlan, PopulatorError> {
        Ok(BatchPlan::new(
            &self.session.size_model(),
            total_bytes,
            self.max_batch_bytes,
        )?)
    }

    /// Insert `total_bytes` worth of rows without flushing.
    pub async fn insert_bytes(&mut self, total_bytes: u64) -> Result<PopulateMetrics, PopulatorError> {
        let start_time = Instant::now();
        let plan = self.plan(total_bytes)?;
        let mut metrics = PopulateMetrics::default();

        info!(
            "Inserting {:.2}MB into '{}' in batches of {:.2}MB ({} rows in {} batches)",
            total_bytes as f64 / MIB,
            self.session.schema().name,
            self.max_batch_bytes as f64 / MIB,
            plan.total_rows(),
            plan.batch_count()
        );

        let mut generation_time = Duration::ZERO;
        let mut insert_time = Duration::ZERO;
        let mut batches = self.session.batches_for(plan)?;

        loop {
            let gen_start = Instant::now();
            let Some(batch) = batches.next() else {
                break;
            };
            generation_time += gen_start.elapsed();

            let insert_start = Instant::now();
            let inserted = self.sink.insert(&batch).await?;
            insert_time += insert_start.elapsed();

            metrics.rows_inserted += inserted;
            metrics.batches += 1;
            metrics.modeled_bytes += batch.modeled_bytes;

            debug!(
                "Inserted {}/{} bytes, batch rows: {}",
                metrics.modeled_bytes,
                plan.planned_bytes(),
                inserted
            );
        }

        metrics.generation_duration = generation_time;
        metrics.insert_duration = insert_time;
        metrics.total_duration = start_time.elapsed();
        Ok(metrics)
    }

    /// Insert `size` worth of rows and flush, sealing one segment.
    pub async fn populate_segment(&mut self, size: Size) -> Result<PopulateMetrics, PopulatorError> {
        let start_time = Instant::now();
        let mut metrics = self.insert_bytes(size.as_bytes()).await?;

        let flush_start = Instant::now();
        self.sink.flush().await?;
        metrics.insert_duration += flush_start.elapsed();
        metrics.flushes += 1;
        metrics.total_duration = start_time.elapsed();

        info!(
            "One segment num rows: {}, size: {} ({:.2}MB modeled) in {:?}",
            metrics.rows_inserted,
            size,
            metrics.modeled_bytes as f64 / MIB,
            metrics.total_duration
        );

        Ok(metrics)
    }

    /// Produce one segment per entry of `dist`, in order.
    pub async fn populate_distribution(
        &mut self,
        dist: &SegmentDistribution,
    ) -> Result<Vec<PopulateMetrics>, PopulatorError> {
        info!(
            "Generating {} segments for {}",
            dist.size_dist.len(),
            dist
        );

        let mut segments = Vec::with_capacity(dist.size_dist.len());
        for size in &dist.size_dist {
            segments.push(self.populate_segment(*size).await?);
        }
        Ok(segments)
    }

    /// Insert `size` worth of rows as a stream and flush once at the end.
    pub async fn stream_insert(&mut self, size: Size) -> Result<PopulateMetrics, PopulatorError> {
        let start_time = Instant::now();
        let mut metrics = self.insert_bytes(size.as_bytes()).await?;
        self.sink.flush().await?;
        metrics.flushes += 1;
        metrics.total_duration = start_time.elapsed();

        info!(
            "Loaded num rows: {}, size: {} ({:.2} rows/sec)",
            metrics.rows_inserted,
            size,
            metrics.rows_per_second()
        );
        Ok(metrics)
    }
}
