//! Fixed-count inserts spread over a bounded pool of concurrent workers.
//!
//! The total row count is cut into `total_count / num_per_batch` batches.
//! Batch `n` runs in its own generation session seeded with `n` and starting
//! at row id `n * num_per_batch`, so batches never share primary keys and
//! each one reproduces the same values on every run.

use crate::error::PopulatorError;
use crate::sink::InsertSink;
use loadgen_core::CollectionSchema;
use loadtest_generator::{GenerationSession, GeneratorError, SessionConfig, MAX_ROW_ID};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tracing::info;

/// Default number of batches in flight.
pub const DEFAULT_MAX_WORKERS: usize = 12;

/// Shape of a parallel insert run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParallelInsertConfig {
    pub total_count: u64,
    pub num_per_batch: u64,
    pub max_workers: usize,
}

impl ParallelInsertConfig {
    pub fn new(total_count: u64, num_per_batch: u64) -> Self {
        Self {
            total_count,
            num_per_batch,
            max_workers: DEFAULT_MAX_WORKERS,
        }
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    /// Number of whole batches; a remainder smaller than one batch is dropped.
    pub fn batch_count(&self) -> u64 {
        self.total_count / self.num_per_batch
    }
}

/// Outcome of a parallel insert run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParallelInsertReport {
    pub batches: u64,
    pub rows_inserted: u64,
    pub duration: Duration,
}

impl ParallelInsertReport {
    pub fn rows_per_second(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.rows_inserted as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// Insert all batches with at most `config.max_workers` running at once.
///
/// The first failing batch ends the run; batches still in flight are
/// aborted.
///
/// `make_sink` is called once per batch number to give each batch its own
/// sink. `base` supplies shape, key strategy and partition value; start id
/// and seed are overridden per batch.
pub async fn parallel_insert<S, F>(
    schema: &CollectionSchema,
    config: &ParallelInsertConfig,
    base: &SessionConfig,
    make_sink: F,
) -> Result<ParallelInsertReport, PopulatorError>
where
    S: InsertSink + 'static,
    F: Fn(u64) -> Result<S, PopulatorError>,
{
    if config.num_per_batch == 0 {
        return Err(PopulatorError::Config(
            "num_per_batch must be positive".to_string(),
        ));
    }
    if config.max_workers == 0 {
        return Err(PopulatorError::Config(
            "max_workers must be positive".to_string(),
        ));
    }

    // Reject bad schemas once, before spawning anything
    GenerationSession::new(schema.clone(), base.clone())?;

    let num_per_batch = config.num_per_batch;
    let batch_count = config.batch_count();
    let total_rows = batch_count * num_per_batch;
    if total_rows > MAX_ROW_ID + 1 {
        return Err(GeneratorError::IdSpaceExhausted {
            next_id: 0,
            count: total_rows,
        }
        .into());
    }

    let start_time = Instant::now();
    let schema = Arc::new(schema.clone());

    // Dropping the set on an early return aborts the remaining tasks
    let mut tasks = JoinSet::new();
    let mut next_number = 0;
    let mut report = ParallelInsertReport::default();

    loop {
        while next_number < batch_count && tasks.len() < config.max_workers {
            let number = next_number;
            next_number += 1;

            let session_config = base
                .clone()
                .with_start_id(number * num_per_batch)
                .with_seed(number);
            let sink = make_sink(number)?;
            tasks.spawn(insert_one(
                number,
                Arc::clone(&schema),
                session_config,
                sink,
                num_per_batch,
            ));
        }

        let Some(joined) = tasks.join_next().await else {
            break;
        };
        report.rows_inserted += joined??;
        report.batches += 1;
    }
    report.duration = start_time.elapsed();

    info!(
        "Inserted {} batches of entities in {:?} ({:.2} rows/sec)",
        report.batches,
        report.duration,
        report.rows_per_second()
    );
    info!(
        "Inserted num_entities: {}. Actual num_entities: {}",
        batch_count * num_per_batch,
        report.rows_inserted
    );

    Ok(report)
}

async fn insert_one<S: InsertSink>(
    number: u64,
    schema: Arc<CollectionSchema>,
    config: SessionConfig,
    mut sink: S,
    num_per_batch: u64,
) -> Result<u64, PopulatorError> {
    info!("No.{number:2}: Start inserting entities");

    // Generation is CPU-bound, keep it off the async workers
    let batch = tokio::task::spawn_blocking(move || {
        let mut session = GenerationSession::new((*schema).clone(), config)?;
        session.next_batch(num_per_batch)
    })
    .await??;
    let inserted = sink.insert(&batch).await?;
    if inserted != num_per_batch {
        return Err(PopulatorError::InsertCountMismatch {
            batch: number,
            expected: num_per_batch,
            actual: inserted,
        });
    }
    sink.flush().await?;

    info!("No.{number:2}: Finish inserting entities");
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::CountingSink;
    use async_trait::async_trait;
    use loadgen_core::{Batch, FieldDescriptor, FieldKind};
    use std::sync::Mutex;

    fn schema() -> CollectionSchema {
        CollectionSchema::new(
            "bench",
            vec![
                FieldDescriptor::primary("pk", FieldKind::Int64),
                FieldDescriptor::new("random", FieldKind::Double),
                FieldDescriptor::new("embeddings", FieldKind::FloatVector { dim: 8 }),
            ],
        )
        .unwrap()
    }

    /// Records the id range of every inserted batch.
    struct RecordingSink {
        ranges: Arc<Mutex<Vec<std::ops::Range<u64>>>>,
    }

    #[async_trait]
    impl InsertSink for RecordingSink {
        async fn insert(&mut self, batch: &Batch) -> Result<u64, PopulatorError> {
            self.ranges.lock().unwrap().push(batch.id_range());
            Ok(batch.row_count)
        }

        async fn flush(&mut self) -> Result<(), PopulatorError> {
            Ok(())
        }
    }

    /// Drops one row of every batch.
    struct LossySink;

    #[async_trait]
    impl InsertSink for LossySink {
        async fn insert(&mut self, batch: &Batch) -> Result<u64, PopulatorError> {
            Ok(batch.row_count - 1)
        }

        async fn flush(&mut self) -> Result<(), PopulatorError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_parallel_insert_partitions_ids() {
        let ranges = Arc::new(Mutex::new(Vec::new()));
        let config = ParallelInsertConfig::new(10_000, 1_000).with_max_workers(4);

        let report = parallel_insert(&schema(), &config, &SessionConfig::default(), |_| {
            Ok(RecordingSink {
                ranges: Arc::clone(&ranges),
            })
        })
        .await
        .unwrap();

        assert_eq!(report.batches, 10);
        assert_eq!(report.rows_inserted, 10_000);

        let mut ranges = ranges.lock().unwrap().clone();
        ranges.sort_by_key(|r| r.start);
        let expected: Vec<_> = (0..10u64).map(|n| n * 1000..(n + 1) * 1000).collect();
        assert_eq!(ranges, expected);
    }

    #[tokio::test]
    async fn test_remainder_dropped() {
        let config = ParallelInsertConfig::new(2_500, 1_000);
        let report = parallel_insert(&schema(), &config, &SessionConfig::default(), |_| {
            Ok(CountingSink::new())
        })
        .await
        .unwrap();

        assert_eq!(report.batches, 2);
        assert_eq!(report.rows_inserted, 2_000);
    }

    #[tokio::test]
    async fn test_insert_count_mismatch() {
        let config = ParallelInsertConfig::new(100, 50).with_max_workers(1);
        let result =
            parallel_insert(&schema(), &config, &SessionConfig::default(), |_| Ok(LossySink)).await;

        assert!(matches!(
            result,
            Err(PopulatorError::InsertCountMismatch {
                expected: 50,
                actual: 49,
                ..
            })
        ));
    }

    /// Fails batch 0 at once; every other batch waits before recording.
    struct SlowSink {
        number: u64,
        finished: Arc<Mutex<Vec<u64>>>,
    }

    #[async_trait]
    impl InsertSink for SlowSink {
        async fn insert(&mut self, batch: &Batch) -> Result<u64, PopulatorError> {
            if self.number == 0 {
                return Err(PopulatorError::Sink("rejected".to_string()));
            }
            tokio::time::sleep(Duration::from_millis(200)).await;
            self.finished.lock().unwrap().push(self.number);
            Ok(batch.row_count)
        }

        async fn flush(&mut self) -> Result<(), PopulatorError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_failure_aborts_batches_in_flight() {
        let finished = Arc::new(Mutex::new(Vec::new()));
        let config = ParallelInsertConfig::new(400, 100).with_max_workers(4);

        let result = parallel_insert(&schema(), &config, &SessionConfig::default(), |number| {
            Ok(SlowSink {
                number,
                finished: Arc::clone(&finished),
            })
        })
        .await;
        assert!(matches!(result, Err(PopulatorError::Sink(_))));

        // Aborted tasks never get to record
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(finished.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_key_space_overflow_rejected() {
        let config = ParallelInsertConfig::new(u64::MAX, 1 << 62);
        let result = parallel_insert(&schema(), &config, &SessionConfig::default(), |_| {
            Ok(CountingSink::new())
        })
        .await;
        assert!(matches!(
            result,
            Err(PopulatorError::Generator(GeneratorError::IdSpaceExhausted { .. }))
        ));
    }

    #[tokio::test]
    async fn test_zero_batch_size_rejected() {
        let config = ParallelInsertConfig::new(100, 0);
        let result = parallel_insert(&schema(), &config, &SessionConfig::default(), |_| {
            Ok(CountingSink::new())
        })
        .await;
        assert!(matches!(result, Err(PopulatorError::Config(_))));
    }
}
