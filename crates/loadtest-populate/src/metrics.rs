//! Metrics collected while populating.

use std::ops::AddAssign;
use std::time::Duration;

/// Metrics from a populate operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PopulateMetrics {
    /// Rows the sink reported as inserted.
    pub rows_inserted: u64,
    /// Number of batches handed to the sink.
    pub batches: u64,
    /// Size of the inserted rows according to the size model.
    pub modeled_bytes: u64,
    /// Number of sink flushes.
    pub flushes: u64,
    /// Total time taken.
    pub total_duration: Duration,
    /// Time spent generating data.
    pub generation_duration: Duration,
    /// Time spent inside the sink.
    pub insert_duration: Duration,
}

impl PopulateMetrics {
    /// Calculate rows per second.
    pub fn rows_per_second(&self) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            self.rows_inserted as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Calculate modeled bytes per second.
    pub fn bytes_per_second(&self) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            self.modeled_bytes as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }
}

impl AddAssign<&PopulateMetrics> for PopulateMetrics {
    fn add_assign(&mut self, other: &PopulateMetrics) {
        self.rows_inserted += other.rows_inserted;
        self.batches += other.batches;
        self.modeled_bytes += other.modeled_bytes;
        self.flushes += other.flushes;
        self.total_duration += other.total_duration;
        self.generation_duration += other.generation_duration;
        self.insert_duration += other.insert_duration;
    }
}
