//! Byte-budgeted batch planning.
//!
//! A [`BatchPlan`] turns a total byte budget and a per-batch ceiling into row
//! counts. Every full batch holds as many rows as fit under the ceiling and a
//! final tail batch holds the remainder, so the plan never over- or
//! under-shoots the budget by a whole row.
//!
//! ```text
//! total_rows     = total_bytes / row_bytes
//! rows_per_batch = max(1, max_batch_bytes / row_bytes)
//!
//! |<----- full ----->|<----- full ----->|<- tail ->|
//! ```

use crate::generator::{GenerationSession, GeneratorError};
use loadgen_core::{Batch, SizeModel};
use tracing::debug;

/// Row counts for one byte budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPlan {
    row_bytes: u64,
    total_bytes: u64,
    max_batch_bytes: u64,
    rows_per_batch: u64,
    total_rows: u64,
}

impl BatchPlan {
    /// Plan batches for `total_bytes` under a `max_batch_bytes` ceiling.
    ///
    /// When a single row is larger than the ceiling, every batch holds one
    /// row.
    pub fn new(
        model: &SizeModel,
        total_bytes: u64,
        max_batch_bytes: u64,
    ) -> Result<Self, GeneratorError> {
        if max_batch_bytes == 0 {
            return Err(GeneratorError::InvalidBatchSize(max_batch_bytes));
        }

        let plan = Self {
            row_bytes: model.row_bytes(),
            total_bytes,
            max_batch_bytes,
            rows_per_batch: model.count_for_size(max_batch_bytes).max(1),
            total_rows: model.count_for_size(total_bytes),
        };

        debug!(
            "Planned {} rows in {} batches ({} rows/batch, {} bytes/row) for {} bytes",
            plan.total_rows,
            plan.batch_count(),
            plan.rows_per_batch,
            plan.row_bytes,
            total_bytes
        );

        Ok(plan)
    }

    pub fn row_bytes(&self) -> u64 {
        self.row_bytes
    }

    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    pub fn max_batch_bytes(&self) -> u64 {
        self.max_batch_bytes
    }

    /// Rows in each full batch.
    pub fn rows_per_batch(&self) -> u64 {
        self.rows_per_batch
    }

    /// Rows across all batches.
    pub fn total_rows(&self) -> u64 {
        self.total_rows
    }

    pub fn full_batches(&self) -> u64 {
        self.total_rows / self.rows_per_batch
    }

    /// Rows in the trailing partial batch, zero if there is none.
    pub fn tail_rows(&self) -> u64 {
        self.total_rows % self.rows_per_batch
    }

    pub fn batch_count(&self) -> u64 {
        self.full_batches() + u64::from(self.tail_rows() > 0)
    }

    /// True when the budget is too small for a single row.
    pub fn is_empty(&self) -> bool {
        self.total_rows == 0
    }

    /// Row count of batch `index`, or `None` past the end.
    pub fn batch_rows(&self, index: u64) -> Option<u64> {
        if index < self.full_batches() {
            Some(self.rows_per_batch)
        } else if index == self.full_batches() && self.tail_rows() > 0 {
            Some(self.tail_rows())
        } else {
            None
        }
    }

    /// Byte footprint of the plan's rows according to the size model.
    pub fn planned_bytes(&self) -> u64 {
        self.total_rows * self.row_bytes
    }
}

/// Iterator that lazily generates the batches of a plan.
///
/// Each batch is materialized only when `next` is called. Dropping the
/// iterator early leaves the session's id counter after the last emitted
/// batch.
pub struct Batches<'a> {
    session: &'a mut GenerationSession,
    plan: BatchPlan,
    next_index: u64,
}

impl<'a> Batches<'a> {
    pub(crate) fn new(session: &'a mut GenerationSession, plan: BatchPlan) -> Self {
        Self {
            session,
            plan,
            next_index: 0,
        }
    }

    pub fn plan(&self) -> &BatchPlan {
        &self.plan
    }
}

impl Iterator for Batches<'_> {
    type Item = Batch;

    fn next(&mut self) -> Option<Self::Item> {
        let rows = self.plan.batch_rows(self.next_index)?;
        self.next_index += 1;
        Some(self.session.generate_batch(rows))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.plan.batch_count() - self.next_index) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Batches<'_> {}
