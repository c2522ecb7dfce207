//! Generation sessions that produce batches of synthetic rows.

use crate::generators::{FieldGenerator, ValueGenerator};
use crate::planner::{BatchPlan, Batches};
use loadgen_core::{
    Batch, BatchData, CollectionSchema, Column, OutputShape, Row, SchemaError, SizeModel,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Error type for generator operations.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// Batch ceiling that cannot hold anything
    #[error("Invalid batch size: {0} bytes, must be positive")]
    InvalidBatchSize(u64),

    /// Schema error
    #[error("Schema error: {0}")]
    SchemaError(#[from] SchemaError),

    /// Start id outside the Int64 key space
    #[error("Start id {0} exceeds the largest Int64 key")]
    StartIdOutOfRange(u64),

    /// Not enough Int64 ids left for the requested rows
    #[error("Cannot allocate {count} row ids from {next_id}: Int64 key space exhausted")]
    IdSpaceExhausted { next_id: u64, count: u64 },
}

/// Largest row id; row ids double as Int64 keys.
pub const MAX_ROW_ID: u64 = i64::MAX as u64;

/// How non-auto-generated Int64 primary keys are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryKeyStrategy {
    /// `start_id + ordinal`, unique within the session
    #[default]
    Sequential,
    /// Random 63-bit keys, unique across independent runs
    Unique,
}

impl FromStr for PrimaryKeyStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sequential" => Ok(Self::Sequential),
            "unique" => Ok(Self::Unique),
            other => Err(format!(
                "unknown primary key strategy '{other}' (expected sequential or unique)"
            )),
        }
    }
}

impl fmt::Display for PrimaryKeyStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequential => f.write_str("sequential"),
            Self::Unique => f.write_str("unique"),
        }
    }
}

/// Per-session generation settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionConfig {
    /// Row id of the first generated row
    pub start_id: u64,
    /// RNG seed; `None` seeds from OS entropy
    pub seed: Option<u64>,
    pub primary_key: PrimaryKeyStrategy,
    /// Value forced into the partition key of every row
    pub partition_value: Option<i64>,
    pub shape: OutputShape,
}

impl SessionConfig {
    /// Settings for parallel worker `worker_index` inserting `num_per_batch`
    /// rows: ids start at `worker_index * num_per_batch` and the worker index
    /// seeds the RNG, so workers never collide.
    pub fn for_worker(worker_index: u64, num_per_batch: u64) -> Self {
        Self {
            start_id: worker_index * num_per_batch,
            seed: Some(worker_index),
            ..Self::default()
        }
    }

    pub fn with_start_id(mut self, start_id: u64) -> Self {
        self.start_id = start_id;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_primary_key(mut self, primary_key: PrimaryKeyStrategy) -> Self {
        self.primary_key = primary_key;
        self
    }

    pub fn with_partition_value(mut self, partition_value: i64) -> Self {
        self.partition_value = Some(partition_value);
        self
    }

    pub fn with_shape(mut self, shape: OutputShape) -> Self {
        self.shape = shape;
        self
    }
}

/// One generation session over a schema.
///
/// The session owns its RNG, row-id counter and size model; nothing is
/// shared between sessions. Independent sessions may run on different
/// threads as long as their id ranges do not overlap.
pub struct GenerationSession {
    schema: CollectionSchema,
    model: SizeModel,
    /// Generators for populated fields, in schema order
    generators: Vec<(String, FieldGenerator)>,
    config: SessionConfig,
    rng: StdRng,
    next_id: u64,
}

impl GenerationSession {
    /// Create a session, checking the schema up front.
    ///
    /// Fails with `InvalidSchema` or `UnsupportedFieldKind` before any row
    /// is produced.
    pub fn new(schema: CollectionSchema, config: SessionConfig) -> Result<Self, GeneratorError> {
        schema.validate()?;
        let model = SizeModel::new(&schema)?;

        if config.start_id > MAX_ROW_ID {
            return Err(GeneratorError::StartIdOutOfRange(config.start_id));
        }
        if config.partition_value.is_some() && schema.partition_key_field().is_none() {
            return Err(SchemaError::InvalidSchema(format!(
                "a partition value was given but collection '{}' has no partition key",
                schema.name
            ))
            .into());
        }

        let mut generators = Vec::with_capacity(schema.fields.len());
        for field in &schema.fields {
            if let Some(generator) =
                FieldGenerator::for_field(field, config.primary_key, config.partition_value)?
            {
                generators.push((field.name.clone(), generator));
            }
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        debug!(
            "Session for '{}': {} bytes/row, start id {}, {:?} output",
            schema.name,
            model.row_bytes(),
            config.start_id,
            config.shape
        );

        Ok(Self {
            next_id: config.start_id,
            schema,
            model,
            generators,
            config,
            rng,
        })
    }

    /// Row id the next generated row will get.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Number of rows produced so far.
    pub fn rows_generated(&self) -> u64 {
        self.next_id - self.config.start_id
    }

    pub fn schema(&self) -> &CollectionSchema {
        &self.schema
    }

    pub fn size_model(&self) -> SizeModel {
        self.model
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Generate one batch of exactly `count` rows.
    ///
    /// Fails with `IdSpaceExhausted` when the rows would need ids past
    /// [`MAX_ROW_ID`].
    pub fn next_batch(&mut self, count: u64) -> Result<Batch, GeneratorError> {
        self.reserve_ids(count)?;
        Ok(self.generate_batch(count))
    }

    /// Check that `count` more rows stay within the id space.
    fn reserve_ids(&self, count: u64) -> Result<(), GeneratorError> {
        match self.next_id.checked_add(count) {
            Some(end) if end <= MAX_ROW_ID + 1 => Ok(()),
            _ => Err(GeneratorError::IdSpaceExhausted {
                next_id: self.next_id,
                count,
            }),
        }
    }

    /// Generate `count` rows whose ids were already checked.
    pub(crate) fn generate_batch(&mut self, count: u64) -> Batch {
        let first_id = self.next_id;
        let data = match self.config.shape {
            OutputShape::Rows => BatchData::Rows(self.generate_rows(first_id, count)),
            OutputShape::Columns => BatchData::Columns(self.generate_columns(first_id, count)),
        };
        self.next_id += count;

        Batch {
            first_id,
            row_count: count,
            modeled_bytes: self.model.size_for_count(count),
            data,
        }
    }

    /// Lazily produce batches covering `total_bytes`, each at most
    /// `max_batch_bytes` by the size model.
    pub fn batches(
        &mut self,
        total_bytes: u64,
        max_batch_bytes: u64,
    ) -> Result<Batches<'_>, GeneratorError> {
        let plan = BatchPlan::new(&self.model, total_bytes, max_batch_bytes)?;
        self.batches_for(plan)
    }

    /// Lazily produce the batches described by `plan`.
    ///
    /// The whole plan's ids are checked up front, so the iterator itself
    /// cannot fail.
    pub fn batches_for(&mut self, plan: BatchPlan) -> Result<Batches<'_>, GeneratorError> {
        self.reserve_ids(plan.total_rows())?;
        Ok(Batches::new(self, plan))
    }

    fn generate_rows(&mut self, first_id: u64, count: u64) -> Vec<Row> {
        let Self {
            generators, rng, ..
        } = self;

        (first_id..first_id + count)
            .map(|id| {
                let fields = generators
                    .iter()
                    .map(|(name, generator)| (name.clone(), generator.generate(rng, id)))
                    .collect();
                Row::new(id, fields)
            })
            .collect()
    }

    fn generate_columns(&mut self, first_id: u64, count: u64) -> Vec<Column> {
        let Self {
            generators, rng, ..
        } = self;

        generators
            .iter()
            .map(|(name, generator)| Column {
                name: name.clone(),
                values: generator.generate_column(rng, first_id, count),
            })
            .collect()
    }
}
