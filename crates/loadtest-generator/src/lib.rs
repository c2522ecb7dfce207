//! Row synthesizer and batch planner for vecdb-loadgen.
//!
//! This crate turns a [`CollectionSchema`](loadgen_core::CollectionSchema)
//! into synthetic rows. A [`GenerationSession`] owns the RNG and row-id
//! counter for one run; a [`BatchPlan`] converts a byte budget into batch
//! row counts, and [`Batches`] lazily generates them.
//!
//! # Architecture
//!
//! ```text
//! CollectionSchema (YAML)
//!        │
//!        ▼
//! ┌─────────────────────┐      ┌─────────────┐
//! │  GenerationSession  │◄─────│  BatchPlan  │
//! │                     │      └─────────────┘
//! │  - FieldGenerators  │
//! │  - rng (StdRng)     │
//! │  - next_id          │
//! └──────────┬──────────┘
//!            │ Batches (lazy)
//!            ▼
//!    Batch { first_id, row_count, modeled_bytes, data }
//! ```
//!
//! # Example
//!
//! ```rust
//! use loadtest_generator::{GenerationSession, SessionConfig};
//! use loadgen_core::{CollectionSchema, DEFAULT_MAX_BATCH_BYTES};
//!
//! let schema = CollectionSchema::from_yaml(r#"
//! name: bench
//! fields:
//!   - name: pk
//!     kind: int64
//!     is_primary: true
//!   - name: v
//!     kind:
//!       type: float_vector
//!       dim: 128
//! "#).unwrap();
//!
//! let mut session = GenerationSession::new(schema, SessionConfig::default().with_seed(42)).unwrap();
//! let batches: Vec<_> = session.batches(1024 * 1024, DEFAULT_MAX_BATCH_BYTES).unwrap().collect();
//! assert_eq!(batches.len(), 1);
//! assert_eq!(batches[0].row_count, 2016);
//! ```
//!
//! # Field generation
//!
//! - Int64 primary key: sequential from `start_id`, or random 63-bit unique
//! - Int64 partition key: forced partition value, else the row id
//! - VarChar primary key: UUID v4 string
//! - VarChar: UUID plus filler sentence, cut to `max_length`
//! - Double: uniform in [0, 1)
//! - FloatVector: `dim` floats uniform in [0, 1)

pub mod generator;
pub mod generators;
pub mod planner;

// Re-exports for convenience
pub use generator::{
    GenerationSession, GeneratorError, PrimaryKeyStrategy, SessionConfig, MAX_ROW_ID,
};
pub use planner::{BatchPlan, Batches};
