//! Core types for vecdb-loadgen.
//!
//! This crate provides the foundational types used across the load
//! generator:
//!
//! - [`FieldKind`] - Closed set of collection field kinds
//! - [`CollectionSchema`] - Ordered field descriptors loaded from YAML
//! - [`SizeModel`] - Per-schema mapping between row counts and bytes
//! - [`Size`] - Byte budgets with units
//! - [`Batch`] - Materialized rows or columns handed to insert sinks
//!
//! # Architecture
//!
//! ```text
//! loadgen-core (this crate)
//!    │
//!    ├─── loadtest-generator  (synthesizes rows, plans batches)
//!    │
//!    └─── loadtest-populate   (pushes batches to insert sinks)
//! ```
//!
//! # Example
//!
//! ```rust
//! use loadgen_core::{CollectionSchema, FieldDescriptor, FieldKind, SizeModel};
//!
//! let schema = CollectionSchema::new(
//!     "bench",
//!     vec![
//!         FieldDescriptor::primary("pk", FieldKind::Int64),
//!         FieldDescriptor::new("v", FieldKind::FloatVector { dim: 128 }),
//!     ],
//! )
//! .unwrap();
//!
//! let model = SizeModel::new(&schema).unwrap();
//! assert_eq!(model.row_bytes(), 520);
//! assert_eq!(model.count_for_size(1024 * 1024), 2016);
//! ```

pub mod schema;
pub mod size;
pub mod types;
pub mod values;

// Re-exports for convenience
pub use schema::{CollectionSchema, FieldDescriptor, SchemaError};
pub use size::{
    count_for_size, size_for_count, size_per_row, Size, SizeModel, SizeUnit,
    DEFAULT_MAX_BATCH_BYTES,
};
pub use types::FieldKind;
pub use values::{Batch, BatchData, Column, ColumnValues, FieldValue, OutputShape, Row};
