//! Insert sinks and populators for vecdb-loadgen.
//!
//! This crate drives [`loadtest_generator::GenerationSession`]s into an
//! [`InsertSink`]:
//!
//! - [`SegmentPopulator`] inserts byte budgets, flushing once per segment
//!   of a [`SegmentDistribution`] or once at the end of a stream.
//! - [`parallel_insert`] inserts a fixed row count as independent batches
//!   over a bounded number of concurrent workers.
//!
//! [`CommonPopulateArgs`] holds the CLI arguments shared by every populate
//! command.

pub mod args;
pub mod distribution;
pub mod error;
pub mod metrics;
pub mod parallel;
pub mod populator;
pub mod presets;
pub mod sink;

pub use args::CommonPopulateArgs;
pub use distribution::{SegmentDistribution, DEFAULT_PARTITION};
pub use error::PopulatorError;
pub use metrics::PopulateMetrics;
pub use parallel::{parallel_insert, ParallelInsertConfig, ParallelInsertReport, DEFAULT_MAX_WORKERS};
pub use populator::SegmentPopulator;
pub use presets::{Preset, DEFAULT_DIM};
pub use sink::{CountingSink, InsertSink, JsonlSink};
