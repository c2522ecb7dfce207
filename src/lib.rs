//! vecdb-loadgen library
//!
//! Schema-driven synthetic data generation for vector database load tests.
//!
//! # Crates
//!
//! - `loadgen_core` - collection schemas, field kinds, sizes and the size model
//! - `loadtest_generator` - row synthesis and byte-budgeted batch planning
//! - `loadtest_populate` - insert sinks, segment and parallel populators
//!
//! # CLI Usage
//!
//! ```bash
//! # Stream 1GB of the default preset into JSONL files
//! vecdb-loadgen populate --preset default --size 1GB --output-dir out/
//!
//! # One sealed segment per size
//! vecdb-loadgen segments --schema collection.yaml --sizes 16MB,32MB,64MB
//!
//! # 100k rows over 12 workers, counting only
//! vecdb-loadgen parallel --preset default --total-count 100000 --dry-run
//!
//! # Show how a budget would be batched
//! vecdb-loadgen plan --preset partitioned --size 128MB --max-batch-size 4MB
//! ```

pub mod loadtest;

pub use loadtest::{ParallelArgs, PlanArgs, PopulateArgs, SegmentsArgs};
