//! Error types for populators and insert sinks.

use loadgen_core::SchemaError;
use loadtest_generator::GeneratorError;
use thiserror::Error;

/// Errors that can occur while populating a sink.
#[derive(Error, Debug)]
pub enum PopulatorError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Schema-related error.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Generator error.
    #[error("Generator error: {0}")]
    Generator(#[from] GeneratorError),

    /// Sink accepted a different number of rows than it was given.
    #[error("Batch {batch}: inserted {actual} rows, expected {expected}")]
    InsertCountMismatch {
        batch: u64,
        expected: u64,
        actual: u64,
    },

    /// Sink-specific failure.
    #[error("Sink error: {0}")]
    Sink(String),

    /// Invalid populate configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A parallel insert task panicked or was cancelled.
    #[error("Insert task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
