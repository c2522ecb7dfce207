//! Common CLI argument definitions shared by all populate commands.

use crate::error::PopulatorError;
use crate::presets::{Preset, DEFAULT_DIM};
use clap::Args;
use loadgen_core::{CollectionSchema, OutputShape, Size};
use loadtest_generator::{PrimaryKeyStrategy, SessionConfig, MAX_ROW_ID};
use std::path::PathBuf;

/// Common arguments shared by all populate commands.
#[derive(Args, Clone, Debug)]
pub struct CommonPopulateArgs {
    /// Path to collection schema YAML file
    #[arg(long, short = 's', env = "LOADGEN_SCHEMA", conflicts_with = "preset")]
    pub schema: Option<PathBuf>,

    /// Built-in schema to use instead of a schema file
    #[arg(long, value_enum)]
    pub preset: Option<Preset>,

    /// Vector dimension for presets that take one
    #[arg(long, default_value_t = DEFAULT_DIM)]
    pub dim: u32,

    /// Random seed for deterministic generation (same seed = same data)
    #[arg(long, env = "LOADGEN_SEED")]
    pub seed: Option<u64>,

    /// Row id of the first generated row (at most i64::MAX)
    #[arg(long, default_value = "0", value_parser = clap::value_parser!(u64).range(..=MAX_ROW_ID))]
    pub start_id: u64,

    /// Int64 primary key strategy (sequential or unique)
    #[arg(long, default_value = "sequential")]
    pub pk_strategy: PrimaryKeyStrategy,

    /// Batch layout handed to the sink (rows or columns)
    #[arg(long, default_value = "columns")]
    pub shape: OutputShape,

    /// Upper bound on the modeled size of one insert batch (e.g. 5MB, 512KB)
    #[arg(long, env = "LOADGEN_MAX_BATCH_SIZE", default_value = "5MB")]
    pub max_batch_size: Size,

    /// Value forced into the partition key field of every row
    #[arg(long)]
    pub partition_value: Option<i64>,

    /// Dry-run mode: generate and count rows without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Directory receiving JSONL segment files
    #[arg(long, env = "LOADGEN_OUTPUT_DIR", default_value = "loadgen-output")]
    pub output_dir: PathBuf,
}

impl CommonPopulateArgs {
    /// Resolve the collection schema from `--schema` or `--preset`.
    pub fn load_schema(&self) -> Result<CollectionSchema, PopulatorError> {
        match (&self.schema, self.preset) {
            (Some(path), _) => Ok(CollectionSchema::from_file(path)?),
            (None, Some(preset)) => Ok(preset.schema(self.dim)?),
            (None, None) => Err(PopulatorError::Config(
                "either --schema or --preset is required".to_string(),
            )),
        }
    }

    /// Generation settings described by these arguments.
    pub fn session_config(&self) -> SessionConfig {
        let mut config = SessionConfig::default()
            .with_start_id(self.start_id)
            .with_primary_key(self.pk_strategy)
            .with_shape(self.shape);
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(value) = self.partition_value {
            config = config.with_partition_value(value);
        }
        config
    }

    /// Batch ceiling in bytes.
    pub fn max_batch_bytes(&self) -> u64 {
        self.max_batch_size.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: CommonPopulateArgs,
    }

    fn parse(argv: &[&str]) -> CommonPopulateArgs {
        let mut full = vec!["test"];
        full.extend_from_slice(argv);
        TestCli::try_parse_from(full).unwrap().args
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["--preset", "default"]);
        assert_eq!(args.max_batch_bytes(), 5 * 1024 * 1024);
        assert_eq!(args.dim, DEFAULT_DIM);

        let config = args.session_config();
        assert_eq!(config.start_id, 0);
        assert_eq!(config.primary_key, PrimaryKeyStrategy::Sequential);
        assert_eq!(config.shape, OutputShape::Columns);
        assert_eq!(config.partition_value, None);
    }

    #[test]
    fn test_session_config_from_flags() {
        let args = parse(&[
            "--preset",
            "partitioned",
            "--seed",
            "7",
            "--start-id",
            "100",
            "--pk-strategy",
            "unique",
            "--shape",
            "rows",
            "--partition-value",
            "3",
            "--max-batch-size",
            "512KB",
        ]);
        let config = args.session_config();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.start_id, 100);
        assert_eq!(config.primary_key, PrimaryKeyStrategy::Unique);
        assert_eq!(config.shape, OutputShape::Rows);
        assert_eq!(config.partition_value, Some(3));
        assert_eq!(args.max_batch_bytes(), 512 * 1024);
    }

    #[test]
    fn test_start_id_limited_to_int64() {
        let max = MAX_ROW_ID.to_string();
        let args = parse(&["--start-id", max.as_str()]);
        assert_eq!(args.start_id, MAX_ROW_ID);

        let too_big = (MAX_ROW_ID + 1).to_string();
        let result = TestCli::try_parse_from(["test", "--start-id", too_big.as_str()]);
        assert!(result.is_err());
    }

    #[test]
    fn test_schema_required() {
        let args = parse(&[]);
        assert!(matches!(
            args.load_schema(),
            Err(PopulatorError::Config(_))
        ));
    }

    #[test]
    fn test_schema_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
name: from_file
fields:
  - name: pk
    kind: int64
    is_primary: true
  - name: v
    kind:
      type: float_vector
      dim: 4
"#
        )
        .unwrap();

        let path = file.path().to_string_lossy().to_string();
        let args = parse(&["--schema", path.as_str()]);
        let schema = args.load_schema().unwrap();
        assert_eq!(schema.name, "from_file");
        assert_eq!(schema.fields.len(), 2);
    }
}
