//! Segment size distributions.
//!
//! A distribution lists the byte size of each segment to produce in one
//! collection partition:
//!
//! ```yaml
//! collection_name: test1
//! partition_name: _default
//! size_dist:
//!   - 16MB
//!   - 32MB
//!   - count: 1
//!     unit: Gigabytes
//! ```

use crate::error::PopulatorError;
use loadgen_core::Size;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Partition used when a distribution does not name one.
pub const DEFAULT_PARTITION: &str = "_default";

fn default_partition() -> String {
    DEFAULT_PARTITION.to_string()
}

/// Target sizes of the segments to generate, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentDistribution {
    pub collection_name: String,
    pub size_dist: Vec<Size>,
    #[serde(default = "default_partition")]
    pub partition_name: String,
}

impl SegmentDistribution {
    pub fn new(collection_name: impl Into<String>, size_dist: Vec<Size>) -> Self {
        Self {
            collection_name: collection_name.into(),
            size_dist,
            partition_name: default_partition(),
        }
    }

    /// Load a distribution from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, PopulatorError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a distribution from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, PopulatorError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Sum of all segment sizes in bytes.
    pub fn total_bytes(&self) -> u64 {
        self.size_dist
            .iter()
            .fold(0u64, |acc, size| acc.saturating_add(size.as_bytes()))
    }
}

impl fmt::Display for SegmentDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sizes: Vec<String> = self.size_dist.iter().map(Size::to_string).collect();
        write!(
            f,
            "{}/{}: [{}]",
            self.collection_name,
            self.partition_name,
            sizes.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loadgen_core::SizeUnit;

    #[test]
    fn test_parse_distribution() {
        let yaml = r#"
collection_name: test1
size_dist:
  - 16MB
  - count: 32
    unit: Megabytes
  - 4096
"#;
        let dist = SegmentDistribution::from_yaml(yaml).unwrap();

        assert_eq!(dist.collection_name, "test1");
        assert_eq!(dist.partition_name, DEFAULT_PARTITION);
        assert_eq!(
            dist.size_dist,
            vec![
                Size::megabytes(16),
                Size::new(32, SizeUnit::Megabytes),
                Size::bytes(4096)
            ]
        );
        assert_eq!(dist.total_bytes(), 48 * 1024 * 1024 + 4096);
    }

    #[test]
    fn test_display() {
        let dist = SegmentDistribution::new("c", vec![Size::megabytes(1), Size::bytes(10)]);
        assert_eq!(dist.to_string(), "c/_default: [1 Megabytes, 10 Bytes]");
    }
}
