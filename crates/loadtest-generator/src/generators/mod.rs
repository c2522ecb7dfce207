//! Individual value generators for each supported field kind.
//!
//! A schema is compiled once per session into a list of [`FieldGenerator`]s.
//! [`FieldGenerator::for_field`] is the only place that decides how a field is
//! populated, so supporting a new kind means extending
//! [`FieldKind::byte_width`] and the match in there.

pub mod numeric;
pub mod pattern;
pub mod uuid;
pub mod vector;

use crate::generator::PrimaryKeyStrategy;
use loadgen_core::{ColumnValues, FieldDescriptor, FieldKind, FieldValue, SchemaError};
use rand::Rng;

/// Trait for generating values.
pub trait ValueGenerator {
    /// Generate a value using the given RNG and session row id.
    fn generate<R: Rng>(&self, rng: &mut R, row_id: u64) -> FieldValue;
}

/// How one field of a schema gets its values.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldGenerator {
    /// Int64 primary key equal to the session row id
    SequentialKey,
    /// Int64 primary key unique across independent runs
    UniqueKey,
    /// VarChar primary key holding a UUID string
    UuidKey,
    /// Int64 field carrying the session row id
    RowId,
    /// Int64 partition key pinned to one value
    ForcedPartition(i64),
    /// VarChar partition key pinned to one value
    ForcedPartitionText(String),
    /// Templated filler text of stable length
    Text { max_length: u32 },
    /// Uniform double in [0, 1)
    UnitDouble,
    /// Uniform float vector in [0, 1)^dim
    UnitVector { dim: u32 },
}

impl FieldGenerator {
    /// Pick the generator for `field`.
    ///
    /// Returns `Ok(None)` for server-assigned primary keys, which are never
    /// populated, and `UnsupportedFieldKind` for kinds without a byte width.
    pub fn for_field(
        field: &FieldDescriptor,
        primary_key: PrimaryKeyStrategy,
        partition_value: Option<i64>,
    ) -> Result<Option<Self>, SchemaError> {
        if !field.kind.is_supported() {
            return Err(SchemaError::UnsupportedFieldKind {
                field: field.name.clone(),
                kind: field.kind.clone(),
            });
        }
        if !field.is_generated() {
            return Ok(None);
        }

        let generator = match (&field.kind, field.is_primary) {
            (FieldKind::Int64, true) => match primary_key {
                PrimaryKeyStrategy::Sequential => Self::SequentialKey,
                PrimaryKeyStrategy::Unique => Self::UniqueKey,
            },
            (FieldKind::Int64, false) => match (field.is_partition_key, partition_value) {
                (true, Some(value)) => Self::ForcedPartition(value),
                _ => Self::RowId,
            },
            (FieldKind::VarChar { max_length }, true) => {
                if *max_length < uuid::UUID_STRING_LENGTH {
                    return Err(SchemaError::InvalidSchema(format!(
                        "primary key '{}' holds {}-byte UUID strings but max_length is {max_length}",
                        field.name,
                        uuid::UUID_STRING_LENGTH
                    )));
                }
                Self::UuidKey
            }
            (FieldKind::VarChar { max_length }, false) => {
                match (field.is_partition_key, partition_value) {
                    (true, Some(value)) => {
                        let text = value.to_string();
                        if text.len() > *max_length as usize {
                            return Err(SchemaError::InvalidSchema(format!(
                                "partition value '{text}' does not fit partition key '{}' (max_length {max_length})",
                                field.name
                            )));
                        }
                        Self::ForcedPartitionText(text)
                    }
                    _ => Self::Text {
                        max_length: *max_length,
                    },
                }
            }
            (FieldKind::Double, _) => Self::UnitDouble,
            (FieldKind::FloatVector { dim }, _) => Self::UnitVector { dim: *dim },
            (other, _) => {
                return Err(SchemaError::UnsupportedFieldKind {
                    field: field.name.clone(),
                    kind: other.clone(),
                })
            }
        };
        Ok(Some(generator))
    }

    /// Generate `count` values for consecutive row ids starting at `first_id`.
    pub fn generate_column<R: Rng>(&self, rng: &mut R, first_id: u64, count: u64) -> ColumnValues {
        let ids = first_id..first_id + count;
        match self {
            Self::SequentialKey | Self::RowId => {
                ColumnValues::Int64(ids.map(|id| id as i64).collect())
            }
            Self::UniqueKey => ColumnValues::Int64(ids.map(|_| uuid::unique_i64_key()).collect()),
            Self::ForcedPartition(value) => ColumnValues::Int64(ids.map(|_| *value).collect()),
            Self::UuidKey => {
                ColumnValues::VarChar(ids.map(|_| uuid::generate_uuid_v4(rng).to_string()).collect())
            }
            Self::ForcedPartitionText(value) => {
                ColumnValues::VarChar(ids.map(|_| value.clone()).collect())
            }
            Self::Text { max_length } => ColumnValues::VarChar(
                ids.map(|_| pattern::generate_text(rng, *max_length)).collect(),
            ),
            Self::UnitDouble => ColumnValues::Double(numeric::generate_unit_doubles(rng, count)),
            Self::UnitVector { dim } => ColumnValues::FloatVector(
                ids.map(|_| vector::generate_unit_vector(rng, *dim)).collect(),
            ),
        }
    }
}

impl ValueGenerator for FieldGenerator {
    fn generate<R: Rng>(&self, rng: &mut R, row_id: u64) -> FieldValue {
        match self {
            Self::SequentialKey | Self::RowId => FieldValue::Int64(row_id as i64),
            Self::UniqueKey => FieldValue::Int64(uuid::unique_i64_key()),
            Self::ForcedPartition(value) => FieldValue::Int64(*value),
            Self::UuidKey => FieldValue::VarChar(uuid::generate_uuid_v4(rng).to_string()),
            Self::ForcedPartitionText(value) => FieldValue::VarChar(value.clone()),
            Self::Text { max_length } => FieldValue::VarChar(pattern::generate_text(rng, *max_length)),
            Self::UnitDouble => FieldValue::Double(numeric::generate_unit_double(rng)),
            Self::UnitVector { dim } => {
                FieldValue::FloatVector(vector::generate_unit_vector(rng, *dim))
            }
        }
    }
}
