//! Built-in collection schemas.

use clap::ValueEnum;
use loadgen_core::{CollectionSchema, FieldDescriptor, FieldKind, SchemaError};

/// Vector dimension used when none is given.
pub const DEFAULT_DIM: u32 = 768;

/// Dimension of the partitioned preset's vector field.
const PARTITIONED_DIM: u32 = 128;

/// Named schemas that need no schema file.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preset {
    /// pk Int64 (primary), random Double, embeddings FloatVector(dim)
    Default,
    /// id Int64 (primary), vector FloatVector(128), session_id Int64 (partition key)
    Partitioned,
    /// pk VarChar(64) (primary), content VarChar(512), embeddings FloatVector(dim)
    Text,
}

impl Preset {
    /// Build the preset schema. `dim` sizes the embeddings of the default
    /// and text presets; the partitioned preset always uses 128.
    pub fn schema(&self, dim: u32) -> Result<CollectionSchema, SchemaError> {
        match self {
            Self::Default => CollectionSchema::new(
                "hello_milvus",
                vec![
                    FieldDescriptor::primary("pk", FieldKind::Int64),
                    FieldDescriptor::new("random", FieldKind::Double),
                    FieldDescriptor::new("embeddings", FieldKind::FloatVector { dim }),
                ],
            ),
            Self::Partitioned => CollectionSchema::new(
                "partition_key_collection",
                vec![
                    FieldDescriptor::primary("id", FieldKind::Int64),
                    FieldDescriptor::new(
                        "vector",
                        FieldKind::FloatVector {
                            dim: PARTITIONED_DIM,
                        },
                    ),
                    FieldDescriptor::partition_key("session_id", FieldKind::Int64),
                ],
            ),
            Self::Text => CollectionSchema::new(
                "text_collection",
                vec![
                    FieldDescriptor::primary("pk", FieldKind::VarChar { max_length: 64 }),
                    FieldDescriptor::new("content", FieldKind::VarChar { max_length: 512 }),
                    FieldDescriptor::new("embeddings", FieldKind::FloatVector { dim }),
                ],
            ),
        }
    }
}
