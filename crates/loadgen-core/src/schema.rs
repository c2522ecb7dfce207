//! Collection schema definitions.
//!
//! A `CollectionSchema` is an ordered list of `FieldDescriptor`s. Order is
//! significant: column-oriented batches emit one column per field in schema
//! order.
//!
//! Schemas are usually loaded from YAML:
//!
//! ```yaml
//! name: bench
//! fields:
//!   - name: pk
//!     kind: int64
//!     is_primary: true
//!   - name: random
//!     kind: double
//!   - name: embeddings
//!     kind:
//!       type: float_vector
//!       dim: 768
//! ```

use crate::types::FieldKind;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

// ============================================================================
// Error Types
// ============================================================================

/// Error type for schema and size model operations.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Field kind the size model and synthesizer cannot handle
    #[error("Unsupported field kind {kind} for field '{field}'")]
    UnsupportedFieldKind { field: String, kind: FieldKind },

    /// Structurally invalid schema
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// Unparseable size expression
    #[error("Invalid size: {0}")]
    InvalidSize(String),

    /// Error reading schema file
    #[error("Failed to read schema file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

// ============================================================================
// Schema Types
// ============================================================================

/// A single field of a collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldDescriptor {
    /// Field name
    pub name: String,

    /// Field kind
    pub kind: FieldKind,

    /// Whether this field is the primary key
    #[serde(default)]
    pub is_primary: bool,

    /// Whether the server assigns this field's values (primary keys only)
    #[serde(default)]
    pub auto_generated: bool,

    /// Whether the server routes rows to partitions by this field
    #[serde(default)]
    pub is_partition_key: bool,
}

impl FieldDescriptor {
    /// Create a regular (non-primary, non-partition-key) field.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            is_primary: false,
            auto_generated: false,
            is_partition_key: false,
        }
    }

    /// Create a primary key field populated by the generator.
    pub fn primary(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            is_primary: true,
            ..Self::new(name, kind)
        }
    }

    /// Create a primary key field whose values the server assigns.
    pub fn auto_primary(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            is_primary: true,
            auto_generated: true,
            ..Self::new(name, kind)
        }
    }

    /// Create a partition key field.
    pub fn partition_key(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            is_partition_key: true,
            ..Self::new(name, kind)
        }
    }

    /// Whether the generator should produce values for this field.
    pub fn is_generated(&self) -> bool {
        !(self.is_primary && self.auto_generated)
    }
}

/// Ordered collection schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CollectionSchema {
    /// Collection name
    #[serde(default)]
    pub name: String,

    /// Field descriptors in declaration order
    pub fields: Vec<FieldDescriptor>,
}

impl CollectionSchema {
    /// Create a schema and validate it.
    pub fn new(
        name: impl Into<String>,
        fields: Vec<FieldDescriptor>,
    ) -> Result<Self, SchemaError> {
        let schema = Self {
            name: name.into(),
            fields,
        };
        schema.validate()?;
        Ok(schema)
    }

    /// Load and validate a schema from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate a schema from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, SchemaError> {
        let schema: CollectionSchema = serde_yaml::from_str(yaml)?;
        schema.validate()?;
        Ok(schema)
    }

    /// Check structural invariants: at least one field, unique names, and
    /// exactly one primary key.
    ///
    /// Field kinds are not checked here; the size model reports those.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.fields.is_empty() {
            return Err(SchemaError::InvalidSchema(format!(
                "collection '{}' has no fields",
                self.name
            )));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::InvalidSchema(format!(
                    "duplicate field name '{}'",
                    field.name
                )));
            }
            if field.auto_generated && !field.is_primary {
                return Err(SchemaError::InvalidSchema(format!(
                    "field '{}' is auto-generated but not the primary key",
                    field.name
                )));
            }
        }

        match self.fields.iter().filter(|f| f.is_primary).count() {
            0 => Err(SchemaError::InvalidSchema(format!(
                "collection '{}' has no primary field",
                self.name
            ))),
            1 => Ok(()),
            n => Err(SchemaError::InvalidSchema(format!(
                "collection '{}' has {n} primary fields, expected exactly one",
                self.name
            ))),
        }
    }

    /// Get a field by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// The primary key field, if the schema has one.
    pub fn primary_field(&self) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.is_primary)
    }

    /// The partition key field, if the schema has one.
    pub fn partition_key_field(&self) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.is_partition_key)
    }

    /// Fields the generator populates (skips server-assigned primary keys).
    pub fn generated_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.is_generated())
    }

    /// Get all field names in schema order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_SCHEMA: &str = r#"
name: bench
fields:
  - name: pk
    kind: int64
    is_primary: true
  - name: random
    kind: double
  - name: embeddings
    kind:
      type: float_vector
      dim: 768
"#;

    #[test]
    fn test_parse_schema() {
        let schema = CollectionSchema::from_yaml(SAMPLE_SCHEMA).unwrap();

        assert_eq!(schema.name, "bench");
        assert_eq!(schema.field_names(), vec!["pk", "random", "embeddings"]);

        let pk = schema.primary_field().unwrap();
        assert_eq!(pk.name, "pk");
        assert!(!pk.auto_generated);

        let embeddings = schema.get_field("embeddings").unwrap();
        assert_eq!(embeddings.kind, FieldKind::FloatVector { dim: 768 });
        assert!(schema.partition_key_field().is_none());
    }

    #[test]
    fn test_empty_schema_rejected() {
        let result = CollectionSchema::new("empty", vec![]);
        assert!(matches!(result, Err(SchemaError::InvalidSchema(_))));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = CollectionSchema::new(
            "dup",
            vec![
                FieldDescriptor::primary("pk", FieldKind::Int64),
                FieldDescriptor::new("v", FieldKind::Double),
                FieldDescriptor::new("v", FieldKind::Double),
            ],
        );
        assert!(matches!(result, Err(SchemaError::InvalidSchema(msg)) if msg.contains("'v'")));
    }

    #[test]
    fn test_primary_count_enforced() {
        let none = CollectionSchema::new("none", vec![FieldDescriptor::new("v", FieldKind::Double)]);
        assert!(matches!(none, Err(SchemaError::InvalidSchema(_))));

        let two = CollectionSchema::new(
            "two",
            vec![
                FieldDescriptor::primary("a", FieldKind::Int64),
                FieldDescriptor::primary("b", FieldKind::Int64),
            ],
        );
        assert!(matches!(two, Err(SchemaError::InvalidSchema(_))));
    }

    #[test]
    fn test_auto_generated_requires_primary() {
        let mut field = FieldDescriptor::new("x", FieldKind::Int64);
        field.auto_generated = true;
        let result = CollectionSchema::new(
            "bad",
            vec![FieldDescriptor::primary("pk", FieldKind::Int64), field],
        );
        assert!(matches!(result, Err(SchemaError::InvalidSchema(_))));
    }

    #[test]
    fn test_generated_fields_skip_auto_primary() {
        let schema = CollectionSchema::new(
            "auto",
            vec![
                FieldDescriptor::auto_primary("pk", FieldKind::Int64),
                FieldDescriptor::partition_key("session_id", FieldKind::Int64),
            ],
        )
        .unwrap();

        let generated: Vec<_> = schema.generated_fields().map(|f| f.name.as_str()).collect();
        assert_eq!(generated, vec!["session_id"]);
        assert_eq!(schema.partition_key_field().unwrap().name, "session_id");
    }

    #[test]
    fn test_unsupported_kind_still_parses() {
        let yaml = r#"
fields:
  - name: pk
    kind: int64
    is_primary: true
  - name: flag
    kind: bool
"#;
        let schema = CollectionSchema::from_yaml(yaml).unwrap();
        assert_eq!(schema.get_field("flag").unwrap().kind, FieldKind::Bool);
    }
}
