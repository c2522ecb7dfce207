//! Field kinds for vector database collection schemas.
//!
//! `FieldKind` is the closed set of column types a collection may declare.
//! Only a subset of them can be synthesized and sized; the rest parse fine
//! but are rejected by the size model and the row synthesizer.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Column type of a collection field.
///
/// # YAML Format
///
/// Simple kinds are plain strings:
/// ```yaml
/// kind: int64
/// kind: double
/// ```
///
/// Parameterized kinds use the map format:
/// ```yaml
/// kind:
///   type: var_char
///   max_length: 512
/// kind:
///   type: float_vector
///   dim: 128
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// 64-bit signed integer
    Int64,

    /// Variable-length string with a declared maximum length in bytes
    VarChar {
        /// Maximum length
        max_length: u32,
    },

    /// 64-bit IEEE 754 floating point
    Double,

    /// Dense vector of 32-bit floats
    FloatVector {
        /// Vector dimension
        dim: u32,
    },

    // Kinds the server accepts but the generator cannot produce yet.
    /// Boolean value
    Bool,

    /// 8-bit signed integer
    Int8,

    /// 16-bit signed integer
    Int16,

    /// 32-bit signed integer
    Int32,

    /// 32-bit IEEE 754 floating point
    Float,

    /// JSON document
    Json,

    /// Packed binary vector
    BinaryVector {
        /// Vector dimension in bits
        dim: u32,
    },

    /// Sparse float vector
    SparseFloatVector,
}

impl FieldKind {
    /// Byte cost of one value of this kind in the size model.
    ///
    /// This is the single table shared by the size model and the row
    /// synthesizer. `None` means the kind is not supported by either, and
    /// adding support for a kind starts here.
    pub fn byte_width(&self) -> Option<u64> {
        match self {
            Self::Int64 => Some(8),
            Self::Double => Some(8),
            Self::VarChar { max_length } => Some(u64::from(*max_length)),
            Self::FloatVector { dim } => Some(u64::from(*dim) * 4),
            Self::Bool
            | Self::Int8
            | Self::Int16
            | Self::Int32
            | Self::Float
            | Self::Json
            | Self::BinaryVector { .. }
            | Self::SparseFloatVector => None,
        }
    }

    /// Whether values of this kind can be generated and sized.
    pub fn is_supported(&self) -> bool {
        self.byte_width().is_some()
    }

    /// Canonical snake_case name used in YAML and error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Int64 => "int64",
            Self::VarChar { .. } => "var_char",
            Self::Double => "double",
            Self::FloatVector { .. } => "float_vector",
            Self::Bool => "bool",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Float => "float",
            Self::Json => "json",
            Self::BinaryVector { .. } => "binary_vector",
            Self::SparseFloatVector => "sparse_float_vector",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VarChar { max_length } => write!(f, "var_char({max_length})"),
            Self::FloatVector { dim } => write!(f, "float_vector({dim})"),
            Self::BinaryVector { dim } => write!(f, "binary_vector({dim})"),
            other => f.write_str(other.type_name()),
        }
    }
}

// Custom serialization/deserialization for FieldKind
// Supports both simple string format ("int64") and object format ({"type": "var_char", "max_length": 255})

impl Serialize for FieldKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeMap;

        match self {
            Self::VarChar { max_length } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "var_char")?;
                map.serialize_entry("max_length", max_length)?;
                map.end()
            }
            Self::FloatVector { dim } | Self::BinaryVector { dim } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", self.type_name())?;
                map.serialize_entry("dim", dim)?;
                map.end()
            }
            simple => serializer.serialize_str(simple.type_name()),
        }
    }
}

fn simple_kind(name: &str) -> Option<FieldKind> {
    match name {
        "int64" | "big_int" | "bigint" => Some(FieldKind::Int64),
        "double" => Some(FieldKind::Double),
        "bool" => Some(FieldKind::Bool),
        "int8" => Some(FieldKind::Int8),
        "int16" => Some(FieldKind::Int16),
        "int32" | "int" => Some(FieldKind::Int32),
        "float" => Some(FieldKind::Float),
        "json" => Some(FieldKind::Json),
        "sparse_float_vector" => Some(FieldKind::SparseFloatVector),
        _ => None,
    }
}

impl<'de> Deserialize<'de> for FieldKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{Error, MapAccess, Visitor};

        struct FieldKindVisitor;

        impl<'de> Visitor<'de> for FieldKindVisitor {
            type Value = FieldKind;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or map representing a FieldKind")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: Error,
            {
                simple_kind(value).ok_or_else(|| {
                    E::custom(format!(
                        "unknown simple kind: {value} (parameterized kinds need the map format)"
                    ))
                })
            }

            fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut type_name: Option<String> = None;
                let mut params: HashMap<String, u32> = HashMap::new();

                while let Some(key) = map.next_key::<String>()? {
                    if key == "type" {
                        type_name = Some(map.next_value()?);
                    } else {
                        params.insert(key, map.next_value()?);
                    }
                }

                let type_name = type_name.ok_or_else(|| M::Error::missing_field("type"))?;
                let required = |key: &'static str| {
                    params
                        .get(key)
                        .copied()
                        .ok_or_else(|| M::Error::missing_field(key))
                };

                match type_name.as_str() {
                    "var_char" | "varchar" => Ok(FieldKind::VarChar {
                        max_length: required("max_length")?,
                    }),
                    "float_vector" => Ok(FieldKind::FloatVector {
                        dim: required("dim")?,
                    }),
                    "binary_vector" => Ok(FieldKind::BinaryVector {
                        dim: required("dim")?,
                    }),
                    other => simple_kind(other)
                        .ok_or_else(|| M::Error::custom(format!("unknown kind: {other}"))),
                }
            }
        }

        deserializer.deserialize_any(FieldKindVisitor)
    }
}
