//! Byte budgets and the per-schema size model.
//!
//! The size model maps between a row count and its byte footprint using the
//! per-kind widths from [`FieldKind::byte_width`](crate::FieldKind::byte_width).

use crate::schema::{CollectionSchema, SchemaError};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default per-batch byte ceiling (5 MiB).
pub const DEFAULT_MAX_BATCH_BYTES: u64 = 5 * 1024 * 1024;

/// Unit of a [`Size`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SizeUnit {
    #[default]
    Bytes,
    Kilobytes,
    Megabytes,
    Gigabytes,
}

impl SizeUnit {
    /// Multiplier from this unit to bytes.
    pub const fn factor(self) -> u64 {
        match self {
            Self::Bytes => 1,
            Self::Kilobytes => 1024,
            Self::Megabytes => 1024 * 1024,
            Self::Gigabytes => 1024 * 1024 * 1024,
        }
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix.to_ascii_lowercase().as_str() {
            "" | "b" | "bytes" => Some(Self::Bytes),
            "k" | "kb" | "kib" | "kilobytes" => Some(Self::Kilobytes),
            "m" | "mb" | "mib" | "megabytes" => Some(Self::Megabytes),
            "g" | "gb" | "gib" | "gigabytes" => Some(Self::Gigabytes),
            _ => None,
        }
    }
}

impl fmt::Display for SizeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bytes => "Bytes",
            Self::Kilobytes => "Kilobytes",
            Self::Megabytes => "Megabytes",
            Self::Gigabytes => "Gigabytes",
        };
        f.write_str(name)
    }
}

/// A byte budget expressed as `count` of `unit`.
///
/// Accepts `"128MB"`, `"5 MiB"`, `"1048576"` or `{count: 128, unit: Megabytes}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Size {
    pub count: u64,
    pub unit: SizeUnit,
}

impl Size {
    pub const fn new(count: u64, unit: SizeUnit) -> Self {
        Self { count, unit }
    }

    pub const fn bytes(count: u64) -> Self {
        Self::new(count, SizeUnit::Bytes)
    }

    pub const fn megabytes(count: u64) -> Self {
        Self::new(count, SizeUnit::Megabytes)
    }

    /// Convert to a byte count, saturating at `u64::MAX`.
    pub const fn as_bytes(&self) -> u64 {
        self.count.saturating_mul(self.unit.factor())
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.count, self.unit)
    }
}

impl FromStr for Size {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let split = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        let (digits, suffix) = trimmed.split_at(split);

        let count = digits
            .parse::<u64>()
            .map_err(|_| SchemaError::InvalidSize(format!("missing count in '{s}'")))?;
        let unit = SizeUnit::from_suffix(suffix.trim())
            .ok_or_else(|| SchemaError::InvalidSize(format!("unknown unit in '{s}'")))?;

        Ok(Self { count, unit })
    }
}

impl<'de> Deserialize<'de> for Size {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Bytes(u64),
            Text(String),
            Struct {
                count: u64,
                #[serde(default)]
                unit: SizeUnit,
            },
        }

        match Repr::deserialize(deserializer)? {
            Repr::Bytes(count) => Ok(Size::bytes(count)),
            Repr::Text(text) => text.parse().map_err(serde::de::Error::custom),
            Repr::Struct { count, unit } => Ok(Size { count, unit }),
        }
    }
}

// ============================================================================
// Size Model
// ============================================================================

/// Byte cost of one row of `schema`.
///
/// Every field counts, including server-assigned primary keys, since the
/// server stores them all.
pub fn size_per_row(schema: &CollectionSchema) -> Result<u64, SchemaError> {
    let mut total = 0u64;
    for field in &schema.fields {
        let width = field
            .kind
            .byte_width()
            .ok_or_else(|| SchemaError::UnsupportedFieldKind {
                field: field.name.clone(),
                kind: field.kind.clone(),
            })?;
        total += width;
    }

    if total == 0 {
        return Err(SchemaError::InvalidSchema(format!(
            "collection '{}' has a zero-width row",
            schema.name
        )));
    }
    Ok(total)
}

/// Number of whole rows of `schema` that fit in `size_bytes`.
pub fn count_for_size(schema: &CollectionSchema, size_bytes: u64) -> Result<u64, SchemaError> {
    Ok(SizeModel::new(schema)?.count_for_size(size_bytes))
}

/// Byte footprint of `count` rows of `schema`.
pub fn size_for_count(schema: &CollectionSchema, count: u64) -> Result<u64, SchemaError> {
    Ok(SizeModel::new(schema)?.size_for_count(count))
}

/// Size model with the per-row cost of one schema precomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeModel {
    row_bytes: u64,
}

impl SizeModel {
    pub fn new(schema: &CollectionSchema) -> Result<Self, SchemaError> {
        Ok(Self {
            row_bytes: size_per_row(schema)?,
        })
    }

    pub fn row_bytes(&self) -> u64 {
        self.row_bytes
    }

    pub fn count_for_size(&self, size_bytes: u64) -> u64 {
        size_bytes / self.row_bytes
    }

    pub fn size_for_count(&self, count: u64) -> u64 {
        count.saturating_mul(self.row_bytes)
    }
}
