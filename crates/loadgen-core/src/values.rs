//! Generated values, rows, columns and batches.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// A single generated value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// 64-bit signed integer
    Int64(i64),

    /// String value
    VarChar(String),

    /// 64-bit floating point
    Double(f64),

    /// Dense float vector
    FloatVector(Vec<f32>),
}

impl FieldValue {
    /// Try to get this value as an i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int64(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get this value as an f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Double(f) => Some(*f),
            _ => None,
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::VarChar(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as a vector slice.
    pub fn as_vector(&self) -> Option<&[f32]> {
        match self {
            Self::FloatVector(v) => Some(v),
            _ => None,
        }
    }
}

/// One entity as `(field name, value)` pairs in schema order.
///
/// `id` is the session row id the row was generated for; it equals the
/// primary key only under sequential primary keys.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub id: u64,
    pub fields: Vec<(String, FieldValue)>,
}

impl Row {
    pub fn new(id: u64, fields: Vec<(String, FieldValue)>) -> Self {
        Self { id, fields }
    }

    /// Get a field value by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Convert to a JSON object suitable for an insert payload.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

// Serializes as a map whose keys follow schema order
impl Serialize for Row {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Values of one column, aligned by row index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnValues {
    Int64(Vec<i64>),
    VarChar(Vec<String>),
    Double(Vec<f64>),
    FloatVector(Vec<Vec<f32>>),
}

impl ColumnValues {
    pub fn len(&self) -> usize {
        match self {
            Self::Int64(v) => v.len(),
            Self::VarChar(v) => v.len(),
            Self::Double(v) => v.len(),
            Self::FloatVector(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<FieldValue> {
        match self {
            Self::Int64(v) => v.get(index).map(|x| FieldValue::Int64(*x)),
            Self::VarChar(v) => v.get(index).map(|x| FieldValue::VarChar(x.clone())),
            Self::Double(v) => v.get(index).map(|x| FieldValue::Double(*x)),
            Self::FloatVector(v) => v.get(index).map(|x| FieldValue::FloatVector(x.clone())),
        }
    }
}

/// A named column of generated values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: ColumnValues,
}

/// Output layout requested from the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputShape {
    /// One mapping per entity
    Rows,
    /// One array per field, in schema order
    #[default]
    Columns,
}

impl std::str::FromStr for OutputShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rows" => Ok(Self::Rows),
            "columns" => Ok(Self::Columns),
            other => Err(format!("unknown output shape '{other}' (expected rows or columns)")),
        }
    }
}

/// Payload of a batch in the requested shape.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchData {
    Rows(Vec<Row>),
    Columns(Vec<Column>),
}

/// A fully materialized batch of generated rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    /// Session row id of the first row
    pub first_id: u64,
    /// Number of rows in the batch
    pub row_count: u64,
    /// Footprint of the batch according to the size model
    pub modeled_bytes: u64,
    pub data: BatchData,
}

impl Batch {
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    /// Session row ids covered by this batch.
    pub fn id_range(&self) -> std::ops::Range<u64> {
        self.first_id..self.first_id + self.row_count
    }

    /// Look up a column by name (column-oriented batches only).
    pub fn column(&self, name: &str) -> Option<&Column> {
        match &self.data {
            BatchData::Columns(columns) => columns.iter().find(|c| c.name == name),
            BatchData::Rows(_) => None,
        }
    }

    /// Rows of the batch, pivoting columns if needed.
    pub fn to_rows(&self) -> Vec<Row> {
        match &self.data {
            BatchData::Rows(rows) => rows.clone(),
            BatchData::Columns(columns) => (0..self.row_count as usize)
                .map(|i| {
                    let fields = columns
                        .iter()
                        .filter_map(|c| c.values.get(i).map(|v| (c.name.clone(), v)))
                        .collect();
                    Row::new(self.first_id + i as u64, fields)
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column_batch() -> Batch {
        Batch {
            first_id: 10,
            row_count: 2,
            modeled_bytes: 2 * 24,
            data: BatchData::Columns(vec![
                Column {
                    name: "pk".to_string(),
                    values: ColumnValues::Int64(vec![10, 11]),
                },
                Column {
                    name: "v".to_string(),
                    values: ColumnValues::FloatVector(vec![vec![0.1, 0.2], vec![0.3, 0.4]]),
                },
            ]),
        }
    }

    #[test]
    fn test_field_value_accessors() {
        assert_eq!(FieldValue::Int64(7).as_i64(), Some(7));
        assert_eq!(FieldValue::Double(0.5).as_f64(), Some(0.5));
        assert_eq!(FieldValue::VarChar("a".into()).as_str(), Some("a"));
        assert_eq!(FieldValue::Int64(7).as_str(), None);
        assert_eq!(
            FieldValue::FloatVector(vec![1.0]).as_vector(),
            Some(&[1.0f32][..])
        );
    }

    #[test]
    fn test_batch_pivot_to_rows() {
        let batch = column_batch();
        assert_eq!(batch.id_range(), 10..12);

        let rows = batch.to_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].id, 11);
        assert_eq!(rows[1].get_field("pk"), Some(&FieldValue::Int64(11)));
        assert_eq!(
            rows[1].get_field("v"),
            Some(&FieldValue::FloatVector(vec![0.3, 0.4]))
        );
    }

    #[test]
    fn test_column_lookup() {
        let batch = column_batch();
        assert_eq!(batch.column("pk").unwrap().values.len(), 2);
        assert!(batch.column("missing").is_none());
    }

    #[test]
    fn test_output_shape_parse() {
        assert_eq!("rows".parse::<OutputShape>().unwrap(), OutputShape::Rows);
        assert_eq!(OutputShape::default(), OutputShape::Columns);
        assert!("cells".parse::<OutputShape>().is_err());
    }

    #[test]
    fn test_row_to_json() {
        let row = Row::new(
            0,
            vec![
                ("pk".to_string(), FieldValue::Int64(3)),
                ("name".to_string(), FieldValue::VarChar("x".to_string())),
            ],
        );
        let json = row.to_json().unwrap();
        assert_eq!(json["pk"], serde_json::json!(3));
        assert_eq!(json["name"], serde_json::json!("x"));
    }

    #[test]
    fn test_row_serializes_in_field_order() {
        let row = Row::new(
            0,
            vec![
                ("pk".to_string(), FieldValue::Int64(3)),
                ("name".to_string(), FieldValue::VarChar("x".to_string())),
                ("embeddings".to_string(), FieldValue::FloatVector(vec![0.5])),
            ],
        );
        assert_eq!(
            serde_json::to_string(&row).unwrap(),
            r#"{"pk":3,"name":"x","embeddings":[0.5]}"#
        );
    }

    #[test]
    fn test_pivoted_rows_keep_column_order() {
        let rows = column_batch().to_rows();
        let names: Vec<_> = rows[0].fields.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["pk", "v"]);
    }
}
