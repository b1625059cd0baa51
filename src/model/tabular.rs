//! Tabular sources for deriving field descriptors
//!
//! Anything exposing ordered `(label, element type)` columns can seed a
//! document's fields. `RecordSample` infers element types from a handful of
//! JSON records using dataframe-style dtype names.

use serde_json::{Map, Value};

/// One column of a tabular source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub label: String,
    pub element_type: String,
}

impl Column {
    pub fn new(label: impl Into<String>, element_type: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            element_type: element_type.into(),
        }
    }
}

/// A labeled table whose columns declare an element type.
pub trait TabularSource {
    /// Columns in table order.
    fn columns(&self) -> Vec<Column>;
}

impl TabularSource for [Column] {
    fn columns(&self) -> Vec<Column> {
        self.to_vec()
    }
}

impl TabularSource for Vec<Column> {
    fn columns(&self) -> Vec<Column> {
        self.clone()
    }
}

impl<L, T> TabularSource for [(L, T)]
where
    L: AsRef<str>,
    T: AsRef<str>,
{
    fn columns(&self) -> Vec<Column> {
        self.iter()
            .map(|(label, element_type)| Column::new(label.as_ref(), element_type.as_ref()))
            .collect()
    }
}

impl<L, T> TabularSource for Vec<(L, T)>
where
    L: AsRef<str>,
    T: AsRef<str>,
{
    fn columns(&self) -> Vec<Column> {
        self.as_slice().columns()
    }
}

/// Element type names, as a dataframe reports them.
pub mod dtype {
    pub const INT64: &str = "int64";
    pub const FLOAT64: &str = "float64";
    pub const BOOL: &str = "bool";
    pub const OBJECT: &str = "object";
}

/// Rows of JSON records; columns appear in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSample {
    records: Vec<Map<String, Value>>,
}

impl RecordSample {
    pub fn new(records: Vec<Map<String, Value>>) -> Self {
        Self { records }
    }

    /// Accepts a JSON array of objects; anything else is rejected.
    pub fn from_value(value: &Value) -> Option<Self> {
        let rows = value.as_array()?;
        let records = rows
            .iter()
            .map(|row| row.as_object().cloned())
            .collect::<Option<Vec<_>>>()?;
        Some(Self::new(records))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl TabularSource for RecordSample {
    fn columns(&self) -> Vec<Column> {
        let mut labels: Vec<&str> = Vec::new();
        for record in &self.records {
            for key in record.keys() {
                if !labels.contains(&key.as_str()) {
                    labels.push(key);
                }
            }
        }

        labels
            .into_iter()
            .map(|label| {
                let values = self.records.iter().filter_map(|record| record.get(label));
                Column::new(label, infer_dtype(values))
            })
            .collect()
    }
}

/// Infers one dtype for a column's values. Nulls are ignored; ints mixed
/// with floats widen to float; anything else mixed is `object`.
fn infer_dtype<'v>(values: impl Iterator<Item = &'v Value>) -> &'static str {
    let mut inferred: Option<&'static str> = None;
    for value in values {
        let current = match value {
            Value::Null => continue,
            Value::Bool(_) => dtype::BOOL,
            Value::Number(n) if n.is_i64() || n.is_u64() => dtype::INT64,
            Value::Number(_) => dtype::FLOAT64,
            _ => return dtype::OBJECT,
        };
        inferred = Some(match (inferred, current) {
            (None, current) => current,
            (Some(seen), current) if seen == current => seen,
            (Some(dtype::INT64), dtype::FLOAT64) | (Some(dtype::FLOAT64), dtype::INT64) => dtype::FLOAT64,
            _ => return dtype::OBJECT,
        });
    }
    inferred.unwrap_or(dtype::OBJECT)
}
