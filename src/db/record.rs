//! Dynamically typed result rows.
//!
//! The query composer returns whatever the registry's select list produces,
//! which differs per entity (joined display columns included), so rows are
//! kept as ordered column names plus SQLite values rather than typed structs.

use rusqlite::types::Value;
use rusqlite::{params_from_iter, Statement};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::sync::Arc;

/// One result row. Column names are shared with the owning [`RecordSet`].
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl Record {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|name| name == column)
            .and_then(|index| self.values.get(index))
    }

    /// Column value as text; numbers are formatted, NULL is `None`.
    pub fn text(&self, column: &str) -> Option<String> {
        self.get(column).and_then(value_to_text)
    }

    pub fn int(&self, column: &str) -> Option<i64> {
        match self.get(column)? {
            Value::Integer(value) => Some(*value),
            Value::Text(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    /// Column value rendered for tables and exports; NULL becomes "".
    pub fn display(&self, column: &str) -> String {
        self.text(column).unwrap_or_default()
    }

    /// All values rendered for tables and exports, in column order.
    pub fn display_values(&self) -> Vec<String> {
        self.values.iter().map(|value| value_to_text(value).unwrap_or_default()).collect()
    }
}

/// An ordered collection of rows sharing one column list.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSet {
    columns: Arc<[String]>,
    records: Vec<Record>,
}

impl RecordSet {
    /// Runs a prepared statement and collects every row.
    pub(crate) fn collect(stmt: &mut Statement<'_>, params: &[Value]) -> rusqlite::Result<Self> {
        let columns: Arc<[String]> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();

        let mut rows = stmt.query(params_from_iter(params.iter()))?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            let values = (0..width)
                .map(|index| row.get::<_, Value>(index))
                .collect::<rusqlite::Result<Vec<_>>>()?;
            records.push(Record {
                columns: Arc::clone(&columns),
                values,
            });
        }

        Ok(Self { columns, records })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Text values of one column across all rows.
    pub fn column_text(&self, column: &str) -> Vec<Option<String>> {
        self.records.iter().map(|record| record.text(column)).collect()
    }

    /// Integer values of one column across all rows, skipping NULLs.
    pub fn ids(&self, column: &str) -> Vec<i64> {
        self.records.iter().filter_map(|record| record.int(column)).collect()
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Integer(value) => Some(value.to_string()),
        Value::Real(value) => Some(value.to_string()),
        Value::Text(text) => Some(text.clone()),
        Value::Blob(bytes) => Some(format!("<{} bytes>", bytes.len())),
    }
}

struct SqlValue<'a>(&'a Value);

impl Serialize for SqlValue<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Value::Null => serializer.serialize_none(),
            Value::Integer(value) => serializer.serialize_i64(*value),
            Value::Real(value) => serializer.serialize_f64(*value),
            Value::Text(text) => serializer.serialize_str(text),
            Value::Blob(bytes) => serializer.serialize_bytes(bytes),
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (column, value) in self.columns.iter().zip(&self.values) {
            map.serialize_entry(column, &SqlValue(value))?;
        }
        map.end()
    }
}

impl Serialize for RecordSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.records.len()))?;
        for record in &self.records {
            seq.serialize_element(record)?;
        }
        seq.end()
    }
}
