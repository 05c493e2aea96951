// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dataset loading
//!
//! Reads the exported `{ meta, data }` document. Only an unreadable file or
//! invalid JSON is an error; every structural irregularity inside a valid
//! document degrades to empty values.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;

use crate::errors::LoadError;
use crate::schema::{ColumnLabels, Record, Schema};

/// Document-level metadata written by the exporter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DatasetMeta {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl DatasetMeta {
    fn from_value(value: Option<&Value>) -> Self {
        let Some(Value::Object(meta)) = value else {
            return Self::default();
        };

        let columns = meta
            .get("columns")
            .and_then(Value::as_array)
            .map(|cols| {
                cols.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let text = |key: &str| {
            meta.get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        Self {
            columns,
            record_count: meta.get("record_count").and_then(Value::as_u64),
            last_updated: text("last_updated"),
            source_file: text("source_file"),
            note: text("note"),
        }
    }

    /// One-line summary, e.g. `Počet záznamů: 120 · Poslední aktualizace: 2024-05-01T10:00:00`
    pub fn summary_line(&self) -> String {
        let mut parts = Vec::new();
        if let Some(count) = self.record_count {
            parts.push(format!("Počet záznamů: {count}"));
        }
        if let Some(updated) = &self.last_updated {
            parts.push(format!("Poslední aktualizace: {updated}"));
        }
        parts.join(" · ")
    }
}

/// A loaded dataset: schema, records and harvested labels
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    meta: DatasetMeta,
    schema: Schema,
    records: Vec<Record>,
    labels: ColumnLabels,
}

impl Dataset {
    /// Dataset with no columns and no records
    pub fn empty() -> Self {
        Self::default()
    }

    /// Read and parse the document at `path`
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Parse a document; `origin` names it in errors
    pub fn parse(content: &str, origin: &str) -> Result<Self, LoadError> {
        let document: Value = serde_json::from_str(content).map_err(|source| LoadError::Parse {
            origin: origin.to_string(),
            source,
        })?;
        if document.is_null() {
            return Err(LoadError::Empty {
                origin: origin.to_string(),
            });
        }
        Ok(Self::from_document(&document))
    }

    /// Build from an already parsed document
    pub fn from_document(document: &Value) -> Self {
        let meta = DatasetMeta::from_value(document.get("meta"));
        let rows: &[Value] = document
            .get("data")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let schema = Schema::new(resolve_columns(&meta, rows));
        let records: Vec<Record> = rows
            .iter()
            .enumerate()
            .map(|(id, row)| Record::new(id, fields_of(row.as_object())))
            .collect();

        let labels = match records.first() {
            Some(first) if first.has_legend_marker() => {
                ColumnLabels::from_legend(&schema, first)
            }
            _ => ColumnLabels::default(),
        };

        tracing::debug!(
            columns = schema.len(),
            records = records.len(),
            labels = labels.len(),
            "dataset parsed"
        );

        Self {
            meta,
            schema,
            records,
            labels,
        }
    }

    pub fn meta(&self) -> &DatasetMeta {
        &self.meta
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn record(&self, id: usize) -> Option<&Record> {
        self.records.get(id)
    }

    pub fn labels(&self) -> &ColumnLabels {
        &self.labels
    }

    /// The legend row, when the first record carries the sentinel
    pub fn legend(&self) -> Option<&Record> {
        self.records
            .first()
            .filter(|r| r.has_legend_marker())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// `meta.columns` when non-empty (and there is data), else the key order of
/// the first record.
fn resolve_columns(meta: &DatasetMeta, rows: &[Value]) -> Vec<String> {
    if rows.is_empty() {
        return Vec::new();
    }
    if !meta.columns.is_empty() {
        return meta.columns.clone();
    }
    rows.first()
        .and_then(Value::as_object)
        .map(|first| first.keys().cloned().collect())
        .unwrap_or_default()
}

/// Every non-null cell of a row, keyed by raw identifier.
fn fields_of(row: Option<&Map<String, Value>>) -> HashMap<String, String> {
    row.map(|row| {
        row.iter()
            .filter_map(|(ident, value)| Some((ident.clone(), cell_text(value)?)))
            .collect()
    })
    .unwrap_or_default()
}

fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}
