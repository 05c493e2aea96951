// SPDX-License-Identifier: MIT OR Apache-2.0

//! Column schema and records
//!
//! The source export carries a handful of business columns by name and the
//! rest as positional `Unnamed: N` placeholders. Both are resolved once at
//! load time into a [`Schema`]; logic reads cells through [`Column`] roles.

use std::collections::{HashMap, HashSet};

/// Positional identity of a record in the source list.
pub type RecordId = usize;

/// Value of the legend column that marks the dataset's own header row.
pub const LEGEND_SENTINEL: &str = "Stav";

/// Semantic column roles with their raw identifiers in the export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    ContractNumber,
    CompanyId,
    ServiceName,
    Legend,
    Street,
    Zip,
    City,
    Email,
    Phone,
    ServiceType,
    Brands,
    OpeningHours,
    Latitude,
    Longitude,
}

impl Column {
    pub const ALL: [Column; 14] = [
        Column::ContractNumber,
        Column::CompanyId,
        Column::ServiceName,
        Column::Legend,
        Column::Street,
        Column::Zip,
        Column::City,
        Column::Email,
        Column::Phone,
        Column::ServiceType,
        Column::Brands,
        Column::OpeningHours,
        Column::Latitude,
        Column::Longitude,
    ];

    /// Columns shown in the overview, in display order.
    pub const SUMMARY: [Column; 3] = [Column::ServiceName, Column::CompanyId, Column::ContractNumber];

    /// Raw column identifier in the export.
    pub fn ident(self) -> &'static str {
        match self {
            Column::ContractNumber => "KAM",
            Column::CompanyId => "Likvidace",
            Column::ServiceName => "KAPU",
            Column::Legend => "Legenda:",
            Column::Street => "Unnamed: 5",
            Column::Zip => "Unnamed: 6",
            Column::City => "Unnamed: 7",
            Column::Email => "Unnamed: 9",
            Column::Phone => "Unnamed: 10",
            Column::ServiceType => "Unnamed: 11",
            Column::Brands => "Unnamed: 12",
            Column::OpeningHours => "Unnamed: 14",
            Column::Latitude => "Unnamed: 18",
            Column::Longitude => "Unnamed: 19",
        }
    }

    pub fn from_ident(ident: &str) -> Option<Column> {
        Column::ALL.into_iter().find(|c| c.ident() == ident)
    }

    /// Built-in label, used when the legend row does not provide one.
    pub fn default_label(self) -> Option<&'static str> {
        match self {
            Column::ContractNumber => Some("Číslo smlouvy"),
            Column::CompanyId => Some("IČ"),
            Column::ServiceName => Some("Název servisu"),
            _ => None,
        }
    }
}

/// Ordered column identifiers of one loaded dataset.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    columns: Vec<String>,
    known: HashSet<String>,
}

impl Schema {
    /// Build from identifiers; a repeated identifier keeps its first position.
    pub fn new(columns: Vec<String>) -> Self {
        let mut unique = Vec::with_capacity(columns.len());
        let mut known = HashSet::with_capacity(columns.len());
        for column in columns {
            if known.insert(column.clone()) {
                unique.push(column);
            }
        }
        Self {
            columns: unique,
            known,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn contains(&self, column: Column) -> bool {
        self.known.contains(column.ident())
    }

    /// Overview columns: the summary roles present in this dataset, or the
    /// first three columns when none of them are.
    pub fn summary_columns(&self) -> Vec<&str> {
        let present: Vec<&str> = Column::SUMMARY
            .iter()
            .filter(|c| self.contains(**c))
            .map(|c| c.ident())
            .collect();
        if !present.is_empty() {
            return present;
        }
        self.columns.iter().take(3).map(String::as_str).collect()
    }
}

/// One source row.
///
/// Keeps every non-null cell of the row by raw identifier, whether or not
/// the identifier is one of the dataset's resolved columns. Roles and the
/// legend marker are read from the row itself; the [`Schema`] only orders
/// cells for the search haystack and column listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    id: RecordId,
    fields: HashMap<String, String>,
}

impl Record {
    pub fn new(id: RecordId, fields: HashMap<String, String>) -> Self {
        Self { id, fields }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    /// Cell by raw identifier; `None` when missing or null.
    pub fn cell(&self, ident: &str) -> Option<&str> {
        self.fields.get(ident).map(String::as_str)
    }

    /// Cell by raw identifier, `""` when absent.
    pub fn value(&self, ident: &str) -> &str {
        self.cell(ident).unwrap_or("")
    }

    /// Cell by semantic role, `""` when absent.
    pub fn get(&self, column: Column) -> &str {
        self.value(column.ident())
    }

    /// Cells of the schema's columns, in schema order.
    pub fn cells<'a>(&'a self, schema: &'a Schema) -> impl Iterator<Item = Option<&'a str>> + 'a {
        schema.columns().iter().map(move |ident| self.cell(ident))
    }

    /// True when this row carries the legend sentinel.
    pub fn has_legend_marker(&self) -> bool {
        self.get(Column::Legend) == LEGEND_SENTINEL
    }
}

/// Human-readable column labels.
///
/// Harvested labels come from the legend row; lookups fall back to the
/// built-in labels of the summary columns and then to the raw identifier.
#[derive(Debug, Clone, Default)]
pub struct ColumnLabels {
    harvested: HashMap<String, String>,
}

impl ColumnLabels {
    /// Take every non-blank cell of the legend row as the label of its column.
    pub fn from_legend(schema: &Schema, legend: &Record) -> Self {
        let harvested = schema
            .columns()
            .iter()
            .filter_map(|ident| {
                let label = legend.cell(ident)?;
                if label.trim().is_empty() {
                    return None;
                }
                Some((ident.clone(), label.to_string()))
            })
            .collect();
        Self { harvested }
    }

    pub fn harvested(&self, ident: &str) -> Option<&str> {
        self.harvested.get(ident).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.harvested.len()
    }

    pub fn is_empty(&self) -> bool {
        self.harvested.is_empty()
    }

    pub fn label<'a>(&'a self, ident: &'a str) -> &'a str {
        if let Some(label) = self.harvested(ident) {
            return label;
        }
        Column::from_ident(ident)
            .and_then(Column::default_label)
            .unwrap_or(ident)
    }
}
