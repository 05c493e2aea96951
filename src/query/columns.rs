// SPDX-License-Identifier: MIT OR Apache-2.0

//! Column listing with resolved display labels

use anyhow::Result;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::query::Session;
use servisy::dataset::Dataset;
use servisy::output::{colorize_dim, print_json, use_colors};

#[derive(Debug, Serialize)]
struct ColumnJson<'a> {
    column: &'a str,
    label: &'a str,
    /// Label came from the dataset's legend row
    from_legend: bool,
    summary: bool,
}

#[derive(Debug, Serialize)]
struct ColumnsPayload<'a> {
    command: &'static str,
    columns: Vec<ColumnJson<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

/// Run the columns command
pub fn run(session: &Session) -> Result<()> {
    let loaded = session.load();
    let dataset = loaded.catalog.dataset();

    match session.format {
        OutputFormat::Json => {
            let payload = ColumnsPayload {
                command: "columns",
                columns: column_entries(dataset),
                error: loaded.failure.as_deref(),
            };
            print_json(&payload, session.compact)?;
        }
        OutputFormat::Text => {
            if let Some(failure) = &loaded.failure {
                println!("{failure}");
                return Ok(());
            }
            let colors = use_colors();
            for entry in column_entries(dataset) {
                let marker = if entry.summary { "*" } else { " " };
                println!(
                    "{marker} {:<14} {}",
                    entry.column,
                    if entry.from_legend {
                        entry.label.to_string()
                    } else {
                        colorize_dim(entry.label, colors)
                    }
                );
            }
        }
    }

    Ok(())
}

fn column_entries(dataset: &Dataset) -> Vec<ColumnJson<'_>> {
    let schema = dataset.schema();
    let labels = dataset.labels();
    let summary = schema.summary_columns();
    schema
        .columns()
        .iter()
        .map(|ident| ColumnJson {
            column: ident,
            label: labels.label(ident),
            from_legend: labels.harvested(ident).is_some(),
            summary: summary.contains(&ident.as_str()),
        })
        .collect()
}
