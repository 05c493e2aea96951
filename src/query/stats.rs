// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dataset summary: metadata and per-category counts

use anyhow::Result;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::query::Session;
use servisy::classify::ClassifierKind;
use servisy::dataset::DatasetMeta;
use servisy::group::{Catalog, CategoryCount};
use servisy::output::{colorize_heading, print_json, use_colors};

#[derive(Debug, Serialize)]
struct CategoryJson {
    #[serde(flatten)]
    count: CategoryCount,
    label: &'static str,
}

#[derive(Debug, Serialize)]
struct StatsPayload<'a> {
    command: &'static str,
    classifier: ClassifierKind,
    dataset: &'a DatasetMeta,
    records: usize,
    legend: bool,
    groups: usize,
    categories: Vec<CategoryJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

/// Run the stats command
pub fn run(session: &Session) -> Result<()> {
    let loaded = session.load();
    let catalog = &loaded.catalog;

    match session.format {
        OutputFormat::Json => {
            let payload = StatsPayload {
                command: "stats",
                classifier: catalog.classifier().kind(),
                dataset: catalog.dataset().meta(),
                records: catalog.dataset().len(),
                legend: catalog.dataset().legend().is_some(),
                groups: catalog.groups().len(),
                categories: catalog
                    .category_counts()
                    .into_iter()
                    .map(|count| CategoryJson {
                        label: count.category.label(),
                        count,
                    })
                    .collect(),
                error: loaded.failure.as_deref(),
            };
            print_json(&payload, session.compact)?;
        }
        OutputFormat::Text => {
            if let Some(failure) = &loaded.failure {
                println!("{failure}");
                return Ok(());
            }
            print!("{}", render_text(catalog, use_colors()));
        }
    }

    Ok(())
}

fn render_text(catalog: &Catalog, colors: bool) -> String {
    let dataset = catalog.dataset();
    let mut out = String::new();

    let meta_line = dataset.meta().summary_line();
    if !meta_line.is_empty() {
        out.push_str(&meta_line);
        out.push('\n');
    }
    if let Some(note) = &dataset.meta().note {
        out.push_str(&format!("Note: {note}\n"));
    }
    out.push_str(&format!(
        "{} rows loaded, {} services\n\n",
        dataset.len(),
        catalog.groups().len()
    ));

    out.push_str(&colorize_heading(
        &format!("{:<6} {:>8} {:>8}", "Tab", "Services", "Branches"),
        colors,
    ));
    out.push('\n');
    for count in catalog.category_counts() {
        out.push_str(&format!(
            "{:<6} {:>8} {:>8}\n",
            count.category.label(),
            count.groups,
            count.branches
        ));
    }
    out
}
