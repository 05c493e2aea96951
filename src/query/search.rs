// SPDX-License-Identifier: MIT OR Apache-2.0

//! Category + full-text search over grouped services

use anyhow::Result;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::query::{Loaded, Session};
use servisy::classify::Category;
use servisy::dataset::DatasetMeta;
use servisy::errors::suggestions::no_results_suggestion;
use servisy::filter::{apply_filter, FilterState};
use servisy::group::{Catalog, Group};
use servisy::highlight::highlight;
use servisy::output::{colorize_dim, colorize_heading, highlight_terminal, print_json, use_colors};
use servisy::schema::{Column, Record, RecordId, Schema};

/// Columns describing where a branch is, shown under its service
const ADDRESS_COLUMNS: [Column; 3] = [Column::Street, Column::Zip, Column::City];

/// Options of one search invocation
#[derive(Debug, Clone)]
pub struct SearchArgs {
    pub state: FilterState,
    pub limit: Option<usize>,
    pub branches: bool,
}

#[derive(Debug, Serialize)]
struct DatasetJson<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    record_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_updated: Option<&'a str>,
}

impl<'a> DatasetJson<'a> {
    fn from_meta(meta: &'a DatasetMeta) -> Self {
        Self {
            record_count: meta.record_count,
            last_updated: meta.last_updated.as_deref(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SearchMeta<'a> {
    command: &'static str,
    category: Category,
    query: &'a str,
    total: usize,
    shown: usize,
    dataset: DatasetJson<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

/// One rendered cell: raw text plus HTML with highlight markup
#[derive(Debug, Serialize)]
struct CellJson<'a> {
    column: &'a str,
    label: &'a str,
    text: &'a str,
    html: String,
}

#[derive(Debug, Serialize)]
struct BranchJson<'a> {
    record: RecordId,
    cells: Vec<CellJson<'a>>,
}

#[derive(Debug, Serialize)]
struct GroupJson<'a> {
    category: Category,
    branch_count: usize,
    cells: Vec<CellJson<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    branches: Vec<BranchJson<'a>>,
}

#[derive(Debug, Serialize)]
struct SearchPayload<'a> {
    meta: SearchMeta<'a>,
    results: Vec<GroupJson<'a>>,
}

/// Run the search command
pub fn run(session: &Session, args: &SearchArgs) -> Result<()> {
    let loaded = session.load();
    render(session, &loaded, args)
}

/// Render a search against an already loaded catalog
pub fn render(session: &Session, loaded: &Loaded, args: &SearchArgs) -> Result<()> {
    let catalog = &loaded.catalog;
    let visible = apply_filter(catalog, &args.state);
    let shown = args
        .limit
        .map_or(visible.len(), |limit| limit.min(visible.len()));

    tracing::debug!(
        category = %args.state.selected_category(),
        query = args.state.query(),
        visible = visible.len(),
        "search evaluated"
    );

    match session.format {
        OutputFormat::Json => {
            let payload = SearchPayload {
                meta: SearchMeta {
                    command: "search",
                    category: args.state.selected_category(),
                    query: args.state.query(),
                    total: visible.len(),
                    shown,
                    dataset: DatasetJson::from_meta(catalog.dataset().meta()),
                    error: loaded.failure.as_deref(),
                },
                results: visible[..shown]
                    .iter()
                    .map(|group| group_json(catalog, group, args))
                    .collect(),
            };
            print_json(&payload, session.compact)?;
        }
        OutputFormat::Text => {
            if let Some(failure) = &loaded.failure {
                println!("{failure}");
                return Ok(());
            }
            print!("{}", render_text(catalog, &visible[..shown], visible.len(), args, use_colors()));
        }
    }

    Ok(())
}

fn group_json<'a>(catalog: &'a Catalog, group: &'a Group, args: &'a SearchArgs) -> GroupJson<'a> {
    let schema = catalog.schema();
    let query = args.state.query();
    let summary = schema.summary_columns();

    let branches = if args.branches {
        let columns = branch_columns(schema);
        catalog
            .branches(group)
            .map(|record| BranchJson {
                record: record.id(),
                cells: cells_json(catalog, record, &columns, query),
            })
            .collect()
    } else {
        Vec::new()
    };

    GroupJson {
        category: group.category(),
        branch_count: group.branch_count(),
        cells: cells_json(catalog, catalog.representative(group), &summary, query),
        branches,
    }
}

fn cells_json<'a>(
    catalog: &'a Catalog,
    record: &'a Record,
    columns: &[&'a str],
    query: &str,
) -> Vec<CellJson<'a>> {
    let labels = catalog.dataset().labels();
    columns
        .iter()
        .map(|&ident| {
            let text = record.value(ident);
            CellJson {
                column: ident,
                label: labels.label(ident),
                text,
                html: highlight(text, query),
            }
        })
        .collect()
}

/// Summary columns followed by the address columns present in `schema`.
fn branch_columns(schema: &Schema) -> Vec<&str> {
    let mut columns = schema.summary_columns();
    for column in ADDRESS_COLUMNS {
        if schema.contains(column) && !columns.contains(&column.ident()) {
            columns.push(column.ident());
        }
    }
    columns
}

fn render_text(
    catalog: &Catalog,
    groups: &[&Group],
    total: usize,
    args: &SearchArgs,
    colors: bool,
) -> String {
    let category = args.state.selected_category();
    let query = args.state.query();
    let mut out = String::new();

    let mut heading = format!("{} · {} of {} services", category.label(), groups.len(), total);
    if !query.is_empty() {
        heading.push_str(&format!(" · \"{query}\""));
    }
    out.push_str(&colorize_heading(&heading, colors));
    out.push('\n');

    let meta_line = catalog.dataset().meta().summary_line();
    if !meta_line.is_empty() {
        out.push_str(&colorize_dim(&meta_line, colors));
        out.push('\n');
    }
    out.push('\n');

    if groups.is_empty() {
        out.push_str(&no_results_suggestion(query, category.tag()));
        out.push('\n');
        return out;
    }

    let schema = catalog.schema();
    let labels = catalog.dataset().labels();
    let summary = schema.summary_columns();

    for (n, group) in groups.iter().enumerate() {
        let record = catalog.representative(group);
        let mut line = format!("{:>3}. ", n + 1);
        for (i, ident) in summary.iter().enumerate() {
            let cell = highlight_terminal(record.value(ident), query, colors);
            if i == 0 {
                line.push_str(&cell);
            } else {
                line.push_str(&format!(" · {}: {}", labels.label(ident), cell));
            }
        }
        if group.branch_count() > 1 {
            line.push_str(&colorize_dim(&format!("  ({} branches)", group.branch_count()), colors));
        }
        out.push_str(&line);
        out.push('\n');

        if args.branches {
            for branch in catalog.branches(group) {
                out.push_str("       - ");
                out.push_str(&branch_line(branch, query, colors));
                out.push('\n');
            }
        }
    }

    out
}

/// `street, zip city` of a branch, highlighted; `-` when no address is known.
fn branch_line(record: &Record, query: &str, colors: bool) -> String {
    let cell = |column: Column| highlight_terminal(record.get(column).trim(), query, colors);
    let street = cell(Column::Street);
    let town = [cell(Column::Zip), cell(Column::City)]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let parts: Vec<String> = [street, town].into_iter().filter(|s| !s.is_empty()).collect();
    if parts.is_empty() {
        return "-".to_string();
    }
    parts.join(", ")
}
