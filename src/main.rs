// SPDX-License-Identifier: MIT OR Apache-2.0

//! servisy - Browse contractual service records
//!
//! Groups branch rows into services, sorts them into category tabs and
//! searches them ignoring diacritics, highlighting what matched.

mod cli;
mod query;
mod watch;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use cli::{Cli, Commands, OutputFormat};
use tracing_subscriber::{fmt, EnvFilter};

use query::search::SearchArgs;
use query::Session;
use servisy::config::{Config, ConfigOutputFormat};
use servisy::filter::FilterState;

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = Config::load();

    let format = cli.format.unwrap_or(match config.output_format() {
        Some(ConfigOutputFormat::Json) => OutputFormat::Json,
        _ => OutputFormat::Text,
    });
    let session = Session {
        data_file: config.merge_data_file(cli.data),
        classifier: cli
            .classifier
            .map(Into::into)
            .or_else(|| config.classifier_kind())
            .unwrap_or_default(),
        format,
        compact: cli.compact,
    };

    match cli.command {
        Commands::Search {
            phrase,
            category,
            limit,
            branches,
        } => {
            let args = search_args(&config, phrase, category.as_deref(), limit, branches);
            query::search::run(&session, &args)?;
        }
        Commands::Stats => {
            query::stats::run(&session)?;
        }
        Commands::Columns => {
            query::columns::run(&session)?;
        }
        Commands::Watch {
            phrase,
            category,
            limit,
            branches,
        } => {
            let args = search_args(&config, phrase, category.as_deref(), limit, branches);
            watch::run(&session, &args)?;
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "servisy", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn search_args(
    config: &Config,
    phrase: Vec<String>,
    category: Option<&str>,
    limit: Option<usize>,
    branches: bool,
) -> SearchArgs {
    SearchArgs {
        state: FilterState::new(Some(config.merge_category(category)), phrase.join(" ")),
        limit: config.merge_max_results(limit),
        branches,
    }
}

/// Log to stderr so stdout stays machine-readable; `SERVISY_LOG` sets the filter
fn init_tracing() {
    let filter = EnvFilter::try_from_env("SERVISY_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
