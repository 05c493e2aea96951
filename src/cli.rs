// SPDX-License-Identifier: MIT OR Apache-2.0

//! CLI argument parsing using clap

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use servisy::classify::ClassifierKind;

/// servisy - Browse contractual service records
///
/// Loads the exported service table, groups branch rows into services,
/// sorts them into category tabs and searches them ignoring diacritics.
#[derive(Parser, Debug)]
#[command(name = "servisy")]
#[command(
    author,
    version,
    about,
    long_about = None,
    override_usage = "servisy [OPTIONS] <COMMAND>",
    after_help = "Search quickstart:\n  servisy s \"praha východ\"\n  servisy search -c moto yamaha --branches\n  servisy --format json search -c skla brno"
)]
pub struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,

    /// Compact JSON output (no pretty formatting)
    #[arg(long, global = true)]
    pub compact: bool,

    /// Exported dataset (defaults to ./data_output.json)
    #[arg(short = 'D', long, global = true)]
    pub data: Option<PathBuf>,

    /// Classification rule set
    #[arg(long, global = true, value_enum)]
    pub classifier: Option<CliClassifier>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Classification rule set
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliClassifier {
    /// Five tabs: auta, bus, moto, skla, pdr
    Detailed,
    /// Three tabs: auta, bus, skla
    Simple,
}

impl From<CliClassifier> for ClassifierKind {
    fn from(value: CliClassifier) -> Self {
        match value {
            CliClassifier::Detailed => ClassifierKind::Detailed,
            CliClassifier::Simple => ClassifierKind::Simple,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search services in one category tab
    #[command(visible_alias = "s")]
    Search {
        /// Search words; every word must occur in one branch (diacritics ignored)
        phrase: Vec<String>,

        /// Category tab: auta, bus, moto, skla, pdr
        #[arg(short, long)]
        category: Option<String>,

        /// Maximum number of services to print
        #[arg(short = 'm', long = "limit")]
        limit: Option<usize>,

        /// List every branch of each service
        #[arg(short, long)]
        branches: bool,
    },

    /// Show dataset metadata and per-category counts
    Stats,

    /// List column identifiers with their display labels
    Columns,

    /// Re-run a search whenever the data file changes
    #[command(visible_alias = "w")]
    Watch {
        /// Search words
        phrase: Vec<String>,

        /// Category tab: auta, bus, moto, skla, pdr
        #[arg(short, long)]
        category: Option<String>,

        /// Maximum number of services to print
        #[arg(short = 'm', long = "limit")]
        limit: Option<usize>,

        /// List every branch of each service
        #[arg(short, long)]
        branches: bool,
    },

    /// Generate shell completion scripts
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}
