// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types with helpful suggestions
//!
//! Provides user-friendly error messages with actionable suggestions.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure to load the source dataset
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read dataset '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("dataset '{origin}' is not valid JSON: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("dataset '{origin}' is an empty document")]
    Empty { origin: String },
}

/// Error indicating an unknown category selector was given
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategoryError {
    pub selector: String,
    pub known: Vec<String>,
}

impl fmt::Display for UnknownCategoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown category: '{}'\n\n\
             Known categories: {}\n\n\
             Example: servisy search --category moto \"praha\"",
            self.selector,
            self.known.join(", ")
        )
    }
}

impl std::error::Error for UnknownCategoryError {}

/// Error indicating an unknown classifier variant was configured
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownClassifierError {
    pub name: String,
}

impl fmt::Display for UnknownClassifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown classifier: '{}'\n\n\
             Supported classifiers: detailed, simple",
            self.name
        )
    }
}

impl std::error::Error for UnknownClassifierError {}

/// Helper functions for creating helpful error messages
pub mod suggestions {
    use super::Path;

    /// Fixed user-facing message shown instead of results when loading fails
    pub fn load_failure_message(path: &Path) -> String {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        format!("Nepodařilo se načíst data ze souboru {name}.")
    }

    /// Get suggestion for a data file that does not exist
    pub fn data_not_found_suggestion(path: &Path) -> String {
        format!(
            "Data file not found at '{}'\n\n\
             Point servisy at the exported JSON:\n\
             $ servisy --data path/to/data_output.json search\n\n\
             Or set `data_file` in .servisyrc.toml",
            path.display()
        )
    }

    /// Get suggestion for no results
    pub fn no_results_suggestion(query: &str, category: &str) -> String {
        if query.is_empty() {
            return format!("No services in category '{category}'");
        }
        format!(
            "No services in category '{}' match '{}'\n\n\
             Try:\n\
             - Fewer or shorter words (every word must match)\n\
             - Another category: --category auta|bus|moto|skla|pdr",
            category, query
        )
    }
}
