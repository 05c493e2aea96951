// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query module - search, stats and column listing commands

pub mod columns;
pub mod search;
pub mod stats;

use std::path::PathBuf;

use crate::cli::OutputFormat;
use servisy::classify::{Classifier, ClassifierKind};
use servisy::dataset::Dataset;
use servisy::errors::suggestions::{data_not_found_suggestion, load_failure_message};
use servisy::errors::LoadError;
use servisy::group::Catalog;

/// Settings shared by every command, resolved from CLI flags and config
#[derive(Debug, Clone)]
pub struct Session {
    pub data_file: PathBuf,
    pub classifier: ClassifierKind,
    pub format: OutputFormat,
    pub compact: bool,
}

/// Result of one load attempt
#[derive(Debug)]
pub struct Loaded {
    pub catalog: Catalog,
    /// Fixed user-facing message when the load failed
    pub failure: Option<String>,
}

impl Session {
    /// Load the dataset and build the catalog.
    ///
    /// A failed load is not an error: it yields an empty catalog plus the
    /// message to show in place of results.
    pub fn load(&self) -> Loaded {
        match Dataset::load(&self.data_file) {
            Ok(dataset) => Loaded {
                catalog: Catalog::build(dataset, Classifier::for_kind(self.classifier)),
                failure: None,
            },
            Err(e) => {
                tracing::error!(error = %e, "failed to load dataset");
                if let LoadError::Io { source, .. } = &e {
                    if source.kind() == std::io::ErrorKind::NotFound {
                        tracing::warn!("{}", data_not_found_suggestion(&self.data_file));
                    }
                }
                Loaded {
                    catalog: Catalog::empty(self.classifier),
                    failure: Some(load_failure_message(&self.data_file)),
                }
            }
        }
    }
}
