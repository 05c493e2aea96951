// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration file support for servisy
//!
//! Loads configuration from .servisyrc.toml in current directory or ~/.config/servisy/config.toml

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::classify::{Category, ClassifierKind};

/// Data file looked up in the current directory when nothing else is set
pub const DEFAULT_DATA_FILE: &str = "data_output.json";

/// Output format for results (mirrored from cli for library use)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigOutputFormat {
    #[default]
    Text,
    Json,
}

/// Configuration loaded from .servisyrc.toml or ~/.config/servisy/config.toml
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path of the exported JSON dataset
    pub data_file: Option<PathBuf>,
    /// Tab selected when --category is not given
    pub default_category: Option<String>,
    /// Default output format (text or json)
    pub default_format: Option<String>,
    /// Classifier variant (detailed or simple)
    pub classifier: Option<String>,
    /// Maximum number of groups to print
    pub max_results: Option<usize>,
}

impl Config {
    /// Load configuration from files
    ///
    /// Precedence (highest to lowest):
    /// 1. .servisyrc.toml in current directory
    /// 2. ~/.config/servisy/config.toml
    pub fn load() -> Self {
        if let Some(config) = Self::load_from_path(Path::new(".servisyrc.toml")) {
            return config;
        }

        if let Some(home) = dirs::home_dir() {
            let config_path = home.join(".config").join("servisy").join("config.toml");
            if let Some(config) = Self::load_from_path(&config_path) {
                return config;
            }
        }

        Self::default()
    }

    pub fn load_from_path(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "loaded config");
                Some(config)
            }
            Err(e) => {
                eprintln!("Warning: Failed to parse {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Get output format from config, parsing the string to ConfigOutputFormat
    pub fn output_format(&self) -> Option<ConfigOutputFormat> {
        self.default_format.as_ref().and_then(|s| match s.to_lowercase().as_str() {
            "json" => Some(ConfigOutputFormat::Json),
            "text" => Some(ConfigOutputFormat::Text),
            _ => None,
        })
    }

    /// Classifier variant from config; unknown names warn and fall back
    pub fn classifier_kind(&self) -> Option<ClassifierKind> {
        let name = self.classifier.as_deref()?;
        match name.parse() {
            Ok(kind) => Some(kind),
            Err(e) => {
                tracing::warn!(classifier = name, "{e}");
                None
            }
        }
    }

    /// Merge CLI data path with config (CLI wins)
    pub fn merge_data_file(&self, cli_value: Option<PathBuf>) -> PathBuf {
        cli_value
            .or_else(|| self.data_file.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE))
    }

    /// Merge CLI tab selector with config (CLI wins); unknown selectors
    /// resolve to the default tab
    pub fn merge_category(&self, cli_value: Option<&str>) -> Category {
        let selector = cli_value.or(self.default_category.as_deref());
        if let Some(raw) = selector {
            if let Err(e) = raw.parse::<Category>() {
                tracing::warn!("{e}");
            }
        }
        Category::from_selector(selector)
    }

    /// Merge CLI options with config (CLI wins); `None` means unlimited
    pub fn merge_max_results(&self, cli_value: Option<usize>) -> Option<usize> {
        cli_value.or(self.max_results).filter(|n| *n > 0)
    }
}
