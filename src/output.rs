// SPDX-License-Identifier: MIT OR Apache-2.0

//! Output helpers shared by the commands

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::io::IsTerminal;

use crate::highlight::{highlight_spans, splice};

/// Whether terminal colours should be used (TTY and `NO_COLOR` unset)
pub fn use_colors() -> bool {
    std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
}

/// Print a value as JSON, pretty unless `compact`
pub fn print_json<T: Serialize>(value: &T, compact: bool) -> Result<()> {
    let rendered = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{rendered}");
    Ok(())
}

/// Terminal rendering of `text` with matches of `phrase` emphasized.
///
/// Without colours the text is returned unchanged.
pub fn highlight_terminal(text: &str, phrase: &str, colors: bool) -> String {
    if !colors {
        return text.to_string();
    }
    let spans = highlight_spans(text, phrase);
    splice(text, &spans, str::to_string, |segment| {
        segment.black().on_yellow().to_string()
    })
}

pub fn colorize_heading(text: &str, colors: bool) -> String {
    if colors {
        text.bold().to_string()
    } else {
        text.to_string()
    }
}

pub fn colorize_dim(text: &str, colors: bool) -> String {
    if colors {
        text.dimmed().to_string()
    } else {
        text.to_string()
    }
}
