// SPDX-License-Identifier: MIT OR Apache-2.0

//! servisy - search, classification and grouping of contractual service records
//!
//! Shared modules for the servisy CLI tool: the diacritic-insensitive
//! normalizer and highlighter, the record classifier, the grouper and the
//! category/search filter pipeline.

pub mod classify;
pub mod config;
pub mod dataset;
pub mod errors;
pub mod filter;
pub mod group;
pub mod highlight;
pub mod output;
pub mod schema;
pub mod text;
