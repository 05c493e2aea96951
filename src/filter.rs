// SPDX-License-Identifier: MIT OR Apache-2.0

//! Category + search filter over grouped services
//!
//! A group is visible when it belongs to the selected tab and at least one of
//! its branches contains every search word somewhere across all its columns.
//! Only the representative branch is rendered in the overview, so a group may
//! be visible because of a branch whose text is not shown.

use crate::classify::Category;
use crate::group::{Catalog, Group};
use crate::text::search_words;

/// Active tab and raw search phrase
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub category: Option<Category>,
    pub phrase: String,
}

impl FilterState {
    pub fn new(category: Option<Category>, phrase: impl Into<String>) -> Self {
        Self {
            category,
            phrase: phrase.into(),
        }
    }

    /// Build from a loose tab selector; unknown selectors pick the default tab.
    pub fn from_selector(selector: Option<&str>, phrase: impl Into<String>) -> Self {
        Self::new(Some(Category::from_selector(selector)), phrase)
    }

    pub fn selected_category(&self) -> Category {
        self.category.unwrap_or_default()
    }

    /// Trimmed phrase, as handed to the highlighter.
    pub fn query(&self) -> &str {
        self.phrase.trim()
    }

    pub fn words(&self) -> Vec<String> {
        search_words(self.query())
    }
}

/// True when `haystack` (already normalized) contains every word.
pub fn matches_all_words(haystack: &str, words: &[String]) -> bool {
    words.iter().all(|w| haystack.contains(w.as_str()))
}

/// Groups visible under `state`, in catalog order.
pub fn apply_filter<'c>(catalog: &'c Catalog, state: &FilterState) -> Vec<&'c Group> {
    let category = state.selected_category();
    let in_category = catalog
        .groups()
        .iter()
        .filter(move |g| g.category() == category);

    let words = state.words();
    if words.is_empty() {
        return in_category.collect();
    }

    in_category
        .filter(|group| {
            group
                .branches()
                .iter()
                .any(|id| matches_all_words(catalog.haystack(*id), &words))
        })
        .collect()
}
