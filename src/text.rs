// SPDX-License-Identifier: MIT OR Apache-2.0

//! Diacritic-insensitive text folding
//!
//! Every character is lowercased and folded on its own, so the folded text is
//! the concatenation of per-character pieces. The highlighter relies on this
//! to map positions in the folded text back to the original.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use unicode_normalization::UnicodeNormalization;

/// Latin-1 and Czech letters with their base letter (lowercase forms only,
/// input is lowercased before lookup).
const DIACRITICS: &[(char, char)] = &[
    ('à', 'a'), ('á', 'a'), ('â', 'a'), ('ã', 'a'), ('ä', 'a'), ('å', 'a'),
    ('è', 'e'), ('é', 'e'), ('ê', 'e'), ('ë', 'e'), ('ě', 'e'),
    ('ì', 'i'), ('í', 'i'), ('î', 'i'), ('ï', 'i'),
    ('ò', 'o'), ('ó', 'o'), ('ô', 'o'), ('õ', 'o'), ('ö', 'o'),
    ('ù', 'u'), ('ú', 'u'), ('û', 'u'), ('ü', 'u'), ('ů', 'u'),
    ('ý', 'y'), ('ÿ', 'y'),
    ('ñ', 'n'), ('ň', 'n'),
    ('ç', 'c'), ('č', 'c'),
    ('ď', 'd'),
    ('ř', 'r'),
    ('š', 's'),
    ('ť', 't'),
    ('ž', 'z'),
];

static DIACRITIC_MAP: Lazy<HashMap<char, char>> =
    Lazy::new(|| DIACRITICS.iter().copied().collect());

/// Fold a single character into `out`.
///
/// Produces zero or more characters: ASCII passes through lowercased, table
/// letters become their base letter, anything else is NFD-decomposed with
/// combining marks dropped (a lone combining mark folds to nothing).
pub fn fold_into(c: char, out: &mut String) {
    for lower in c.to_lowercase() {
        if lower.is_ascii() {
            out.push(lower);
        } else if let Some(base) = DIACRITIC_MAP.get(&lower) {
            out.push(*base);
        } else {
            out.extend(lower.nfd().filter(|m| !is_combining_mark(*m)));
        }
    }
}

/// Fold a single character to its canonical piece.
pub fn fold_char(c: char) -> String {
    let mut piece = String::new();
    fold_into(c, &mut piece);
    piece
}

/// Canonical form used for comparisons: lowercase, diacritics removed.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        fold_into(c, &mut out);
    }
    out
}

/// Same as [`normalize`], with absence mapped to the empty string.
pub fn normalize_opt(text: Option<&str>) -> String {
    text.map(normalize).unwrap_or_default()
}

/// Normalized search phrase split on whitespace, empty pieces dropped.
pub fn search_words(phrase: &str) -> Vec<String> {
    normalize(phrase)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Remove every whitespace character.
pub fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
}
