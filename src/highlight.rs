// SPDX-License-Identifier: MIT OR Apache-2.0

//! Search-match highlighting over diacritic-folded text
//!
//! Matching happens on the folded form of a field while spans are reported
//! as byte ranges of the original text, so markup lands on the characters the
//! user actually sees ("východ" is marked when searching "vychod").

use serde::Serialize;

use crate::text::{fold_into, search_words};

/// Opening marker wrapped around highlighted text in HTML output.
pub const MARK_OPEN: &str = "<mark class=\"highlight\">";
/// Closing marker for [`MARK_OPEN`].
pub const MARK_CLOSE: &str = "</mark>";

/// Half-open byte range `[start, end)` into the original text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Folded text plus, for every folded byte, the byte range of the original
/// character that produced it.
struct FoldedText {
    folded: String,
    origin: Vec<(usize, usize)>,
}

impl FoldedText {
    fn new(text: &str) -> Self {
        let mut folded = String::with_capacity(text.len());
        let mut origin = Vec::with_capacity(text.len());
        let mut piece = String::new();

        for (start, c) in text.char_indices() {
            piece.clear();
            fold_into(c, &mut piece);
            let range = (start, start + c.len_utf8());
            origin.extend(std::iter::repeat(range).take(piece.len()));
            folded.push_str(&piece);
        }

        Self { folded, origin }
    }

    /// Original span covering folded bytes `[start, end)`; `end > start`.
    fn original_span(&self, start: usize, end: usize) -> Span {
        Span::new(self.origin[start].0, self.origin[end - 1].1)
    }
}

/// Spans of `text` matched by the words of `phrase`, merged and sorted.
///
/// Empty when the phrase has no words or when any word is missing from the
/// field: a field is highlighted only if it contains every word.
pub fn highlight_spans(text: &str, phrase: &str) -> Vec<Span> {
    if text.is_empty() || phrase.is_empty() {
        return Vec::new();
    }

    let words = search_words(phrase);
    if words.is_empty() {
        return Vec::new();
    }

    let folded = FoldedText::new(text);
    if !words.iter().all(|w| folded.folded.contains(w.as_str())) {
        return Vec::new();
    }

    let mut spans = Vec::new();
    for word in &words {
        let mut from = 0;
        while let Some(offset) = folded.folded[from..].find(word.as_str()) {
            let at = from + offset;
            spans.push(folded.original_span(at, at + word.len()));
            // next scan position is one character further, so overlapping
            // occurrences are all found
            let step = folded.folded[at..]
                .chars()
                .next()
                .map_or(1, char::len_utf8);
            from = at + step;
        }
    }

    merge_spans(spans)
}

/// Sort spans by start and coalesce overlapping or touching ones.
pub fn merge_spans(mut spans: Vec<Span>) -> Vec<Span> {
    spans.sort_by_key(|s| (s.start, s.end));

    let mut merged: Vec<Span> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(last) if span.start <= last.end => {
                last.end = last.end.max(span.end);
            }
            _ => merged.push(span),
        }
    }
    merged
}

/// Render `text` by passing unmatched segments through `plain` and merged
/// spans through `marked`, left to right.
pub fn splice<P, M>(text: &str, spans: &[Span], mut plain: P, mut marked: M) -> String
where
    P: FnMut(&str) -> String,
    M: FnMut(&str) -> String,
{
    let mut out = String::with_capacity(text.len() + spans.len() * 32);
    let mut last = 0;
    for span in spans {
        out.push_str(&plain(&text[last..span.start]));
        out.push_str(&marked(&text[span.start..span.end]));
        last = span.end;
    }
    out.push_str(&plain(&text[last..]));
    out
}

/// HTML-safe rendering of `text` with every match of `phrase` wrapped in
/// [`MARK_OPEN`]/[`MARK_CLOSE`].
///
/// Escaping is applied per segment after span computation, so entities such
/// as `&amp;` never shift span boundaries.
pub fn highlight(text: &str, phrase: &str) -> String {
    let spans = highlight_spans(text, phrase);
    splice(text, &spans, escape_html, |segment| {
        format!("{MARK_OPEN}{}{MARK_CLOSE}", escape_html(segment))
    })
}

/// Escape text for use as HTML element content.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marked(text: &str) -> String {
        format!("{MARK_OPEN}{text}{MARK_CLOSE}")
    }

    #[test]
    fn empty_phrase_returns_escaped_text() {
        assert_eq!(highlight("AUTO <K+M> & syn", ""), "AUTO &lt;K+M&gt; &amp; syn");
        assert_eq!(highlight("", "praha"), "");
    }

    #[test]
    fn whitespace_only_phrase_returns_escaped_text() {
        assert_eq!(highlight("a < b", "   "), "a &lt; b");
    }

    #[test]
    fn marks_original_characters_for_folded_match() {
        assert_eq!(
            highlight("Praha-východ", "vychod"),
            format!("Praha-{}", marked("východ"))
        );
    }

    #[test]
    fn marks_each_word_independently() {
        assert_eq!(
            highlight("Praha-východ", "praha východ"),
            format!("{}-{}", marked("Praha"), marked("východ"))
        );
    }

    #[test]
    fn missing_word_leaves_field_unmarked() {
        assert_eq!(highlight("Praha-východ", "praha brno"), "Praha-východ");
    }

    #[test]
    fn overlapping_matches_merge_into_one_span() {
        let spans = highlight_spans("aaaa", "aa");
        assert_eq!(spans, vec![Span::new(0, 4)]);
        assert_eq!(highlight("aaaa", "aa"), marked("aaaa"));
    }

    #[test]
    fn adjacent_matches_never_abut() {
        let out = highlight("autosklo", "auto sklo");
        assert_eq!(out, marked("autosklo"));
        assert!(!out.contains(&format!("{MARK_CLOSE}{MARK_OPEN}")));
    }

    #[test]
    fn escaping_does_not_shift_spans() {
        assert_eq!(
            highlight("K&M Škoda", "skoda"),
            format!("K&amp;M {}", marked("Škoda"))
        );
        assert_eq!(
            highlight("<b>Brno</b>", "brno"),
            format!("&lt;b&gt;{}&lt;/b&gt;", marked("Brno"))
        );
    }

    #[test]
    fn spans_cover_multibyte_originals() {
        let text = "Středočeský kraj";
        let spans = highlight_spans(text, "stredo");
        assert_eq!(spans.len(), 1);
        assert_eq!(&text[spans[0].start..spans[0].end], "Středo");
    }

    #[test]
    fn combining_marks_stay_inside_span_boundaries() {
        // decomposed "é": the mark folds to nothing and is not a span end
        let text = "Café\u{0301}s";
        let spans = highlight_spans("Cafe\u{0301}s", "cafe");
        assert_eq!(spans, vec![Span::new(0, 4)]);
        assert!(highlight_spans(text, "cafes").len() == 1);
    }

    #[test]
    fn merge_spans_keeps_disjoint_spans_apart() {
        let merged = merge_spans(vec![
            Span::new(6, 8),
            Span::new(0, 2),
            Span::new(1, 3),
            Span::new(3, 4),
        ]);
        assert_eq!(merged, vec![Span::new(0, 4), Span::new(6, 8)]);
    }

    #[test]
    fn splice_uses_caller_wrappers() {
        let out = splice(
            "abc",
            &[Span::new(1, 2)],
            |s| s.to_uppercase(),
            |s| format!("[{s}]"),
        );
        assert_eq!(out, "A[b]C");
    }
}
