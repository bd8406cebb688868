//! Tiered match scoring.
//!
//! A candidate string is ranked against the typed query by the first tier it
//! satisfies. The tiers form a total order, so callers can sort on the score
//! alone without a secondary key.

use std::ops::Range;

/// Exact (case-insensitive) equality.
pub const SCORE_EXACT: u32 = 1000;
/// The query is the whole leading word.
pub const SCORE_LEADING_WORD: u32 = 900;
/// The text starts with the query.
pub const SCORE_PREFIX: u32 = 800;
/// Some whitespace-delimited word starts with the query.
pub const SCORE_WORD_PREFIX: u32 = 700;
/// The query starts right after a space.
pub const SCORE_AFTER_SPACE: u32 = 600;
/// The query appears anywhere.
pub const SCORE_SUBSTRING: u32 = 500;

/// Score how well `text` matches `query`. Higher is better; 0 means no match.
///
/// An empty query matches nothing.
pub fn score(text: &str, query: &str) -> u32 {
    if query.is_empty() {
        return 0;
    }

    let text = text.to_lowercase();
    let query = query.to_lowercase();

    if text == query {
        SCORE_EXACT
    } else if text.starts_with(&format!("{query} ")) {
        SCORE_LEADING_WORD
    } else if text.starts_with(&query) {
        SCORE_PREFIX
    } else if text.split_whitespace().any(|word| word.starts_with(&query)) {
        SCORE_WORD_PREFIX
    } else if text.contains(&format!(" {query}")) {
        SCORE_AFTER_SPACE
    } else if text.contains(&query) {
        SCORE_SUBSTRING
    } else {
        0
    }
}

/// Byte ranges of `display` that match `query` case-insensitively, for the
/// renderer to highlight.
///
/// Ranges never overlap and are returned in order. Characters whose lowercase
/// form changes byte length are compared one by one, so the ranges always fall
/// on `display`'s own char boundaries.
pub fn highlight_ranges(display: &str, query: &str) -> Vec<Range<usize>> {
    let needle: Vec<char> = query.chars().flat_map(char::to_lowercase).collect();
    if needle.is_empty() {
        return Vec::new();
    }

    let chars: Vec<(usize, char)> = display.char_indices().collect();
    let mut ranges = Vec::new();
    let mut i = 0;
    while i + needle.len() <= chars.len() {
        let matched = chars[i..i + needle.len()]
            .iter()
            .zip(&needle)
            .all(|((_, c), n)| c.to_lowercase().eq(std::iter::once(*n)));
        if matched {
            let start = chars[i].0;
            let end = chars
                .get(i + needle.len())
                .map_or(display.len(), |(idx, _)| *idx);
            ranges.push(start..end);
            i += needle.len();
        } else {
            i += 1;
        }
    }
    ranges
}
