//! Ghost text for inline completion preview.
//!
//! While the dropdown is open and nothing is selected, the part of the top
//! candidate that the user has not typed yet is shown dimmed after the cursor.

use ratatui::style::{Color, Style};
use ratatui::text::Span;

/// Extract the untyped suffix of a completion.
///
/// If `completion` starts with `typed` (case-insensitive), returns the
/// remaining suffix. Returns `None` for an exact match, an empty `typed`, or
/// a completion that does not start with `typed`.
pub fn ghost_suffix<'a>(typed: &str, completion: &'a str) -> Option<&'a str> {
    if typed.is_empty() {
        return None;
    }

    let mut rest = completion;
    for t in typed.chars() {
        let mut chars = rest.chars();
        let c = chars.next()?;
        if !c.to_lowercase().eq(t.to_lowercase()) {
            return None;
        }
        rest = chars.as_str();
    }
    (!rest.is_empty()).then_some(rest)
}

/// Build styled spans for the address bar with an optional ghost suffix.
///
/// Returns:
/// - If no completion or no suffix: a single span with the typed text
/// - Otherwise: the typed text span followed by the suffix span (`DarkGray`)
pub fn ghost_text_spans<'a>(typed: &'a str, completion: Option<&str>) -> Vec<Span<'a>> {
    let suffix = completion.and_then(|c| ghost_suffix(typed, c));

    match suffix {
        Some(s) => vec![
            Span::raw(typed),
            Span::styled(s.to_string(), Style::default().fg(Color::DarkGray)),
        ],
        None => vec![Span::raw(typed)],
    }
}
