//! Headless (non-interactive) mode.
//!
//! `sonar suggest` prints the dropdown a query would produce and
//! `sonar resolve` prints where committed text would navigate.
//!
//! User-facing output uses writeln! to stdout (this is a CLI binary, not debug output).

use std::io::Write;

use sonar_core::suggest::{SuggestionAggregator, SuggestionTransport};
use sonar_core::{NavigationTarget, Resolver};

/// Print one line per candidate: the kind tag, the display text, and the
/// navigation text when it differs.
pub async fn suggest<T: SuggestionTransport>(
    aggregator: &SuggestionAggregator<T>,
    query: &str,
    out: &mut impl Write,
) -> anyhow::Result<usize> {
    let candidates = aggregator.get_suggestions(query).await;
    for candidate in &candidates {
        if candidate.display_text == candidate.navigation_text {
            writeln!(out, "{:<7}{}", candidate.kind.tag(), candidate.display_text)?;
        } else {
            writeln!(
                out,
                "{:<7}{}  -> {}",
                candidate.kind.tag(),
                candidate.display_text,
                candidate.navigation_text
            )?;
        }
    }
    Ok(candidates.len())
}

/// Print the URL committed text would load, or nothing for blank input.
pub fn resolve(resolver: &Resolver, input: &str, out: &mut impl Write) -> anyhow::Result<()> {
    if input.trim().is_empty() {
        return Ok(());
    }
    let target = resolver.resolve(input);
    let kind = match &target {
        NavigationTarget::Internal(_) => "internal",
        NavigationTarget::Url(_) => "url",
        NavigationTarget::Search { .. } => "search",
    };
    writeln!(out, "{kind:<9}{}", target.url())?;
    Ok(())
}
