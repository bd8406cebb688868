//! Address-bar suggestion engine.
//!
//! Merges three candidate sources into one ranked, deduplicated page:
//! - [`LocalIndex`]: curated phrases and popular sites, matched synchronously
//! - [`RemoteSuggestionClient`]: a Firefox-style completion service with a
//!   FIFO response cache and per-query request coalescing
//! - [`SuggestionAggregator`]: the merge itself (local before remote, phrases
//!   before sites, first occurrence wins, capped at the page size)

pub mod aggregator;
pub mod cache;
pub mod local;
pub mod reference;
pub mod remote;
pub mod scorer;

pub use aggregator::SuggestionAggregator;
pub use cache::FifoCache;
pub use local::LocalIndex;
pub use reference::{ReferenceData, SiteEntry};
pub use remote::{HttpTransport, RemoteSuggestionClient, SuggestionTransport};
pub use scorer::{highlight_ranges, score};

/// Where a candidate came from, which decides how it is rendered and whether
/// committing it loads a site or runs a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandidateKind {
    Search,
    Site,
}

impl CandidateKind {
    /// Short tag used by text renderers.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::Site => "site",
        }
    }
}

/// One ranked, displayable, navigable suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub kind: CandidateKind,
    /// Submitted to the navigator on commit.
    pub navigation_text: String,
    /// Rendered in the dropdown.
    pub display_text: String,
}

impl Candidate {
    /// A search phrase; display and navigation text are identical.
    pub fn search(phrase: &str) -> Self {
        Self {
            kind: CandidateKind::Search,
            navigation_text: phrase.to_string(),
            display_text: phrase.to_string(),
        }
    }

    /// A site with a known title, rendered as `"title — domain"`.
    pub fn site(domain: &str, title: &str) -> Self {
        Self {
            kind: CandidateKind::Site,
            navigation_text: domain.to_string(),
            display_text: format!("{title} \u{2014} {domain}"),
        }
    }

    /// A site without a known title; display and navigation text are identical.
    pub fn bare_site(domain: &str) -> Self {
        Self {
            kind: CandidateKind::Site,
            navigation_text: domain.to_string(),
            display_text: domain.to_string(),
        }
    }

    /// Key used for cross-source deduplication.
    pub fn dedup_key(&self) -> String {
        self.navigation_text.to_lowercase()
    }
}

/// Number of characters in `query`, the unit every length threshold uses.
pub(crate) fn char_len(query: &str) -> usize {
    query.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn site_candidate_display_joins_title_and_domain() {
        let c = Candidate::site("github.com", "GitHub");
        assert_eq!(c.kind, CandidateKind::Site);
        assert_eq!(c.navigation_text, "github.com");
        assert_eq!(c.display_text, "GitHub \u{2014} github.com");
    }

    #[test]
    fn search_candidate_uses_phrase_for_both_texts() {
        let c = Candidate::search("latest news");
        assert_eq!(c.kind, CandidateKind::Search);
        assert_eq!(c.navigation_text, c.display_text);
    }

    #[test]
    fn dedup_key_ignores_case() {
        assert_eq!(
            Candidate::bare_site("GitHub.com").dedup_key(),
            Candidate::site("github.com", "GitHub").dedup_key()
        );
    }

    #[test]
    fn char_len_counts_characters_not_bytes() {
        assert_eq!(char_len("mé"), 2);
        assert_eq!(char_len(""), 0);
    }
}
