//! Local candidate index over the static phrase and site lists.

use super::reference::{ReferenceData, SiteEntry};
use super::scorer::score;
use super::{Candidate, char_len};

/// Shortest query that produces local matches.
pub const MIN_LOCAL_QUERY_CHARS: usize = 2;
/// Shortest query that may inject a partial domain match.
pub const MIN_DOMAIN_QUERY_CHARS: usize = 3;
/// Top-level domains tried when the query is a bare site name.
const DOMAIN_SUFFIXES: [&str; 4] = [".com", ".fr", ".org", ".net"];

/// Produces ranked local matches without any I/O.
#[derive(Debug, Clone, Default)]
pub struct LocalIndex {
    data: ReferenceData,
}

impl LocalIndex {
    pub const fn new(data: ReferenceData) -> Self {
        Self { data }
    }

    pub const fn data(&self) -> &ReferenceData {
        &self.data
    }

    /// Phrase matches followed by site matches, each category sorted by
    /// descending score with ties kept in list order.
    ///
    /// Phrases always precede sites, even when a site scores higher.
    pub fn local_matches(&self, query: &str) -> Vec<Candidate> {
        if char_len(query) < MIN_LOCAL_QUERY_CHARS {
            return Vec::new();
        }

        let mut phrases: Vec<(u32, &String)> = self
            .data
            .phrases
            .iter()
            .map(|p| (score(p, query), p))
            .filter(|(s, _)| *s > 0)
            .collect();
        phrases.sort_by(|a, b| b.0.cmp(&a.0));

        let mut sites: Vec<(u32, &SiteEntry)> = self
            .data
            .sites
            .iter()
            .map(|site| (score(&site.domain, query).max(score(&site.title, query)), site))
            .filter(|(s, _)| *s > 0)
            .collect();
        sites.sort_by(|a, b| b.0.cmp(&a.0));

        phrases
            .into_iter()
            .map(|(_, p)| Candidate::search(p))
            .chain(
                sites
                    .into_iter()
                    .map(|(_, site)| Candidate::site(&site.domain, &site.title)),
            )
            .collect()
    }

    /// A site the query names directly, even when substring scoring would
    /// rank it low.
    ///
    /// Tried in order: a site whose first label equals the query, a site whose
    /// domain is the query plus a common TLD, then a site whose first label
    /// starts with the query.
    pub fn partial_domain_match(&self, query: &str) -> Option<Candidate> {
        if char_len(query) < MIN_DOMAIN_QUERY_CHARS {
            return None;
        }
        let q = query.to_lowercase();
        let sites = &self.data.sites;

        sites
            .iter()
            .find(|s| s.label().eq_ignore_ascii_case(&q))
            .or_else(|| {
                DOMAIN_SUFFIXES.iter().find_map(|tld| {
                    let domain = format!("{q}{tld}");
                    sites.iter().find(|s| s.domain.eq_ignore_ascii_case(&domain))
                })
            })
            .or_else(|| sites.iter().find(|s| s.label().to_lowercase().starts_with(&q)))
            .map(|site| Candidate::site(&site.domain, &site.title))
    }

    /// Local matches, with the partial domain match prepended when scoring
    /// did not already produce it.
    ///
    /// A hint that is already listed keeps its scored position.
    pub fn ranked(&self, query: &str) -> Vec<Candidate> {
        let mut matches = self.local_matches(query);
        if let Some(hint) = self.partial_domain_match(query) {
            let key = hint.dedup_key();
            if !matches.iter().any(|c| c.dedup_key() == key) {
                matches.insert(0, hint);
            }
        }
        matches
    }
}
