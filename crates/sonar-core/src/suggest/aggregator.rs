//! Merges local and remote candidates into the dropdown page.
//!
//! Precedence is fixed and tested: the partial domain match, then phrases,
//! then sites, then remote suggestions in service order. Duplicates (by
//! lower-cased navigation text) keep their first occurrence, so curated
//! entries always win over remote ones.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::local::LocalIndex;
use super::reference::{ReferenceData, SiteEntry};
use super::remote::{HttpTransport, RemoteSuggestionClient, SuggestionTransport};
use super::{Candidate, char_len};
use crate::config::SuggestionConfig;
use crate::error::Result;

/// Default number of candidates on one page.
pub const DEFAULT_PAGE_SIZE: usize = 8;
/// Default shortest query that opens the dropdown.
pub const DEFAULT_MIN_QUERY_CHARS: usize = 2;

#[allow(clippy::expect_used)]
static DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:www\.)?(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z]{2,}$")
        .expect("static regex is valid")
});

/// Whether a remote suggestion names a site rather than a search phrase:
/// it is domain-shaped or contains a dot.
pub fn looks_like_domain(text: &str) -> bool {
    DOMAIN_RE.is_match(text) || text.contains('.')
}

/// Produces the final candidate list for one query.
#[derive(Debug)]
pub struct SuggestionAggregator<T = HttpTransport> {
    local: LocalIndex,
    remote: Option<RemoteSuggestionClient<T>>,
    page_size: usize,
    min_query_chars: usize,
}

impl SuggestionAggregator<HttpTransport> {
    /// Build the production aggregator. The remote client is omitted when
    /// `config.remote_enabled` is false.
    pub fn from_config(config: &SuggestionConfig, data: ReferenceData) -> Result<Self> {
        let remote = if config.remote_enabled {
            Some(RemoteSuggestionClient::new(
                HttpTransport::new(&config.endpoint)?,
                config.cache_capacity,
                config.remote_timeout(),
            ))
        } else {
            None
        };
        Ok(Self::new(LocalIndex::new(data), remote)
            .with_page_size(config.page_size)
            .with_min_query_chars(config.min_query_chars))
    }
}

impl<T: SuggestionTransport> SuggestionAggregator<T> {
    pub const fn new(local: LocalIndex, remote: Option<RemoteSuggestionClient<T>>) -> Self {
        Self {
            local,
            remote,
            page_size: DEFAULT_PAGE_SIZE,
            min_query_chars: DEFAULT_MIN_QUERY_CHARS,
        }
    }

    #[must_use]
    pub const fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    #[must_use]
    pub const fn with_min_query_chars(mut self, min_query_chars: usize) -> Self {
        self.min_query_chars = min_query_chars;
        self
    }

    pub const fn local(&self) -> &LocalIndex {
        &self.local
    }

    pub const fn remote(&self) -> Option<&RemoteSuggestionClient<T>> {
        self.remote.as_ref()
    }

    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    pub const fn min_query_chars(&self) -> usize {
        self.min_query_chars
    }

    /// Ranked, deduplicated candidates for `query`, at most one page long.
    ///
    /// Queries below the minimum length return nothing without touching the
    /// network. Remote failures only drop the remote part.
    pub async fn get_suggestions(&self, query: &str) -> Vec<Candidate> {
        if char_len(query) < self.min_query_chars {
            return Vec::new();
        }

        let local = self.local.ranked(query);
        let remote = match &self.remote {
            Some(client) => client
                .fetch(query)
                .await
                .iter()
                .map(|s| self.classify_remote(s))
                .collect(),
            None => Vec::new(),
        };

        let merged = merge(local, remote, self.page_size);
        debug!(query, count = merged.len(), "Resolved suggestions");
        merged
    }

    /// Turn one remote string into a candidate, reusing a known site's title
    /// when the string names that site.
    pub fn classify_remote(&self, suggestion: &str) -> Candidate {
        if !looks_like_domain(suggestion) {
            return Candidate::search(suggestion);
        }
        match known_site(&self.local.data().sites, suggestion) {
            Some(site) => Candidate::site(suggestion, &site.title),
            None => Candidate::bare_site(suggestion),
        }
    }
}

/// Concatenate `local` then `remote`, keep the first candidate per
/// case-insensitive navigation text, and cut to `page_size`.
pub fn merge(local: Vec<Candidate>, remote: Vec<Candidate>, page_size: usize) -> Vec<Candidate> {
    let mut seen = HashSet::new();
    local
        .into_iter()
        .chain(remote)
        .filter(|c| seen.insert(c.dedup_key()))
        .take(page_size)
        .collect()
}

/// A known site that `domain` refers to: the same domain (ignoring case and
/// `www.`), a subdomain of it, or a prefix of it ending at a label boundary.
fn known_site<'a>(sites: &'a [SiteEntry], domain: &str) -> Option<&'a SiteEntry> {
    let domain = domain.to_lowercase();
    let domain = domain.strip_prefix("www.").unwrap_or(&domain);
    sites.iter().find(|site| {
        let known = site.domain.to_lowercase();
        domain == known
            || domain.ends_with(&format!(".{known}"))
            || known.starts_with(&format!("{domain}."))
    })
}
