//! Turning committed address-bar text into a page load, and back.

use reqwest::Url;

use crate::config::NavigationConfig;
use crate::error::{Error, Result};

/// Scheme of the browser's own pages.
pub const INTERNAL_SCHEME: &str = "sonar://";

/// What a committed string loads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationTarget {
    /// A `sonar://` page, passed through unchanged.
    Internal(String),
    /// A web address, with a scheme.
    Url(String),
    /// A search for the committed text.
    Search { query: String, url: String },
}

impl NavigationTarget {
    /// The address to load.
    pub fn url(&self) -> &str {
        match self {
            Self::Internal(url) | Self::Url(url) | Self::Search { url, .. } => url,
        }
    }
}

/// Resolves committed text against the configured search page.
#[derive(Debug, Clone)]
pub struct Resolver {
    search_url: Url,
    home_url: String,
}

impl Resolver {
    pub fn new(config: &NavigationConfig) -> Result<Self> {
        let search_url = Url::parse(&config.search_url).map_err(|e| {
            Error::Config(format!("Invalid search URL {}: {e}", config.search_url))
        })?;
        Ok(Self {
            search_url,
            home_url: config.home_url.clone(),
        })
    }

    pub fn home_url(&self) -> &str {
        &self.home_url
    }

    /// Decide what `input` loads.
    ///
    /// `sonar://` text is internal. Text with a dot and no space is an
    /// address, with `https://` added when no http(s) scheme is present.
    /// Anything else is searched for.
    pub fn resolve(&self, input: &str) -> NavigationTarget {
        let input = input.trim();
        if input.starts_with(INTERNAL_SCHEME) {
            return NavigationTarget::Internal(input.to_string());
        }
        if input.contains('.') && !input.contains(' ') {
            if input.starts_with("http://") || input.starts_with("https://") {
                return NavigationTarget::Url(input.to_string());
            }
            return NavigationTarget::Url(format!("https://{input}"));
        }

        let mut url = self.search_url.clone();
        url.query_pairs_mut().append_pair("q", input);
        NavigationTarget::Search {
            query: input.to_string(),
            url: url.into(),
        }
    }

    /// Whether `url` is the new-tab page.
    pub fn is_home(&self, url: &str) -> bool {
        url == self.home_url
    }
}

/// Address-bar text for a page that is not being edited: `"domain / title"`.
///
/// The domain drops a leading `www.`. Internal pages other than the new tab
/// show their address; the new-tab page shows nothing. Without a title only
/// the domain is shown.
pub fn url_bar_display(url: &str, title: &str) -> String {
    if url.is_empty() || url.starts_with("sonar://new-tab") {
        return String::new();
    }
    if url.starts_with(INTERNAL_SCHEME) {
        return url.to_string();
    }
    let Some(host) = Url::parse(url).ok().and_then(|u| u.host_str().map(str::to_string)) else {
        return url.to_string();
    };
    let domain = host.strip_prefix("www.").unwrap_or(&host);
    let title = title.trim();
    if title.is_empty() {
        domain.to_string()
    } else {
        format!("{domain} / {title}")
    }
}
