//! Static reference data: curated search phrases and popular sites.
//!
//! Both lists are loaded once at startup and shared read-only. Any load
//! failure leaves *both* lists empty; suggestions then come from the remote
//! service alone and the address bar keeps working.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Error, Result};

const BUNDLED_SITES: &str = include_str!("../../data/popular-sites.json");
const BUNDLED_PHRASES: &str = include_str!("../../data/phrases.json");

/// A popular site offered as a navigation shortcut.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteEntry {
    pub domain: String,
    pub title: String,
}

impl SiteEntry {
    pub fn new(domain: &str, title: &str) -> Self {
        Self {
            domain: domain.to_string(),
            title: title.to_string(),
        }
    }

    /// The part of the domain before the first dot (`"github"` for `github.com`).
    pub fn label(&self) -> &str {
        self.domain.split('.').next().unwrap_or(&self.domain)
    }
}

/// The two ordered reference collections.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub phrases: Arc<[String]>,
    pub sites: Arc<[SiteEntry]>,
}

impl ReferenceData {
    pub fn new(phrases: Vec<String>, sites: Vec<SiteEntry>) -> Self {
        Self {
            phrases: phrases.into(),
            sites: sites.into(),
        }
    }

    /// Both collections empty.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The lists shipped with Sonar.
    pub fn bundled() -> Self {
        Self::parse(BUNDLED_PHRASES, BUNDLED_SITES).unwrap_or_else(|e| {
            warn!(error = %e, "Bundled reference data is invalid, suggestions will be remote-only");
            Self::empty()
        })
    }

    /// Load the lists from disk, falling back to the bundled copy for any list
    /// without a path. Never fails: errors are logged and yield empty data.
    pub fn load(phrases_path: Option<&Path>, sites_path: Option<&Path>) -> Self {
        match Self::try_load(phrases_path, sites_path) {
            Ok(data) => {
                info!(
                    phrases = data.phrases.len(),
                    sites = data.sites.len(),
                    "Loaded reference data"
                );
                data
            }
            Err(e) => {
                warn!(error = %e, "Failed to load reference data, local suggestions disabled");
                Self::empty()
            }
        }
    }

    fn try_load(phrases_path: Option<&Path>, sites_path: Option<&Path>) -> Result<Self> {
        let phrases = match phrases_path {
            Some(path) => read_list(path)?,
            None => BUNDLED_PHRASES.to_string(),
        };
        let sites = match sites_path {
            Some(path) => read_list(path)?,
            None => BUNDLED_SITES.to_string(),
        };
        Self::parse(&phrases, &sites)
    }

    /// Parse a JSON array of phrases and a JSON array of `{domain, title}`.
    pub fn parse(phrases_json: &str, sites_json: &str) -> Result<Self> {
        let phrases: Vec<String> = serde_json::from_str(phrases_json)
            .map_err(|e| Error::ReferenceData(format!("phrase list: {e}")))?;
        let sites: Vec<SiteEntry> = serde_json::from_str(sites_json)
            .map_err(|e| Error::ReferenceData(format!("site list: {e}")))?;
        Ok(Self::new(phrases, sites))
    }

    /// Find a known site by domain, ignoring case and a leading `www.`.
    pub fn find_site(&self, domain: &str) -> Option<&SiteEntry> {
        let domain = domain.to_lowercase();
        let domain = domain.strip_prefix("www.").unwrap_or(&domain);
        self.sites.iter().find(|s| s.domain.eq_ignore_ascii_case(domain))
    }
}

fn read_list(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| Error::ReferenceData(format!("Failed to read {}: {}", path.display(), e)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn bundled_lists_are_non_empty() {
        let data = ReferenceData::bundled();
        assert!(data.phrases.len() > 100);
        assert!(data.sites.iter().any(|s| s.domain == "github.com"));
    }

    #[test]
    fn load_reads_files_from_disk() {
        let dir = TempDir::new().unwrap();
        let phrases = dir.path().join("phrases.json");
        let sites = dir.path().join("sites.json");
        std::fs::write(&phrases, r#"["rust book", "rust news"]"#).unwrap();
        std::fs::write(&sites, r#"[{"domain": "rust-lang.org", "title": "Rust"}]"#).unwrap();

        let data = ReferenceData::load(Some(&phrases), Some(&sites));
        assert_eq!(data.phrases.len(), 2);
        assert_eq!(data.sites[0].title, "Rust");
    }

    #[test]
    fn missing_file_empties_both_lists() {
        let dir = TempDir::new().unwrap();
        let sites = dir.path().join("sites.json");
        std::fs::write(&sites, r#"[{"domain": "rust-lang.org", "title": "Rust"}]"#).unwrap();

        let data = ReferenceData::load(Some(&dir.path().join("missing.json")), Some(&sites));
        assert!(data.phrases.is_empty());
        assert!(data.sites.is_empty());
    }

    #[test]
    fn malformed_site_list_empties_both_lists() {
        let dir = TempDir::new().unwrap();
        let sites = dir.path().join("sites.json");
        std::fs::write(&sites, r#"["just-a-string.com"]"#).unwrap();

        let data = ReferenceData::load(None, Some(&sites));
        assert!(data.phrases.is_empty());
        assert!(data.sites.is_empty());
    }

    #[test]
    fn find_site_ignores_case_and_www() {
        let data = ReferenceData::new(vec![], vec![SiteEntry::new("github.com", "GitHub")]);
        assert_eq!(data.find_site("WWW.GitHub.com").unwrap().title, "GitHub");
        assert!(data.find_site("gitlab.com").is_none());
    }

    #[test]
    fn label_is_text_before_first_dot() {
        assert_eq!(SiteEntry::new("impots.gouv.fr", "Impots").label(), "impots");
        assert_eq!(SiteEntry::new("localhost", "Local").label(), "localhost");
    }
}
