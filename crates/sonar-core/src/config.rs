//! Configuration resolution for Sonar.
//!
//! Implements hierarchical config resolution:
//! 1. Built-in defaults
//! 2. Global config (~/.config/sonar/settings.json)
//! 3. Environment variables
//! 4. CLI arguments (highest priority, applied by the binary)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// Complete Sonar configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub suggestions: SuggestionConfig,
    #[serde(default)]
    pub navigation: NavigationConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            suggestions: SuggestionConfig::default(),
            navigation: NavigationConfig::default(),
            data: DataConfig::default(),
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Address-bar suggestion tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionConfig {
    /// Firefox-style completion endpoint (`?client=firefox&q=` is appended).
    pub endpoint: String,
    /// Budget for one remote request before it resolves to "no suggestions".
    pub remote_timeout_ms: u64,
    /// Maximum number of distinct queries kept in the remote response cache.
    pub cache_capacity: usize,
    /// Maximum number of candidates shown in the dropdown.
    pub page_size: usize,
    /// Quiet window after the last keystroke before a query is issued.
    pub debounce_ms: u64,
    /// Delay between losing focus and hiding the dropdown.
    pub blur_delay_ms: u64,
    /// Longest voice dictation session before it is switched off.
    pub voice_cap_ms: u64,
    /// Shortest input (in characters) that produces suggestions.
    pub min_query_chars: usize,
    /// When false, only the local phrase and site lists are consulted.
    pub remote_enabled: bool,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://suggestqueries.google.com/complete/search".to_string(),
            remote_timeout_ms: 3_000,
            cache_capacity: 100,
            page_size: 8,
            debounce_ms: 150,
            blur_delay_ms: 200,
            voice_cap_ms: 30_000,
            min_query_chars: 2,
            remote_enabled: true,
        }
    }
}

impl SuggestionConfig {
    pub const fn remote_timeout(&self) -> Duration {
        Duration::from_millis(self.remote_timeout_ms)
    }

    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub const fn blur_delay(&self) -> Duration {
        Duration::from_millis(self.blur_delay_ms)
    }

    pub const fn voice_cap(&self) -> Duration {
        Duration::from_millis(self.voice_cap_ms)
    }
}

/// How committed address-bar text turns into a page load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Search results page; the committed text is sent as the `q` parameter.
    pub search_url: String,
    /// Page opened in new tabs.
    pub home_url: String,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            search_url: "https://www.google.com/search".to_string(),
            home_url: "sonar://new-tab".to_string(),
        }
    }
}

/// Locations of the static reference lists. `None` selects the bundled list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub sites_path: Option<PathBuf>,
    pub phrases_path: Option<PathBuf>,
}

/// Load configuration with hierarchical resolution.
pub fn load_config() -> Result<Config> {
    let mut config = match global_config_path() {
        Some(path) if path.exists() => load_config_file(&path)?,
        _ => Config::default(),
    };

    apply_env_overrides(&mut config);

    Ok(config)
}

/// Get the global config file path.
pub fn global_config_path() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .ok()
            .map(|h| PathBuf::from(h).join(".sonar").join("settings.json"))
    }
    #[cfg(target_os = "macos")]
    {
        std::env::var("HOME")
            .ok()
            .map(|h| PathBuf::from(h).join("Library/Application Support/sonar/settings.json"))
    }
    #[cfg(target_os = "linux")]
    {
        dirs::config_dir().map(|p| p.join("sonar").join("settings.json"))
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
    {
        None
    }
}

/// Read and parse a settings file. Missing sections fall back to defaults.
pub fn load_config_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        Error::Config(format!("Failed to parse config file {}: {}", path.display(), e))
    })
}

fn apply_env_overrides(config: &mut Config) {
    if let Ok(val) = std::env::var("SONAR_SUGGEST_URL") {
        config.suggestions.endpoint = val;
    }
    if let Ok(val) = std::env::var("SONAR_SEARCH_URL") {
        config.navigation.search_url = val;
    }
    if let Ok(val) = std::env::var("SONAR_DEBOUNCE_MS") {
        if let Ok(n) = val.parse() {
            config.suggestions.debounce_ms = n;
        }
    }
    if let Ok(val) = std::env::var("SONAR_REMOTE_TIMEOUT_MS") {
        if let Ok(n) = val.parse() {
            config.suggestions.remote_timeout_ms = n;
        }
    }
    if let Ok(val) = std::env::var("SONAR_LOG_LEVEL") {
        config.log_level = val;
    }
    if let Ok(val) = std::env::var("SONAR_SITES_PATH") {
        config.data.sites_path = Some(PathBuf::from(val));
    }
    if let Ok(val) = std::env::var("SONAR_PHRASES_PATH") {
        config.data.phrases_path = Some(PathBuf::from(val));
    }
}
