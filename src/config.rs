//! Runtime configuration
//!
//! Loaded from `~/.watchfinder/config.json` (every field optional), then
//! overridden by environment variables.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::types::{Result, WatchfinderError};

/// Placeholder shipped in sample env files; treated as "not configured"
const PLACEHOLDER_API_KEY: &str = "your_api_key_goes_here";

const ENV_API_KEY: &str = "TMDB_API_KEY";
const ENV_HOME_COUNTRY: &str = "WATCHFINDER_HOME_COUNTRY";
const ENV_LANGUAGE: &str = "WATCHFINDER_LANGUAGE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tmdb_api_key: Option<String>,
    /// Country treated as the primary audience when ranking
    pub home_country: String,
    /// Language for titles and overviews (e.g. "de-DE")
    pub language: String,
    /// Release region for discover queries
    pub region: String,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tmdb_api_key: None,
            home_country: "DE".into(),
            language: "de-DE".into(),
            region: "DE".into(),
            request_timeout_secs: 10,
        }
    }
}

impl Config {
    /// Load from the default path and apply environment overrides
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        let config = Self::from_path(&path)?;
        Ok(config.with_overrides(|key| std::env::var(key).ok()))
    }

    /// Default config path (~/.watchfinder/config.json)
    pub fn default_path() -> Result<PathBuf> {
        let home = directories::BaseDirs::new()
            .ok_or_else(|| WatchfinderError::Config("Cannot determine home directory".into()))?
            .home_dir()
            .to_path_buf();
        Ok(home.join(".watchfinder").join("config.json"))
    }

    /// Read a config file; a missing file yields defaults
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content).map_err(|e| {
            WatchfinderError::Config(format!("Invalid config {}: {}", path.display(), e))
        })?;
        Ok(config.normalized())
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// production)
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty(ENV_API_KEY) {
            self.tmdb_api_key = Some(key);
        }
        if let Some(country) = non_empty(ENV_HOME_COUNTRY) {
            self.home_country = country;
        }
        if let Some(language) = non_empty(ENV_LANGUAGE) {
            self.language = language;
        }
        self.normalized()
    }

    /// Override the home country (e.g. from `--home`)
    pub fn with_home_country(mut self, country: &str) -> Self {
        self.home_country = country.to_string();
        self.normalized()
    }

    fn normalized(mut self) -> Self {
        self.home_country = self.home_country.trim().to_ascii_uppercase();
        self.region = self.region.trim().to_ascii_uppercase();
        self
    }

    /// The TMDB API key, or a config error when unset or left at the placeholder
    pub fn api_key(&self) -> Result<&str> {
        match self.tmdb_api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() && key != PLACEHOLDER_API_KEY => Ok(key),
            _ => Err(WatchfinderError::Config(format!(
                "TMDB API key is not configured (set {})",
                ENV_API_KEY
            ))),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}
