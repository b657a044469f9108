//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the schedule store URL, request timeout and list title.
//!
//! Configuration is stored at `~/.config/troopbook/config.json`. The
//! `TROOPBOOK_API_URL` and `TROOPBOOK_TIMEOUT_SECS` environment variables
//! override the file.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::client::REQUEST_TIMEOUT_SECS;

/// Application name used for the config directory path
const APP_NAME: &str = "troopbook";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Store served by the web app during local development
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";

const DEFAULT_TITLE: &str = "Troop Schedule";

pub const ENV_API_URL: &str = "TROOPBOOK_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "TROOPBOOK_TIMEOUT_SECS";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    pub api_base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub schedule_title: Option<String>,
}

impl Config {
    /// Load the config file (defaults if absent) and apply environment
    /// overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let config = Self::load_from(&path)?;
        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Apply overrides looked up through `lookup` (the process environment
    /// in `load`).
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(ENV_API_URL).filter(|url| !url.trim().is_empty()) {
            self.api_base_url = Some(url);
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => self.request_timeout_secs = Some(secs),
                _ => warn!(value = %raw, "Ignoring invalid {}", ENV_TIMEOUT_SECS),
            }
        }
        self
    }

    pub fn api_base_url(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(REQUEST_TIMEOUT_SECS))
    }

    pub fn schedule_title(&self) -> &str {
        self.schedule_title.as_deref().unwrap_or(DEFAULT_TITLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_base_url(), DEFAULT_API_BASE_URL);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.schedule_title(), "Troop Schedule");
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::default().with_env_overrides(env(&[
            (ENV_API_URL, "https://troop.example.org/api"),
            (ENV_TIMEOUT_SECS, "5"),
        ]));
        assert_eq!(config.api_base_url(), "https://troop.example.org/api");
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_timeout_override_is_ignored() {
        let config = Config {
            request_timeout_secs: Some(12),
            ..Config::default()
        }
        .with_env_overrides(env(&[(ENV_TIMEOUT_SECS, "soon"), (ENV_API_URL, "  ")]));
        assert_eq!(config.request_timeout(), Duration::from_secs(12));
        assert_eq!(config.api_base_url(), DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_load_from_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("troopbook-missing-config-test.json");
        let _ = std::fs::remove_file(&path);
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("troopbook-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"api_base_url": "http://store.local", "schedule_title": "Troop 53"}"#).unwrap();
        let config = Config::load_from(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(config.api_base_url(), "http://store.local");
        assert_eq!(config.schedule_title(), "Troop 53");
        assert_eq!(config.request_timeout_secs, None);
    }
}
