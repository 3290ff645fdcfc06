//! Application configuration management.
//!
//! Configuration is stored at `~/.config/courtside-admin/config.json`, with
//! environment overrides (`COURTSIDE_API_URL`, `COURTSIDE_TIMEOUT_SECS`)
//! loaded through dotenv for local development.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::cache::CacheConfig;

/// Application name used for config directory paths
const APP_NAME: &str = "courtside-admin";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Default API base URL
const DEFAULT_API_URL: &str = "https://api.courtside.app";

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_stale_minutes() -> i64 {
    60
}

fn default_gc_idle_minutes() -> i64 {
    5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Minutes before a cached query entry is considered stale.
    #[serde(default = "default_stale_minutes")]
    pub cache_stale_minutes: i64,
    /// Minutes a subscriber-less entry may idle before garbage collection.
    #[serde(default = "default_gc_idle_minutes")]
    pub cache_gc_idle_minutes: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            request_timeout_secs: default_timeout_secs(),
            cache_stale_minutes: default_stale_minutes(),
            cache_gc_idle_minutes: default_gc_idle_minutes(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        // Pick up a local .env before reading overrides
        dotenvy::dotenv().ok();

        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            Self::default()
        };

        if let Ok(url) = std::env::var("COURTSIDE_API_URL") {
            if !url.is_empty() {
                config.api_url = url;
            }
        }
        if let Ok(timeout) = std::env::var("COURTSIDE_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse() {
                config.request_timeout_secs = secs;
            }
        }

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Cache tuning derived from this configuration.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            stale_after: chrono::Duration::minutes(self.cache_stale_minutes),
            gc_idle: chrono::Duration::minutes(self.cache_gc_idle_minutes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config: Config = serde_json::from_str("{}").expect("empty object");
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.cache_stale_minutes, 60);
    }

    #[test]
    fn test_cache_config_conversion() {
        let config = Config {
            cache_stale_minutes: 10,
            cache_gc_idle_minutes: 2,
            ..Config::default()
        };
        let cache = config.cache_config();
        assert_eq!(cache.stale_after, chrono::Duration::minutes(10));
        assert_eq!(cache.gc_idle, chrono::Duration::minutes(2));
    }
}
