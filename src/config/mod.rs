//! Configuration management for the catalog admin

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::cache::CacheOptions;
use crate::error::{ConfigError, Result};

/// Product table used when the config does not name one
pub const DEFAULT_TABLE: &str = "products";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the hosted store, e.g. `https://xyz.supabase.co`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Public API key sent with every request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_table")]
    pub table: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,

    /// Unset keeps cached results until a mutation invalidates them
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stale_time_secs: Option<u64>,
}

fn default_table() -> String {
    DEFAULT_TABLE.to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_search_debounce_ms() -> u64 {
    300
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            api_key: None,
            table: default_table(),
            request_timeout_secs: default_request_timeout_secs(),
            search_debounce_ms: default_search_debounce_ms(),
            stale_time_secs: None,
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".catalog").join("config.yaml"))
    }

    /// Config path from an optional override
    pub fn resolve_path(path: Option<&str>) -> Result<PathBuf> {
        match path {
            Some(path) => Ok(PathBuf::from(path)),
            None => Self::default_path(),
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound.into());
        }

        let contents = std::fs::read_to_string(&path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;

        Ok(config)
    }

    /// Load from `path`, or the default location when `None`
    pub fn load_at(path: Option<&str>) -> Result<Self> {
        Self::load_from(Self::resolve_path(path)?)
    }

    /// Like [`Config::load_at`], but a missing file yields the defaults.
    ///
    /// Parse errors are still reported.
    pub fn load_or_default(path: Option<&str>) -> Result<Self> {
        match Self::load_at(path) {
            Err(crate::error::Error::Config(ConfigError::NotFound)) => Ok(Self::default()),
            other => other,
        }
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents =
            serde_yaml::to_string(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;
        std::fs::write(&path, contents)?;

        // Holds the API key
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(&path, perms)?;
        }

        Ok(())
    }

    /// Save to `path`, or the default location when `None`
    pub fn save_at(&self, path: Option<&str>) -> Result<()> {
        self.save_to(Self::resolve_path(path)?)
    }

    /// Layer command-line and environment values over the file contents.
    pub fn apply_overrides(&mut self, api_url: Option<&str>, api_key: Option<&str>) {
        if let Some(url) = api_url {
            self.api_url = Some(url.to_string());
        }
        if let Some(key) = api_key {
            self.api_key = Some(key.to_string());
        }
    }

    /// The store URL, or an error telling the user how to set it
    pub fn require_api_url(&self) -> Result<&str> {
        match self.api_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Ok(url),
            _ => Err(ConfigError::MissingApiUrl.into()),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn cache_options(&self) -> CacheOptions {
        CacheOptions {
            stale_time: self.stale_time_secs.map(Duration::from_secs),
        }
    }
}
