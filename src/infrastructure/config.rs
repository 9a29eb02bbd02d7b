// src/infrastructure/config.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::constants::{CONFIG_DIR_NAME, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
use crate::domain::DomainError;

/// TOML configuration for the notes client
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String { DEFAULT_API_URL.to_string() }
fn default_timeout_secs() -> u64 { DEFAULT_TIMEOUT_SECS }

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file {}", path.as_ref().display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.as_ref().display()))
    }

    /// Writes the config as TOML, creating missing parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let text = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, text)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        debug!(path = %path.display(), "Wrote config");
        Ok(())
    }

    /// Writes the defaults to `path` and returns them.
    pub fn create_default(path: impl AsRef<Path>) -> Result<Self> {
        let config = Self::default();
        config.save(path)?;
        Ok(config)
    }

    /// `<config dir>/notedesk/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join("config.toml"))
    }

    /// An explicit path must exist. Without one, the default location is used
    /// when present and built-in defaults otherwise. `api_url` wins over the file.
    pub fn resolve(path: Option<&Path>, api_url: Option<&str>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(found) => {
                    debug!(?found, "Using config from default location");
                    Self::load(found)?
                }
                None => Self::default(),
            },
        };

        if let Some(url) = api_url {
            config.api.base_url = url.to_string();
        }
        config.api.base_url = config.api.base_url.trim_end_matches('/').to_string();
        if !(config.api.base_url.starts_with("http://") || config.api.base_url.starts_with("https://")) {
            return Err(DomainError::Config(format!(
                "API URL must start with http:// or https://, got '{}'",
                config.api.base_url
            ))
            .into());
        }
        debug!(?config, "Resolved config");
        Ok(config)
    }
}
