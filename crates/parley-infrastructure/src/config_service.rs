//! Configuration service implementation.
//!
//! Loads [`ClientConfig`] from `~/.config/parley/config.toml`, then applies
//! environment overrides. A missing file is not an error.

use crate::paths::ParleyPaths;
use parley_core::config::ClientConfig;
use parley_core::error::{ParleyError, Result};
use std::path::PathBuf;

/// Overrides `api_url`.
pub const API_URL_ENV: &str = "PARLEY_API_URL";
/// Overrides `log_level`.
pub const LOG_LEVEL_ENV: &str = "PARLEY_LOG";

#[derive(Debug, Clone)]
pub struct ConfigService {
    path: Option<PathBuf>,
}

impl ConfigService {
    /// Uses the default config file location.
    pub fn new() -> Self {
        Self {
            path: ParleyPaths::config_file().ok(),
        }
    }

    /// Uses an explicit config file.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Loads the file, applies process environment overrides and validates.
    pub fn load(&self) -> Result<ClientConfig> {
        self.load_with(|key| std::env::var(key).ok())
    }

    /// Like [`load`](Self::load) with a custom environment lookup.
    pub fn load_with(&self, env: impl Fn(&str) -> Option<String>) -> Result<ClientConfig> {
        let mut config = self.load_file()?;
        apply_overrides(&mut config, env);
        validate(&mut config)?;
        Ok(config)
    }

    fn load_file(&self) -> Result<ClientConfig> {
        let Some(path) = &self.path else {
            return Ok(ClientConfig::default());
        };
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(ClientConfig::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            ParleyError::config(format!(
                "Failed to read configuration file at {}: {}",
                path.display(),
                e
            ))
        })?;

        toml::from_str(&content).map_err(|e| {
            ParleyError::config(format!(
                "Failed to parse configuration file at {}: {}",
                path.display(),
                e
            ))
        })
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_overrides(config: &mut ClientConfig, env: impl Fn(&str) -> Option<String>) {
    if let Some(url) = env(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
        config.api_url = url.trim().to_string();
    }
    if let Some(level) = env(LOG_LEVEL_ENV).filter(|v| !v.trim().is_empty()) {
        config.log_level = level.trim().to_string();
    }
}

fn validate(config: &mut ClientConfig) -> Result<()> {
    let url = config.api_url.trim().trim_end_matches('/');
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ParleyError::config(format!(
            "api_url must start with http:// or https://, got '{}'",
            config.api_url
        )));
    }
    config.api_url = url.to_string();
    Ok(())
}
