// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Client configuration management.
//!
//! Configuration is stored in `config.toml` inside the data directory and
//! includes:
//! - `api_base_url`: base URL of the attendance API
//! - `request_timeout_secs`: per-request HTTP timeout
//! - `rotation_window_secs`: lifetime of an issued attendance token
//! - `sync_debounce_ms`: delay before the first drain once online and signed in
//! - `probe_interval_secs`: how often `sync --watch` re-checks reachability
//!
//! A missing file means all defaults. `PRESENTLY_API_URL` overrides the
//! base URL.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::env;
use crate::error::{Error, Result};

const CONFIG_FILE_NAME: &str = "config.toml";
const APP_DIR_NAME: &str = "presently";

/// Client configuration stored in `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the attendance API, e.g. `http://10.0.0.5:3000/api`.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// HTTP request timeout in seconds (default: 10).
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Validity window of an issued attendance token in seconds (default: 30).
    #[serde(default = "default_rotation_window_secs")]
    pub rotation_window_secs: u64,
    /// Debounce before the first drain attempt in milliseconds (default: 1000).
    #[serde(default = "default_sync_debounce_ms")]
    pub sync_debounce_ms: u64,
    /// Reachability probe interval for `sync --watch` in seconds (default: 15).
    #[serde(default = "default_probe_interval_secs")]
    pub probe_interval_secs: u64,
}

fn default_api_base_url() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_rotation_window_secs() -> u64 {
    30
}

fn default_sync_debounce_ms() -> u64 {
    1000
}

fn default_probe_interval_secs() -> u64 {
    15
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            rotation_window_secs: default_rotation_window_secs(),
            sync_debounce_ms: default_sync_debounce_ms(),
            probe_interval_secs: default_probe_interval_secs(),
        }
    }
}

impl Config {
    /// Load configuration from the data directory.
    ///
    /// Falls back to defaults when no file exists and applies the
    /// `PRESENTLY_API_URL` override.
    pub fn load(data_dir: &Path) -> Result<Self> {
        Self::load_file(data_dir)?.with_api_url_override(env::api_url())
    }

    /// Load configuration from the data directory without consulting the
    /// environment.
    pub fn load_file(data_dir: &Path) -> Result<Self> {
        let config_path = data_dir.join(CONFIG_FILE_NAME);
        let content = match fs::read_to_string(&config_path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
            Err(e) => return Err(Error::Config(format!("failed to read config: {}", e))),
        };
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Replace the API base URL when an override is given.
    pub fn with_api_url_override(mut self, url: Option<String>) -> Result<Self> {
        if let Some(url) = url {
            self.api_base_url = url;
            self.validate()?;
        }
        Ok(self)
    }

    /// Save configuration to the data directory.
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        fs::create_dir_all(data_dir)?;
        let config_path = data_dir.join(CONFIG_FILE_NAME);
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(&config_path, content)?;
        Ok(())
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<()> {
        let url = self.api_base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "api_base_url must start with http:// or https://, got '{}'",
                self.api_base_url
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(Error::Config(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.rotation_window_secs == 0 {
            return Err(Error::Config(
                "rotation_window_secs must be greater than 0".to_string(),
            ));
        }
        if self.probe_interval_secs == 0 {
            return Err(Error::Config(
                "probe_interval_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn rotation_window(&self) -> Duration {
        Duration::from_secs(self.rotation_window_secs)
    }

    pub fn sync_debounce(&self) -> Duration {
        Duration::from_millis(self.sync_debounce_ms)
    }

    pub fn probe_interval(&self) -> Duration {
        Duration::from_secs(self.probe_interval_secs)
    }
}

/// Resolve the data directory.
///
/// Resolution order:
/// 1. Explicit override (the `--data-dir` flag)
/// 2. `PRESENTLY_DATA_DIR`
/// 3. Platform data dir joined with `presently`
/// 4. `.presently` in the current directory
pub fn resolve_data_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    if let Some(dir) = env::data_dir() {
        return dir;
    }
    dirs::data_dir()
        .map(|d| d.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(".presently"))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
