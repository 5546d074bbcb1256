//! Configuration management for Linkdrop.
//!
//! This module handles loading and saving Linkdrop configuration.
//!
//! ## Configuration File Locations
//!
//! | Platform | Path |
//! |----------|------|
//! | Linux | `~/.config/linkdrop/config.toml` |
//! | macOS | `~/Library/Application Support/Linkdrop/config.toml` |
//! | Windows | `%APPDATA%\Linkdrop\config.toml` |
//!
//! Unknown or missing keys fall back to defaults, so a config written by an
//! older version keeps loading.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::{DEFAULT_BACKEND_URL, DEFAULT_REQUEST_TIMEOUT_SECS};

/// Main configuration struct for Linkdrop.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend endpoint settings
    pub backend: BackendConfig,
    /// Share defaults
    pub share: ShareConfig,
}

/// Backend endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the companion backend API
    pub base_url: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// How often to poll the backend status endpoint, in seconds
    pub status_poll_interval_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            status_poll_interval_secs: 5,
        }
    }
}

/// Defaults applied when creating a share-link session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareConfig {
    /// Accept download requests without per-receiver confirmation
    pub auto_accept: bool,
    /// Ask for an access PIN before creating a session
    pub require_pin: bool,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            auto_accept: true,
            require_pin: false,
        }
    }
}

impl Config {
    /// Load the configuration from the default location, falling back to
    /// defaults when no file exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let path = Self::default_path().unwrap_or_else(|| PathBuf::from("config.toml"));
        Self::load_from(path)
    }

    /// Load from a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed.
    pub fn load_from(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(&path)?;
        toml::from_str(&raw).map_err(|e| {
            Error::ConfigError(format!("failed to parse {}: {e}", path.display()))
        })
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "linkdrop", "Linkdrop")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Save the configuration to a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self)
            .map_err(|e| Error::ConfigError(format!("failed to serialize config: {e}")))?;
        fs::write(path, raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.backend.base_url, DEFAULT_BACKEND_URL);
        assert_eq!(config.backend.request_timeout_secs, 10);
        assert!(config.share.auto_accept);
        assert!(!config.share.require_pin);
    }

    #[test]
    fn test_load_missing_file_yields_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = Config::load_from(tmp.path().join("missing.toml")).unwrap();
        assert_eq!(config.backend.base_url, DEFAULT_BACKEND_URL);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.backend.base_url = "http://10.0.0.5:53317".to_string();
        config.share.require_pin = true;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(path).unwrap();
        assert_eq!(loaded.backend.base_url, "http://10.0.0.5:53317");
        assert!(loaded.share.require_pin);
        assert!(loaded.share.auto_accept);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(
            &path,
            "[backend]\nbase_url = \"http://localhost:1\"\nfuture_knob = 3\n",
        )
        .unwrap();

        let loaded = Config::load_from(path).unwrap();
        assert_eq!(loaded.backend.base_url, "http://localhost:1");
    }

    #[test]
    fn test_parse_error_reported() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "not toml [[").unwrap();
        assert!(matches!(
            Config::load_from(path).unwrap_err(),
            Error::ConfigError(_)
        ));
    }
}
