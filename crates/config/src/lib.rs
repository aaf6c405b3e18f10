#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for modhost
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/modhost/config.toml)
//! - Environment variables
//! - CLI flags

pub mod constants;
pub mod core;

pub use crate::core::{HostConfig, InstallConfig, NetworkConfig, PathConfig, RegistryConfig};

use modhost_errors::{ConfigError, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub paths: PathConfig,

    #[serde(default)]
    pub registry: RegistryConfig,

    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub host: HostConfig,

    #[serde(default)]
    pub install: InstallConfig,
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join("modhost").join("config.toml"))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        Self::parse(&contents)
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for this schema.
    pub fn parse(contents: &str) -> Result<Self, Error> {
        toml::from_str(contents)
            .map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        if let Ok(token) = std::env::var("MODHOST_REGISTRY_TOKEN") {
            self.registry.token = (!token.is_empty()).then_some(token);
        }

        if let Ok(password) = std::env::var("MODHOST_RCON_PASSWORD") {
            self.host.rcon_password = (!password.is_empty()).then_some(password);
        }

        if let Some(container) = required_env("MODHOST_CONTAINER")? {
            self.host.container = container;
        }

        if let Some(version) = required_env("MODHOST_GAME_VERSION")? {
            self.registry.game_version = version;
        }

        if let Ok(dir) = std::env::var("MODHOST_DATA_DIR") {
            self.paths.data_dir = Some(PathBuf::from(dir));
        }

        if let Ok(timeout) = std::env::var("MODHOST_NETWORK_TIMEOUT") {
            self.network.timeout = timeout.parse().map_err(|_| ConfigError::InvalidValue {
                field: "MODHOST_NETWORK_TIMEOUT".to_string(),
                value: timeout,
            })?;
        }

        Ok(())
    }

    /// Directory holding the list documents
    #[must_use]
    pub fn data_path(&self) -> PathBuf {
        or_default(self.paths.data_dir.as_ref(), constants::DATA_DIR)
    }

    /// The server's live mods directory
    #[must_use]
    pub fn artifacts_path(&self) -> PathBuf {
        or_default(self.paths.artifacts_dir.as_ref(), constants::ARTIFACTS_DIR)
    }

    #[must_use]
    pub fn backups_path(&self) -> PathBuf {
        or_default(self.paths.backups_dir.as_ref(), constants::BACKUPS_DIR)
    }

    #[must_use]
    pub fn logs_path(&self) -> PathBuf {
        or_default(self.paths.logs_dir.as_ref(), constants::LOGS_DIR)
    }

    /// Timeout for a single registry request
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.network.timeout)
    }

    /// Timeout for a single artifact download
    #[must_use]
    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.network.download_timeout)
    }

    /// Budget for one complete dependency walk
    #[must_use]
    pub fn resolve_timeout(&self) -> Duration {
        Duration::from_secs(self.network.resolve_timeout)
    }
}

fn or_default(configured: Option<&PathBuf>, fallback: &str) -> PathBuf {
    configured.cloned().unwrap_or_else(|| PathBuf::from(fallback))
}

/// Read an override that must not be blank when set
fn required_env(var: &str) -> Result<Option<String>, Error> {
    match std::env::var(var) {
        Ok(value) if value.trim().is_empty() => Err(ConfigError::InvalidValue {
            field: var.to_string(),
            value,
        }
        .into()),
        Ok(value) => Ok(Some(value)),
        Err(_) => Ok(None),
    }
}
