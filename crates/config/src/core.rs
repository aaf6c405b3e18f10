//! Configuration sections shared across crates

use crate::constants;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Path configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PathConfig {
    /// Directory holding the list and command documents
    pub data_dir: Option<PathBuf>,
    /// Live artifact directory read by the server
    pub artifacts_dir: Option<PathBuf>,
    pub backups_dir: Option<PathBuf>,
    pub logs_dir: Option<PathBuf>,
}

/// Package registry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_loader")]
    pub loader: String,
    #[serde(default = "default_game_version")]
    pub game_version: String,
    /// Sent verbatim as the Authorization header when set
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            loader: default_loader(),
            game_version: default_game_version(),
            token: None,
            search_limit: default_search_limit(),
        }
    }
}

/// Network configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_timeout")]
    pub timeout: u64, // seconds
    #[serde(default = "default_download_timeout")]
    pub download_timeout: u64, // seconds
    #[serde(default = "default_resolve_timeout")]
    pub resolve_timeout: u64, // seconds, whole dependency walk
    #[serde(default = "default_retries")]
    pub retries: u32,
    #[serde(default = "default_retry_delay")]
    pub retry_delay: u64, // seconds
    #[serde(default = "default_max_artifact_size")]
    pub max_artifact_size: u64, // bytes
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            download_timeout: default_download_timeout(),
            resolve_timeout: default_resolve_timeout(),
            retries: default_retries(),
            retry_delay: default_retry_delay(),
            max_artifact_size: default_max_artifact_size(),
        }
    }
}

/// Host control plane configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    #[serde(default = "default_container")]
    pub container: String,
    #[serde(default = "default_docker_bin")]
    pub docker_bin: String,
    #[serde(default)]
    pub rcon_password: Option<String>,
    /// Server root inside the container, where `server.properties` and the
    /// player lists live
    #[serde(default = "default_server_dir")]
    pub server_dir: String,
    /// Seconds between the shutdown warnings, the final warning and
    /// `save-all`, and `save-all` and `stop`
    #[serde(default = "default_announce_delays")]
    pub announce_delays: [u64; 3],
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            container: default_container(),
            docker_bin: default_docker_bin(),
            rcon_password: None,
            server_dir: default_server_dir(),
            announce_delays: default_announce_delays(),
        }
    }
}

/// Install pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallConfig {
    /// Only files with this extension are treated as managed artifacts
    #[serde(default = "default_artifact_extension")]
    pub artifact_extension: String,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            artifact_extension: default_artifact_extension(),
        }
    }
}

// Default value functions for serde
fn default_base_url() -> String {
    constants::REGISTRY_BASE_URL.to_string()
}

fn default_server_dir() -> String {
    constants::SERVER_ROOT.to_string()
}

fn default_loader() -> String {
    "fabric".to_string()
}

fn default_game_version() -> String {
    "1.21.1".to_string()
}

fn default_search_limit() -> u32 {
    24
}

fn default_timeout() -> u64 {
    30
}

fn default_download_timeout() -> u64 {
    300 // 5 minutes
}

fn default_resolve_timeout() -> u64 {
    120
}

fn default_retries() -> u32 {
    3
}

fn default_retry_delay() -> u64 {
    1 // 1 second
}

fn default_max_artifact_size() -> u64 {
    256 * 1024 * 1024
}

fn default_container() -> String {
    constants::CONTAINER_NAME.to_string()
}

fn default_docker_bin() -> String {
    "docker".to_string()
}

fn default_announce_delays() -> [u64; 3] {
    [10, 5, 2]
}

fn default_artifact_extension() -> String {
    "jar".to_string()
}
