//! Managed server process state

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of the container running the managed server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerState {
    Created,
    Running,
    Paused,
    Restarting,
    Removing,
    Exited,
    Dead,
    NotFound,
    Unknown(String),
}

impl ContainerState {
    /// Parse the status string reported by the container runtime
    #[must_use]
    pub fn parse(status: &str) -> Self {
        match status.trim() {
            "created" => Self::Created,
            "running" => Self::Running,
            "paused" => Self::Paused,
            "restarting" => Self::Restarting,
            "removing" => Self::Removing,
            "exited" => Self::Exited,
            "dead" => Self::Dead,
            other => Self::Unknown(other.to_string()),
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }
}

impl fmt::Display for ContainerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => f.write_str("created"),
            Self::Running => f.write_str("running"),
            Self::Paused => f.write_str("paused"),
            Self::Restarting => f.write_str("restarting"),
            Self::Removing => f.write_str("removing"),
            Self::Exited => f.write_str("exited"),
            Self::Dead => f.write_str("dead"),
            Self::NotFound => f.write_str("not_found"),
            Self::Unknown(other) => f.write_str(other),
        }
    }
}
