//! Types for operations and results

use modhost_types::{CommandRecord, ProjectDetails, ProjectLookup};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Parsed `server.properties`, keys sorted
pub type ServerProperties = BTreeMap<String, String>;

/// Player lists kept by the server next to `server.properties`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PlayersData {
    pub banned_ips: Vec<String>,
    pub banned_players: Vec<String>,
    pub whitelist: Vec<String>,
    pub ops: Vec<String>,
}

/// Registry project annotated with where it sits locally
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProjectView {
    #[serde(flatten)]
    pub details: ProjectDetails,
    /// Present in either list under this version id
    pub version_id: Option<String>,
    pub installed: bool,
    pub ready: bool,
}

impl ProjectView {
    #[must_use]
    pub fn new(details: ProjectDetails, lookup: ProjectLookup) -> Self {
        Self {
            details,
            version_id: lookup.version_id,
            installed: lookup.installed,
            ready: lookup.ready,
        }
    }
}

/// Reply to a console command together with the updated audit trail
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CommandReply {
    pub output: String,
    pub history: Vec<CommandRecord>,
}

/// Where an artifact export was written
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportReport {
    pub path: PathBuf,
    pub artifacts: usize,
}

/// Graceful lifecycle action on the server container
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerAction {
    Start,
    Stop,
    Restart,
}

impl ServerAction {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Restart => "restart",
        }
    }

    /// Verb used in player announcements
    #[must_use]
    pub fn announce_verb(self) -> &'static str {
        match self {
            Self::Start => "starting",
            Self::Stop => "stopping",
            Self::Restart => "restarting",
        }
    }
}

impl std::fmt::Display for ServerAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
