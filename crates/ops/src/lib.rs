#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! High-level operations for modhost
//!
//! This crate is the surface the CLI talks to. It wires the resolver output
//! into the package lists, drives the install pipeline and removal cascade,
//! and fronts the registry and the server container.

mod context;
mod maintenance;
mod packages;
mod query;
mod server;
mod server_config;
mod types;

pub use context::{OpsContextBuilder, OpsCtx};
pub use types::{
    CommandReply, ExportReport, PlayersData, ProjectView, ServerAction, ServerProperties,
};

pub use maintenance::{export_artifacts, list_backups};
pub use packages::{
    add_direct, add_project, install_ready, list_installed, list_ready, lookup_by_project,
    remove_installed, remove_ready, resolve_and_stage,
};
pub use query::{project_details, search};
pub use server::{
    command_history, restart_server, send_command, server_status, start_server, stop_server,
};
pub use server_config::{
    parse_properties, players_data, server_config, server_config_summary, SUMMARY_KEYS,
};

use modhost_errors::{Error, OpsError};
use std::collections::BTreeMap;
use modhost_types::{
    CommandRecord, ContainerState, InstallOutcome, PackageRecord, ProjectLookup, RemovalReport,
    SearchPage, StageReport,
};

/// Operation result that can be serialized for CLI output
#[derive(Clone, Debug, serde::Serialize)]
#[serde(tag = "type", content = "data")]
pub enum OperationResult {
    /// Records of one package list
    PackageList(Vec<PackageRecord>),
    Lookup(ProjectLookup),
    SearchResults(SearchPage),
    Project(Box<ProjectView>),
    Staged(StageReport),
    Install(InstallOutcome),
    Removal(RemovalReport),
    Command(CommandReply),
    CommandHistory(Vec<CommandRecord>),
    ServerStatus(ContainerState),
    /// Every setting in `server.properties`
    ServerConfig(ServerProperties),
    /// Selected settings; `None` where the file does not set them
    ServerConfigSummary(BTreeMap<String, Option<String>>),
    Players(PlayersData),
    Backups(Vec<String>),
    Export(ExportReport),
    /// Generic success message
    Success(String),
}

impl OperationResult {
    /// Convert to JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self).map_err(|e| {
            OpsError::SerializationError {
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Check if this is a success result
    #[must_use]
    pub fn is_success(&self) -> bool {
        match self {
            OperationResult::Install(outcome) => outcome.is_success(),
            _ => true,
        }
    }
}
