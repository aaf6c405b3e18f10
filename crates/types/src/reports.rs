//! Operation result types

use crate::{ListName, PackageRecord};
use serde::{Deserialize, Serialize};

/// Result of staging a package into the ready list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageReport {
    /// Version id of the package the user asked for
    pub root_id: String,
    pub project_id: String,
    /// Dependencies appended to the ready list
    pub added: Vec<String>,
    /// Dependencies already staged that gained the root as a parent
    pub linked: Vec<String>,
}

impl StageReport {
    #[must_use]
    pub fn message(&self) -> String {
        if self.added.is_empty() {
            "Mod added to ready to install list".to_string()
        } else {
            format!(
                "Mod added to ready to install list with {} dependencies",
                self.added.len()
            )
        }
    }
}

/// A ready record the install pipeline could not place
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRecord {
    pub id: String,
    pub reason: String,
}

/// Partial-success result of one install batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallReport {
    /// Version ids newly promoted into the installed list
    pub installed: Vec<String>,
    /// Ready records whose exact version was already installed
    pub already_installed: Vec<String>,
    /// Ready records that failed to download or place
    pub skipped: Vec<SkippedRecord>,
    /// Installed records whose artifact could not be put back after clearing
    pub restore_failures: Vec<SkippedRecord>,
    /// Name of the backup taken before clearing, if any
    pub backup: Option<String>,
}

impl InstallReport {
    #[must_use]
    pub fn installed_count(&self) -> usize {
        self.installed.len()
    }

    /// Every ready record was placed and every existing artifact restored
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty() && self.restore_failures.is_empty()
    }
}

/// Outcome of `install_ready`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "report", rename_all = "snake_case")]
pub enum InstallOutcome {
    /// The ready list was empty
    NothingToInstall,
    /// The pipeline ran to the end; see the report for per-record results
    Completed(InstallReport),
}

impl InstallOutcome {
    /// Flat success flag: `false` only when there was nothing to install.
    /// Pipeline failures surface as errors rather than as `false`.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    #[must_use]
    pub fn report(&self) -> Option<&InstallReport> {
        match self {
            Self::NothingToInstall => None,
            Self::Completed(report) => Some(report),
        }
    }
}

/// Result of a removal cascade
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalReport {
    pub list: ListName,
    /// The target followed by every dependency that lost its only parent
    pub removed: Vec<PackageRecord>,
    /// Shared dependencies kept because another parent still needs them
    pub retained: Vec<String>,
    /// Artifact file names deleted from the live directory
    pub artifacts_deleted: Vec<String>,
}

impl RemovalReport {
    #[must_use]
    pub fn removed_ids(&self) -> Vec<&str> {
        self.removed.iter().map(|r| r.id.as_str()).collect()
    }
}
