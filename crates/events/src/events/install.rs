use serde::{Deserialize, Serialize};

use super::FailureContext;

/// Install pipeline events, one per pipeline step
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InstallEvent {
    Started {
        pending: usize,
        installed: usize,
    },

    /// Existing artifacts were copied into a fresh backup location
    BackupCreated {
        location: String,
        artifacts: usize,
    },

    /// Managed artifacts were removed from the live directory
    ActiveCleared {
        removed: usize,
    },

    /// An already-installed artifact was copied back from the backup
    ArtifactRestored {
        file_name: String,
    },

    RestoreFailed {
        file_name: String,
        failure: FailureContext,
    },

    ArtifactPlaced {
        version_id: String,
        file_name: String,
    },

    /// Pending record whose id was already in the installed list
    AlreadyInstalled {
        version_id: String,
    },

    /// Pending record that could not be downloaded or placed
    ArtifactSkipped {
        version_id: String,
        reason: String,
    },

    Completed {
        installed: usize,
        already_installed: usize,
        skipped: usize,
    },

    Failed {
        failure: FailureContext,
    },
}
