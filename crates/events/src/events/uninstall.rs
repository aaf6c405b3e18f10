use serde::{Deserialize, Serialize};

use super::FailureContext;

/// Removal events for both package lists
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UninstallEvent {
    Started {
        version_id: String,
        list: String,
    },

    /// Dependency kept because another parent still needs it
    DependencyRetained {
        version_id: String,
        parent_id: String,
        remaining_parents: usize,
    },

    /// Dependency removed together with its only parent
    DependencyRemoved {
        version_id: String,
        parent_id: String,
    },

    ArtifactDeleteFailed {
        file_name: String,
        error: String,
    },

    Completed {
        version_id: String,
        list: String,
        removed: Vec<String>,
        artifacts_deleted: usize,
    },

    Failed {
        version_id: String,
        list: String,
        failure: FailureContext,
    },
}
