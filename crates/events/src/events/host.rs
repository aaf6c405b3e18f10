use serde::{Deserialize, Serialize};

use super::FailureContext;

/// Container control plane events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HostEvent {
    /// Console command accepted with exit status 0 and recorded
    CommandSent {
        command: String,
    },

    /// Console command returned a non-zero exit status; not recorded
    CommandRejected {
        command: String,
        exit_code: i32,
        output: String,
    },

    /// Player-facing notice broadcast ahead of a lifecycle action
    Announcement {
        container: String,
        message: String,
    },

    ActionStarted {
        action: String,
        container: String,
    },

    ActionCompleted {
        action: String,
        container: String,
    },

    ActionFailed {
        action: String,
        container: String,
        failure: FailureContext,
    },
}
