use serde::{Deserialize, Serialize};

use super::FailureContext;

/// Artifact transfer events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DownloadEvent {
    Started {
        url: String,
        package: Option<String>,
    },

    Completed {
        url: String,
        package: Option<String>,
        bytes_downloaded: u64,
    },

    Failed {
        url: String,
        package: Option<String>,
        failure: FailureContext,
    },
}
