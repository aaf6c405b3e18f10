//! Server command audit trail

use serde::{Deserialize, Serialize};

/// One command successfully sent to the managed server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRecord {
    /// Unix seconds
    pub timestamp: i64,
    pub command: String,
}

impl CommandRecord {
    /// Record `command` as sent now
    pub fn now(command: impl Into<String>) -> Self {
        Self {
            timestamp: crate::unix_timestamp(),
            command: command.into(),
        }
    }
}
