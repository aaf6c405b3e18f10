//! Host control plane error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HostError {
    #[error("container not found: {container}")]
    ContainerNotFound { container: String },

    #[error("container runtime unavailable: {message}")]
    RuntimeUnavailable { message: String },

    #[error("command failed with exit code {exit_code}: {output}")]
    CommandFailed { exit_code: i32, output: String },

    #[error("{action} of {container} failed: {message}")]
    ActionFailed {
        action: String,
        container: String,
        message: String,
    },
}

impl UserFacingError for HostError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::ContainerNotFound { .. } => Some("Check host.container in the configuration."),
            Self::RuntimeUnavailable { .. } => {
                Some("Make sure the docker CLI is installed and the daemon is reachable.")
            }
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::RuntimeUnavailable { .. } | Self::ActionFailed { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::ContainerNotFound { .. } => "host.container_not_found",
            Self::RuntimeUnavailable { .. } => "host.runtime_unavailable",
            Self::CommandFailed { .. } => "host.command_failed",
            Self::ActionFailed { .. } => "host.action_failed",
        };
        Some(code)
    }
}
