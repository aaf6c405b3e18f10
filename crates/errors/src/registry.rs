//! Package registry error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum RegistryError {
    #[error("project not found in registry: {project_id}")]
    ProjectNotFound { project_id: String },

    #[error("version not found in registry: {version_id}")]
    VersionNotFound { version_id: String },

    #[error("no version of {project_id} is compatible with {loader} {game_version}")]
    NoCompatibleVersion {
        project_id: String,
        loader: String,
        game_version: String,
    },

    #[error("version {version_id} has no downloadable files")]
    NoFiles { version_id: String },

    #[error("invalid registry response: {message}")]
    InvalidResponse { message: String },

    #[error("dependency resolution timed out after {seconds}s")]
    ResolveTimeout { seconds: u64 },
}

impl UserFacingError for RegistryError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::NoCompatibleVersion { .. } => {
                Some("Pick another project or change the configured game version / loader.")
            }
            Self::ResolveTimeout { .. } => {
                Some("The registry is slow to respond; retry or raise network.resolve_timeout.")
            }
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::ResolveTimeout { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::ProjectNotFound { .. } => "registry.project_not_found",
            Self::VersionNotFound { .. } => "registry.version_not_found",
            Self::NoCompatibleVersion { .. } => "registry.no_compatible_version",
            Self::NoFiles { .. } => "registry.no_files",
            Self::InvalidResponse { .. } => "registry.invalid_response",
            Self::ResolveTimeout { .. } => "registry.resolve_timeout",
        };
        Some(code)
    }
}
