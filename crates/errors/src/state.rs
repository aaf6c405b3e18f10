//! Package list state error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StateError {
    #[error("one version of project {project_id} is already added (version {existing_id} in {list})")]
    DuplicateProject {
        project_id: String,
        existing_id: String,
        list: String,
    },

    #[error("package {version_id} not found in {list} list")]
    PackageNotFound { version_id: String, list: String },

    #[error("state conflict: {message}")]
    Conflict { message: String },
}

impl UserFacingError for StateError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::DuplicateProject { .. } => {
                Some("Remove the existing version first if you want a different one.")
            }
            Self::PackageNotFound { .. } => Some("Run `modhost list` to see known version ids."),
            Self::Conflict { .. } => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::DuplicateProject { .. } => "state.duplicate_project",
            Self::PackageNotFound { .. } => "state.package_not_found",
            Self::Conflict { .. } => "state.conflict",
        };
        Some(code)
    }
}
