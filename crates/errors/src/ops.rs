//! Operation orchestration error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OpsError {
    #[error("component not found: {component}")]
    MissingComponent { component: String },

    #[error("invalid operation: {operation}")]
    InvalidOperation { operation: String },

    #[error("serialization error: {message}")]
    SerializationError { message: String },

    #[error("archive failed: {message}")]
    ArchiveFailed { message: String },
}

impl UserFacingError for OpsError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::MissingComponent { .. } => "ops.missing_component",
            Self::InvalidOperation { .. } => "ops.invalid_operation",
            Self::SerializationError { .. } => "ops.serialization",
            Self::ArchiveFailed { .. } => "ops.archive_failed",
        };
        Some(code)
    }
}
