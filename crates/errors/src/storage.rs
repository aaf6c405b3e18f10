//! Failures reading or writing the data directory and mods directory

use std::borrow::Cow;
use std::io::ErrorKind;
use std::path::Path;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum StorageError {
    #[error("permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("no such file or directory: {path}")]
    PathNotFound { path: String },

    #[error("storage I/O failed: {message}")]
    IoError { message: String },

    /// A list document exists but does not parse; it is never overwritten
    #[error("list document {name} is unreadable: {message}")]
    CorruptedData { name: String, message: String },

    #[error("refusing path outside the store: {path}")]
    InvalidPath { path: String },

    /// Backup and clear only see files with the managed extension
    #[error("{file_name} is not a .{extension} artifact")]
    UnmanagedArtifact { file_name: String, extension: String },

    #[error("could not move temporary file into place: {message}")]
    AtomicRenameFailed { message: String },
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            message: err.to_string(),
        }
    }
}

impl StorageError {
    /// Classify an I/O failure on `path`
    #[must_use]
    pub fn from_io_with_path(err: &std::io::Error, path: &Path) -> Self {
        let path_text = path.display().to_string();
        match err.kind() {
            ErrorKind::PermissionDenied => Self::PermissionDenied { path: path_text },
            ErrorKind::NotFound => Self::PathNotFound { path: path_text },
            _ => Self::IoError {
                message: format!("{path_text}: {err}"),
            },
        }
    }
}

impl UserFacingError for StorageError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::PermissionDenied { .. } => {
                Some("Adjust permissions on the data and mods directories, then retry.")
            }
            Self::CorruptedData { .. } => {
                Some("Inspect or restore the named list document; it was left untouched.")
            }
            Self::PathNotFound { .. } => Some("Check MODHOST_DATA_DIR and the mods directory."),
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::IoError { .. } | Self::AtomicRenameFailed { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::PermissionDenied { .. } => "storage.permission_denied",
            Self::PathNotFound { .. } => "storage.path_not_found",
            Self::IoError { .. } => "storage.io_error",
            Self::CorruptedData { .. } => "storage.corrupted_data",
            Self::InvalidPath { .. } => "storage.invalid_path",
            Self::UnmanagedArtifact { .. } => "storage.unmanaged_artifact",
            Self::AtomicRenameFailed { .. } => "storage.atomic_rename_failed",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_paths_keep_the_path() {
        let err = std::io::Error::from(ErrorKind::NotFound);
        let storage = StorageError::from_io_with_path(&err, Path::new("/srv/mods/a.jar"));
        assert!(matches!(
            &storage,
            StorageError::PathNotFound { path } if path == "/srv/mods/a.jar"
        ));
        assert!(!storage.is_retryable());
    }

    #[test]
    fn other_io_failures_are_retryable() {
        let err = std::io::Error::other("device busy");
        let storage = StorageError::from_io_with_path(&err, Path::new("/data"));
        assert_eq!(storage.user_code(), Some("storage.io_error"));
        assert!(storage.is_retryable());
    }
}
