//! Installation system error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InstallError {
    #[error("backup failed: {message}")]
    BackupFailed { message: String },

    #[error("clearing artifact directory failed: {message}")]
    ClearFailed { message: String },

    #[error("failed to install {version_id}: {message}")]
    RecordFailed { version_id: String, message: String },

    #[error("failed to restore artifact {file_name} from backup: {message}")]
    RestoreFailed { file_name: String, message: String },

    #[error("download timeout: {version_id} from {url} after {timeout_seconds}s")]
    DownloadTimeout {
        version_id: String,
        url: String,
        timeout_seconds: u64,
    },

    #[error("failed to persist {list} list: {message}")]
    PersistFailed { list: String, message: String },
}

impl UserFacingError for InstallError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::BackupFailed { .. } | Self::ClearFailed { .. } => {
                Some("Nothing was changed; check the mods and backup directories and retry.")
            }
            Self::PersistFailed { .. } => {
                Some("Artifacts may be ahead of the installed list; compare them before retrying.")
            }
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::DownloadTimeout { .. } | Self::RecordFailed { .. } | Self::BackupFailed { .. }
        )
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::BackupFailed { .. } => "install.backup_failed",
            Self::ClearFailed { .. } => "install.clear_failed",
            Self::RecordFailed { .. } => "install.record_failed",
            Self::RestoreFailed { .. } => "install.restore_failed",
            Self::DownloadTimeout { .. } => "install.download_timeout",
            Self::PersistFailed { .. } => "install.persist_failed",
        };
        Some(code)
    }
}
