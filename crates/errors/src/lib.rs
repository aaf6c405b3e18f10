#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Error types for modhost
//!
//! One enum per domain, folded into [`Error`] at crate boundaries. Every type
//! is `Clone` so failures can ride along in events and install reports, and
//! every type implements [`UserFacingError`] so the CLI can print a stable
//! code and a hint.

use std::borrow::Cow;
use std::path::PathBuf;

use thiserror::Error;

pub mod config;
pub mod host;
pub mod install;
pub mod network;
pub mod ops;
pub mod registry;
pub mod state;
pub mod storage;

pub use config::ConfigError;
pub use host::HostError;
pub use install::InstallError;
pub use network::NetworkError;
pub use ops::OpsError;
pub use registry::RegistryError;
pub use state::StateError;
pub use storage::StorageError;

/// Error crossing crate boundaries
#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Error {
    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("state error: {0}")]
    State(#[from] StateError),

    #[error("install error: {0}")]
    Install(#[from] InstallError),

    #[error("host error: {0}")]
    Host(#[from] HostError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("ops error: {0}")]
    Ops(#[from] OpsError),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("I/O error: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
    },
}

impl Error {
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether this error came from talking to the mod registry.
    ///
    /// Resolution treats every such failure as "could not stage package".
    #[must_use]
    pub fn is_registry_failure(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Registry(_))
    }

    /// The wrapped domain error, if any
    fn domain(&self) -> Option<&dyn UserFacingError> {
        match self {
            Self::Network(err) => Some(err),
            Self::Registry(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::State(err) => Some(err),
            Self::Install(err) => Some(err),
            Self::Host(err) => Some(err),
            Self::Config(err) => Some(err),
            Self::Ops(err) => Some(err),
            Self::Internal(_) | Self::Io { .. } => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
            path: None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON error: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// What the CLI needs to render a failure
pub trait UserFacingError {
    /// Short message suitable for CLI output.
    fn user_message(&self) -> Cow<'_, str>;

    /// Optional remediation hint.
    fn user_hint(&self) -> Option<&'static str> {
        None
    }

    /// Whether retrying the same operation is likely to succeed.
    fn is_retryable(&self) -> bool {
        false
    }

    /// Stable error code for structured reporting.
    fn user_code(&self) -> Option<&'static str> {
        None
    }
}

impl UserFacingError for Error {
    fn user_message(&self) -> Cow<'_, str> {
        match (self.domain(), self) {
            (Some(err), _) => err.user_message(),
            (None, Self::Io { message, path }) => match path {
                Some(path) => Cow::Owned(format!("{message} ({})", path.display())),
                None => Cow::Borrowed(message.as_str()),
            },
            (None, _) => Cow::Owned(self.to_string()),
        }
    }

    fn user_hint(&self) -> Option<&'static str> {
        self.domain().and_then(UserFacingError::user_hint)
    }

    fn is_retryable(&self) -> bool {
        match self.domain() {
            Some(err) => err.is_retryable(),
            None => matches!(self, Self::Io { .. }),
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        match (self.domain(), self) {
            (Some(err), _) => err.user_code(),
            (None, Self::Io { .. }) => Some("error.io"),
            (None, _) => Some("error.internal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_delegate_codes_and_hints() {
        let err: Error = StateError::PackageNotFound {
            version_id: "v1".into(),
            list: "ready".into(),
        }
        .into();
        assert_eq!(err.user_code(), Some("state.package_not_found"));
        assert!(!err.is_retryable());
    }

    #[test]
    fn io_errors_are_retryable() {
        let err: Error = std::io::Error::other("disk full").into();
        assert_eq!(err.user_code(), Some("error.io"));
        assert!(err.is_retryable());
        assert_eq!(err.user_message(), "disk full");
    }

    #[test]
    fn internal_errors_have_no_hint() {
        let err = Error::internal("archive task panicked");
        assert_eq!(err.user_code(), Some("error.internal"));
        assert!(err.user_hint().is_none());
    }
}
