use serde::{Deserialize, Serialize};

use crate::{EventLevel, EventSource};
use modhost_errors::UserFacingError;

/// Structured failure information shared across domains.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Short user-facing message.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Whether retrying the operation might succeed.
    pub retryable: bool,
}

impl FailureContext {
    #[must_use]
    pub fn new(
        code: Option<impl Into<String>>,
        message: impl Into<String>,
        hint: Option<impl Into<String>>,
        retryable: bool,
    ) -> Self {
        Self {
            code: code.map(Into::into),
            message: message.into(),
            hint: hint.map(Into::into),
            retryable,
        }
    }

    /// Build failure context from a `UserFacingError` implementation.
    #[must_use]
    pub fn from_error<E: UserFacingError + ?Sized>(error: &E) -> Self {
        Self::new(
            error.user_code(),
            error.user_message().into_owned(),
            error.user_hint(),
            error.is_retryable(),
        )
    }
}

pub mod download;
pub mod general;
pub mod host;
pub mod install;
pub mod resolver;
pub mod uninstall;

pub use download::*;
pub use general::*;
pub use host::*;
pub use install::*;
pub use resolver::*;
pub use uninstall::*;

/// Top-level application event enum that aggregates all domain-specific events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event", rename_all = "snake_case")]
pub enum AppEvent {
    /// Warnings, errors, operation bookkeeping
    General(GeneralEvent),

    /// Dependency walk and staging into the ready list
    Resolver(ResolverEvent),

    /// Backup, clear, restore and placement of artifacts
    Install(InstallEvent),

    /// Removal from either list, including the dependency cascade
    Uninstall(UninstallEvent),

    /// Artifact transfers
    Download(DownloadEvent),

    /// Container lifecycle and console commands
    Host(HostEvent),
}

impl AppEvent {
    /// Identify the source domain for this event
    #[must_use]
    pub fn event_source(&self) -> EventSource {
        match self {
            Self::General(_) => EventSource::General,
            Self::Resolver(_) => EventSource::Resolver,
            Self::Install(_) => EventSource::Install,
            Self::Uninstall(_) => EventSource::Uninstall,
            Self::Download(_) => EventSource::Download,
            Self::Host(_) => EventSource::Host,
        }
    }

    /// Determine the severity this event is logged at
    #[must_use]
    pub fn log_level(&self) -> EventLevel {
        match self {
            Self::General(GeneralEvent::Error { .. } | GeneralEvent::OperationFailed { .. })
            | Self::Resolver(ResolverEvent::Failed { .. })
            | Self::Install(InstallEvent::Failed { .. })
            | Self::Uninstall(UninstallEvent::Failed { .. })
            | Self::Download(DownloadEvent::Failed { .. })
            | Self::Host(HostEvent::ActionFailed { .. }) => EventLevel::Error,

            Self::General(GeneralEvent::Warning { .. })
            | Self::Install(
                InstallEvent::RestoreFailed { .. } | InstallEvent::ArtifactSkipped { .. },
            )
            | Self::Uninstall(UninstallEvent::ArtifactDeleteFailed { .. })
            | Self::Host(HostEvent::CommandRejected { .. }) => EventLevel::Warn,

            Self::General(GeneralEvent::DebugLog { .. })
            | Self::Resolver(
                ResolverEvent::DependencyStaged { .. } | ResolverEvent::KnownDependency { .. },
            )
            | Self::Download(DownloadEvent::Started { .. }) => EventLevel::Debug,

            _ => EventLevel::Info,
        }
    }

    /// Get the log target for this event
    #[must_use]
    pub fn log_target(&self) -> &'static str {
        match self {
            Self::General(_) => "modhost::events::general",
            Self::Resolver(_) => "modhost::events::resolver",
            Self::Install(_) => "modhost::events::install",
            Self::Uninstall(_) => "modhost::events::uninstall",
            Self::Download(_) => "modhost::events::download",
            Self::Host(_) => "modhost::events::host",
        }
    }
}
