//! Structured logging integration for events
//!
//! Converts domain events into tracing records with structured fields so a
//! debug log can be followed per operation through `correlation` and
//! `event_id`.

use modhost_events::{
    AppEvent, DownloadEvent, EventMessage, GeneralEvent, HostEvent, InstallEvent, ResolverEvent,
    UninstallEvent,
};
use tracing::{debug, error, info, warn};

/// Log an event at the level its domain assigns it
#[allow(clippy::too_many_lines)]
pub fn log_event_with_tracing(message: &EventMessage) {
    let event = &message.event;
    let meta = &message.meta;
    let source = meta.source.as_str();

    match event {
        AppEvent::General(general) => match general {
            GeneralEvent::Warning {
                message: text,
                context,
            } => {
                warn!(
                    source,
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    context = ?context,
                    "{text}"
                );
            }
            GeneralEvent::Error {
                message: text,
                details,
            } => {
                error!(
                    source,
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    details = ?details,
                    "{text}"
                );
            }
            GeneralEvent::DebugLog { message: text } => {
                debug!(
                    source,
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    "{text}"
                );
            }
            GeneralEvent::OperationStarted { operation } => {
                info!(
                    source,
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    operation = %operation,
                    "Operation started"
                );
            }
            GeneralEvent::OperationCompleted { operation, success } => {
                info!(
                    source,
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    operation = %operation,
                    success = success,
                    "Operation completed"
                );
            }
            GeneralEvent::OperationFailed {
                operation,
                error: err,
            } => {
                error!(
                    source,
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    operation = %operation,
                    error = %err,
                    "Operation failed"
                );
            }
        },

        AppEvent::Resolver(resolver) => match resolver {
            ResolverEvent::Started {
                root_id,
                project_id,
                known_projects,
                timeout_seconds,
            } => {
                info!(
                    source,
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    root_id = %root_id,
                    project_id = %project_id,
                    known_projects = known_projects,
                    timeout_seconds = timeout_seconds,
                    "Dependency resolution started"
                );
            }
            ResolverEvent::DependencyStaged {
                root_id,
                version_id,
                project_id,
            } => {
                debug!(
                    source,
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    root_id = %root_id,
                    version_id = %version_id,
                    project_id = %project_id,
                    "Dependency discovered"
                );
            }
            ResolverEvent::KnownDependency {
                root_id,
                project_id,
            } => {
                debug!(
                    source,
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    root_id = %root_id,
                    project_id = %project_id,
                    "Dependency already tracked"
                );
            }
            ResolverEvent::Completed {
                root_id,
                added,
                linked,
                duration_ms,
            } => {
                info!(
                    source,
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    root_id = %root_id,
                    added = added.len(),
                    linked = linked.len(),
                    duration_ms = duration_ms,
                    "Dependency resolution completed"
                );
            }
            ResolverEvent::Failed { root_id, failure } => {
                error!(
                    source,
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    root_id = %root_id,
                    retryable = failure.retryable,
                    code = ?failure.code,
                    message = %failure.message,
                    hint = ?failure.hint,
                    "Dependency resolution failed"
                );
            }
        },

        AppEvent::Install(install) => match install {
            InstallEvent::Started { pending, installed } => {
                info!(
                    source,
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    pending = pending,
                    installed = installed,
                    "Install started"
                );
            }
            InstallEvent::BackupCreated {
                location,
                artifacts,
            } => {
                info!(
                    source,
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    location = %location,
                    artifacts = artifacts,
                    "Backup created"
                );
            }
            InstallEvent::ActiveCleared { removed } => {
                info!(
                    source,
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    removed = removed,
                    "Artifact directory cleared"
                );
            }
            InstallEvent::ArtifactRestored { file_name } => {
                info!(
                    source,
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    file_name = %file_name,
                    "Artifact restored"
                );
            }
            InstallEvent::RestoreFailed { file_name, failure } => {
                warn!(
                    source,
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    file_name = %file_name,
                    code = ?failure.code,
                    message = %failure.message,
                    "Artifact restore failed"
                );
            }
            InstallEvent::ArtifactPlaced {
                version_id,
                file_name,
            } => {
                info!(
                    source,
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    version_id = %version_id,
                    file_name = %file_name,
                    "Artifact placed"
                );
            }
            InstallEvent::AlreadyInstalled { version_id } => {
                info!(
                    source,
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    version_id = %version_id,
                    "Version already installed"
                );
            }
            InstallEvent::ArtifactSkipped { version_id, reason } => {
                warn!(
                    source,
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    version_id = %version_id,
                    reason = %reason,
                    "Artifact skipped"
                );
            }
            InstallEvent::Completed {
                installed,
                already_installed,
                skipped,
            } => {
                info!(
                    source,
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    installed = installed,
                    already_installed = already_installed,
                    skipped = skipped,
                    "Install completed"
                );
            }
            InstallEvent::Failed { failure } => {
                error!(
                    source,
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    retryable = failure.retryable,
                    code = ?failure.code,
                    message = %failure.message,
                    hint = ?failure.hint,
                    "Install failed"
                );
            }
        },

        AppEvent::Uninstall(uninstall) => match uninstall {
            UninstallEvent::Started { version_id, list } => {
                info!(
                    source,
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    version_id = %version_id,
                    list = %list,
                    "Removal started"
                );
            }
            UninstallEvent::DependencyRetained {
                version_id,
                parent_id,
                remaining_parents,
            } => {
                info!(
                    source,
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    version_id = %version_id,
                    parent_id = %parent_id,
                    remaining_parents = remaining_parents,
                    "Shared dependency retained"
                );
            }
            UninstallEvent::DependencyRemoved {
                version_id,
                parent_id,
            } => {
                info!(
                    source,
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    version_id = %version_id,
                    parent_id = %parent_id,
                    "Orphaned dependency removed"
                );
            }
            UninstallEvent::ArtifactDeleteFailed {
                file_name,
                error: err,
            } => {
                warn!(
                    source,
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    file_name = %file_name,
                    error = %err,
                    "Artifact could not be deleted"
                );
            }
            UninstallEvent::Completed {
                version_id,
                list,
                removed,
                artifacts_deleted,
            } => {
                info!(
                    source,
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    version_id = %version_id,
                    list = %list,
                    removed = ?removed,
                    artifacts_deleted = artifacts_deleted,
                    "Removal completed"
                );
            }
            UninstallEvent::Failed {
                version_id,
                list,
                failure,
            } => {
                error!(
                    source,
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    version_id = %version_id,
                    list = %list,
                    code = ?failure.code,
                    message = %failure.message,
                    hint = ?failure.hint,
                    "Removal failed"
                );
            }
        },

        AppEvent::Download(download) => match download {
            DownloadEvent::Started { url, package } => {
                debug!(
                    source,
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    url = %url,
                    package = ?package,
                    "Download started"
                );
            }
            DownloadEvent::Completed {
                url,
                package,
                bytes_downloaded,
            } => {
                info!(
                    source,
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    url = %url,
                    package = ?package,
                    bytes_downloaded = bytes_downloaded,
                    "Download completed"
                );
            }
            DownloadEvent::Failed {
                url,
                package,
                failure,
            } => {
                error!(
                    source,
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    url = %url,
                    package = ?package,
                    retryable = failure.retryable,
                    code = ?failure.code,
                    message = %failure.message,
                    hint = ?failure.hint,
                    "Download failed"
                );
            }
        },

        AppEvent::Host(host) => match host {
            HostEvent::CommandSent { command } => {
                info!(
                    source,
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    command = %command,
                    "Console command sent"
                );
            }
            HostEvent::CommandRejected {
                command,
                exit_code,
                output,
            } => {
                warn!(
                    source,
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    command = %command,
                    exit_code = exit_code,
                    output = %output,
                    "Console command rejected"
                );
            }
            HostEvent::Announcement { container, message: text } => {
                info!(
                    source,
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    container = %container,
                    announcement = %text,
                    "Announcement sent"
                );
            }
            HostEvent::ActionStarted { action, container } => {
                info!(
                    source,
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    action = %action,
                    container = %container,
                    "Container action started"
                );
            }
            HostEvent::ActionCompleted { action, container } => {
                info!(
                    source,
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    action = %action,
                    container = %container,
                    "Container action completed"
                );
            }
            HostEvent::ActionFailed {
                action,
                container,
                failure,
            } => {
                error!(
                    source,
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    action = %action,
                    container = %container,
                    code = ?failure.code,
                    message = %failure.message,
                    hint = ?failure.hint,
                    "Container action failed"
                );
            }
        },
    }
}
