//! Event handling and status display

use crate::logging::log_event_with_tracing;
use console::{Style, Term};
use modhost_events::{
    AppEvent, DownloadEvent, EventMessage, GeneralEvent, HostEvent, InstallEvent, ResolverEvent,
    UninstallEvent,
};

/// Forwards events to tracing and prints short status lines on stderr
pub struct EventHandler {
    term: Term,
    colors_enabled: bool,
    debug_enabled: bool,
    /// JSON mode keeps stderr free of status lines
    quiet: bool,
}

impl EventHandler {
    pub fn new(colors_enabled: bool, debug_enabled: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            colors_enabled,
            debug_enabled,
            quiet,
        }
    }

    /// Handle incoming event
    pub fn handle_event(&mut self, message: EventMessage) {
        log_event_with_tracing(&message);

        if self.quiet {
            return;
        }

        match &message.event {
            AppEvent::General(general) => self.handle_general(general),
            AppEvent::Resolver(resolver) => self.handle_resolver(resolver),
            AppEvent::Install(install) => self.handle_install(install),
            AppEvent::Uninstall(uninstall) => self.handle_uninstall(uninstall),
            AppEvent::Download(download) => self.handle_download(download),
            AppEvent::Host(host) => self.handle_host(host),
        }
    }

    fn handle_general(&self, event: &GeneralEvent) {
        match event {
            GeneralEvent::Warning { message, context } => match context {
                Some(context) => self.show_warning(&format!("{message} ({context})")),
                None => self.show_warning(message),
            },
            GeneralEvent::Error { message, details } => match details {
                Some(details) => self.show_error(&format!("{message}: {details}")),
                None => self.show_error(message),
            },
            GeneralEvent::DebugLog { message, .. } if self.debug_enabled => {
                self.show_status(message);
            }
            _ => {}
        }
    }

    fn handle_resolver(&self, event: &ResolverEvent) {
        match event {
            ResolverEvent::Started { project_id, .. } => {
                self.show_status(&format!("Resolving dependencies for {project_id}"));
            }
            ResolverEvent::DependencyStaged { project_id, .. } if self.debug_enabled => {
                self.show_status(&format!("  + {project_id}"));
            }
            ResolverEvent::KnownDependency { project_id, .. } if self.debug_enabled => {
                self.show_status(&format!("  = {project_id} (already tracked)"));
            }
            ResolverEvent::Completed { added, linked, .. } => {
                self.show_success(&format!(
                    "Resolved {} new, {} already tracked",
                    added.len(),
                    linked.len()
                ));
            }
            ResolverEvent::Failed { failure, .. } => {
                self.show_error(&format!("Dependency resolution failed: {}", failure.message));
            }
            _ => {}
        }
    }

    fn handle_install(&self, event: &InstallEvent) {
        match event {
            InstallEvent::Started { pending, .. } => {
                self.show_status(&format!("Installing {pending} ready mod(s)"));
            }
            InstallEvent::BackupCreated {
                location,
                artifacts,
            } => {
                self.show_status(&format!("Backed up {artifacts} artifact(s) to {location}"));
            }
            InstallEvent::ArtifactPlaced { file_name, .. } => {
                self.show_success(&format!("Placed {file_name}"));
            }
            InstallEvent::AlreadyInstalled { version_id } => {
                self.show_status(&format!("{version_id} is already installed"));
            }
            InstallEvent::ArtifactSkipped { version_id, reason } => {
                self.show_warning(&format!("Skipped {version_id}: {reason}"));
            }
            InstallEvent::RestoreFailed { file_name, failure } => {
                self.show_warning(&format!("Could not restore {file_name}: {}", failure.message));
            }
            InstallEvent::Failed { failure } => {
                self.show_error(&format!("Install failed: {}", failure.message));
            }
            _ => {}
        }
    }

    fn handle_uninstall(&self, event: &UninstallEvent) {
        match event {
            UninstallEvent::DependencyRemoved { version_id, .. } => {
                self.show_status(&format!("Removed orphaned dependency {version_id}"));
            }
            UninstallEvent::DependencyRetained {
                version_id,
                remaining_parents,
                ..
            } => {
                self.show_status(&format!(
                    "Kept {version_id}, still required by {remaining_parents} other mod(s)"
                ));
            }
            UninstallEvent::ArtifactDeleteFailed { file_name, error } => {
                self.show_warning(&format!("Could not delete {file_name}: {error}"));
            }
            _ => {}
        }
    }

    fn handle_download(&self, event: &DownloadEvent) {
        match event {
            DownloadEvent::Started { url, package } if self.debug_enabled => {
                self.show_status(&format!(
                    "Downloading {}",
                    package.as_deref().unwrap_or(url.as_str())
                ));
            }
            DownloadEvent::Failed { url, failure, .. } => {
                self.show_error(&format!("Download of {url} failed: {}", failure.message));
            }
            _ => {}
        }
    }

    fn handle_host(&self, event: &HostEvent) {
        match event {
            HostEvent::Announcement { message, .. } => {
                self.show_status(&format!("> {message}"));
            }
            HostEvent::ActionStarted { action, container } => {
                self.show_status(&format!("Running {action} on {container}"));
            }
            HostEvent::ActionFailed {
                action, failure, ..
            } => {
                self.show_error(&format!("{action} failed: {}", failure.message));
            }
            HostEvent::CommandRejected { command, output, .. } => {
                self.show_warning(&format!("Console rejected `{command}`: {output}"));
            }
            _ => {}
        }
    }

    fn styled(&self, style: &Style, message: &str) -> String {
        if self.colors_enabled {
            style.apply_to(message).to_string()
        } else {
            message.to_string()
        }
    }

    fn show_status(&self, message: &str) {
        self.term.write_line(message).unwrap_or(());
    }

    fn show_success(&self, message: &str) {
        let line = self.styled(&Style::new().green(), message);
        self.term.write_line(&line).unwrap_or(());
    }

    fn show_warning(&self, message: &str) {
        let line = self.styled(&Style::new().yellow(), &format!("warning: {message}"));
        self.term.write_line(&line).unwrap_or(());
    }

    fn show_error(&self, message: &str) {
        let line = self.styled(&Style::new().red().bold(), &format!("error: {message}"));
        self.term.write_line(&line).unwrap_or(());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modhost_events::FailureContext;

    #[test]
    fn handles_every_domain_without_panicking() {
        let mut handler = EventHandler::new(false, true, false);

        handler.handle_event(EventMessage::from_event(AppEvent::Resolver(
            ResolverEvent::Started {
                root_id: "v1".into(),
                project_id: "fabric-api".into(),
                known_projects: 0,
                timeout_seconds: 60,
            },
        )));
        handler.handle_event(EventMessage::from_event(AppEvent::Install(
            InstallEvent::ArtifactSkipped {
                version_id: "v2".into(),
                reason: "download timed out".into(),
            },
        )));
        handler.handle_event(EventMessage::from_event(AppEvent::Uninstall(
            UninstallEvent::DependencyRetained {
                version_id: "v3".into(),
                parent_id: "v1".into(),
                remaining_parents: 1,
            },
        )));
        handler.handle_event(EventMessage::from_event(AppEvent::Host(
            HostEvent::ActionFailed {
                action: "restart".into(),
                container: "mc".into(),
                failure: FailureContext::new(None::<&str>, "exit 1", None::<&str>, false),
            },
        )));
    }

    #[test]
    fn quiet_mode_still_accepts_events() {
        let mut handler = EventHandler::new(true, false, true);
        handler.handle_event(EventMessage::from_event(AppEvent::General(
            GeneralEvent::warning("not shown"),
        )));
        assert!(handler.quiet);
    }
}
