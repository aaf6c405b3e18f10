//! Docker CLI backed host control

use crate::process::{CommandOutput, CommandRunner, HostCommand, ProcessRunner};
use crate::HostControl;
use async_trait::async_trait;
use modhost_config::Config;
use modhost_errors::{Error, HostError, UserFacingError};
use modhost_events::{AppEvent, EventEmitter, EventSender, FailureContext, HostEvent};
use modhost_types::ContainerState;
use std::sync::Arc;

/// Controls one container through the `docker` binary
#[derive(Clone)]
pub struct DockerHost {
    runner: Arc<dyn CommandRunner>,
    docker_bin: String,
    container: String,
    rcon_password: Option<String>,
    tx: Option<EventSender>,
}

impl std::fmt::Debug for DockerHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DockerHost")
            .field("docker_bin", &self.docker_bin)
            .field("container", &self.container)
            .finish_non_exhaustive()
    }
}

impl EventEmitter for DockerHost {
    fn event_sender(&self) -> Option<&EventSender> {
        self.tx.as_ref()
    }
}

impl DockerHost {
    #[must_use]
    pub fn new(container: impl Into<String>) -> Self {
        Self {
            runner: Arc::new(ProcessRunner::default()),
            docker_bin: "docker".to_string(),
            container: container.into(),
            rcon_password: None,
            tx: None,
        }
    }

    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.host.container.clone())
            .with_docker_bin(config.host.docker_bin.clone())
            .with_rcon_password(config.host.rcon_password.clone())
    }

    #[must_use]
    pub fn with_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = runner;
        self
    }

    #[must_use]
    pub fn with_docker_bin(mut self, docker_bin: impl Into<String>) -> Self {
        self.docker_bin = docker_bin.into();
        self
    }

    #[must_use]
    pub fn with_rcon_password(mut self, password: Option<String>) -> Self {
        self.rcon_password = password;
        self
    }

    #[must_use]
    pub fn with_events(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    fn docker(&self) -> HostCommand {
        HostCommand::new(&self.docker_bin)
    }

    /// `rcon-cli` invocation for a console line
    #[must_use]
    pub fn console_argv(&self, line: &str) -> Vec<String> {
        let mut argv = vec!["rcon-cli".to_string()];
        if let Some(password) = &self.rcon_password {
            argv.push("--password".to_string());
            argv.push(password.clone());
        }
        argv.push(line.to_string());
        argv
    }

    async fn lifecycle(&self, action: &str) -> Result<(), Error> {
        self.emit(AppEvent::Host(HostEvent::ActionStarted {
            action: action.to_string(),
            container: self.container.clone(),
        }));

        let result = self
            .runner
            .run(&self.docker().args([action, self.container.as_str()]))
            .await
            .and_then(|out| {
                if out.success() {
                    Ok(())
                } else {
                    Err(HostError::ActionFailed {
                        action: action.to_string(),
                        container: self.container.clone(),
                        message: out.combined(),
                    }
                    .into())
                }
            });

        match &result {
            Ok(()) => self.emit(AppEvent::Host(HostEvent::ActionCompleted {
                action: action.to_string(),
                container: self.container.clone(),
            })),
            Err(e) => self.emit(AppEvent::Host(HostEvent::ActionFailed {
                action: action.to_string(),
                container: self.container.clone(),
                failure: FailureContext::from_error(e),
            })),
        }
        result
    }
}

fn is_missing_container(out: &CommandOutput) -> bool {
    let text = out.combined().to_lowercase();
    text.contains("no such object") || text.contains("no such container")
}

#[async_trait]
impl HostControl for DockerHost {
    fn container(&self) -> &str {
        &self.container
    }

    async fn exec_command(&self, argv: &[String]) -> Result<CommandOutput, Error> {
        let cmd = self
            .docker()
            .args(["exec", self.container.as_str()])
            .args(argv);
        let out = self.runner.run(&cmd).await?;
        if !out.success() && is_missing_container(&out) {
            return Err(HostError::ContainerNotFound {
                container: self.container.clone(),
            }
            .into());
        }
        Ok(out)
    }

    async fn console(&self, line: &str) -> Result<String, Error> {
        let out = self.exec_command(&self.console_argv(line)).await?;
        if out.success() {
            self.emit(AppEvent::Host(HostEvent::CommandSent {
                command: line.to_string(),
            }));
            Ok(out.combined())
        } else {
            let err = HostError::CommandFailed {
                exit_code: out.exit_code,
                output: out.combined(),
            };
            self.emit(AppEvent::Host(HostEvent::CommandRejected {
                command: line.to_string(),
                exit_code: out.exit_code,
                output: err.user_message().into_owned(),
            }));
            Err(err.into())
        }
    }

    async fn status(&self) -> Result<ContainerState, Error> {
        let cmd = self
            .docker()
            .args(["inspect", "-f", "{{.State.Status}}", self.container.as_str()]);
        let out = self.runner.run(&cmd).await?;
        if out.success() {
            Ok(ContainerState::parse(&out.stdout))
        } else if is_missing_container(&out) {
            Ok(ContainerState::NotFound)
        } else {
            Err(HostError::RuntimeUnavailable {
                message: out.combined(),
            }
            .into())
        }
    }

    async fn start(&self) -> Result<(), Error> {
        self.lifecycle("start").await
    }

    async fn stop(&self) -> Result<(), Error> {
        self.lifecycle("stop").await
    }

    async fn restart(&self) -> Result<(), Error> {
        self.lifecycle("restart").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn console_argv_includes_password_when_configured() {
        let host = DockerHost::new("mc").with_rcon_password(Some("pw".into()));
        assert_eq!(
            host.console_argv("say hi"),
            vec!["rcon-cli", "--password", "pw", "say hi"]
        );
        assert_eq!(
            DockerHost::new("mc").console_argv("list"),
            vec!["rcon-cli", "list"]
        );
    }

    #[test]
    fn from_config_reads_host_section() {
        let mut config = Config::default();
        config.host.container = "survival".into();
        config.host.docker_bin = "/usr/local/bin/docker".into();
        let host = DockerHost::from_config(&config);
        assert_eq!(host.container(), "survival");
        assert_eq!(host.docker().program(), "/usr/local/bin/docker");
    }
}
