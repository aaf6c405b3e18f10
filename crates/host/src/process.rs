//! External command execution

use async_trait::async_trait;
use modhost_errors::{Error, HostError};
use std::time::Duration;
use tokio::process::Command;

/// Program plus arguments to run on the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostCommand {
    program: String,
    args: Vec<String>,
}

impl HostCommand {
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Add an argument to the command
    #[must_use]
    pub fn arg(mut self, arg: impl AsRef<str>) -> Self {
        self.args.push(arg.as_ref().to_string());
        self
    }

    /// Add multiple arguments to the command
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_string()));
        self
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[must_use]
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Full argv, program first
    #[must_use]
    pub fn argv(&self) -> Vec<String> {
        std::iter::once(self.program.clone())
            .chain(self.args.iter().cloned())
            .collect()
    }
}

/// Exit status and captured output of a finished command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// -1 when the process was killed by a signal
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Stdout followed by stderr, trimmed
    #[must_use]
    pub fn combined(&self) -> String {
        let stdout = self.stdout.trim();
        let stderr = self.stderr.trim();
        match (stdout.is_empty(), stderr.is_empty()) {
            (_, true) => stdout.to_string(),
            (true, false) => stderr.to_string(),
            (false, false) => format!("{stdout}\n{stderr}"),
        }
    }
}

/// Runs host commands
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run to completion and capture output. A non-zero exit is not an error
    /// at this level.
    async fn run(&self, cmd: &HostCommand) -> Result<CommandOutput, Error>;
}

/// [`CommandRunner`] backed by `tokio::process`
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    timeout: Duration,
}

impl ProcessRunner {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new(crate::DEFAULT_COMMAND_TIMEOUT)
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, cmd: &HostCommand) -> Result<CommandOutput, Error> {
        let mut command = Command::new(cmd.program());
        command.args(cmd.get_args()).kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| HostError::RuntimeUnavailable {
                message: format!(
                    "{} did not finish within {}s",
                    cmd.program(),
                    self.timeout.as_secs()
                ),
            })?
            .map_err(|e| HostError::RuntimeUnavailable {
                message: format!("failed to run {}: {e}", cmd.program()),
            })?;

        Ok(CommandOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argv_starts_with_program() {
        let cmd = HostCommand::new("docker")
            .arg("exec")
            .args(["mc", "rcon-cli", "list"]);
        assert_eq!(cmd.argv(), vec!["docker", "exec", "mc", "rcon-cli", "list"]);
    }

    #[test]
    fn combined_output_skips_empty_streams() {
        let out = CommandOutput {
            exit_code: 0,
            stdout: "hello\n".into(),
            stderr: String::new(),
        };
        assert_eq!(out.combined(), "hello");

        let out = CommandOutput {
            exit_code: 1,
            stdout: " ".into(),
            stderr: "boom".into(),
        };
        assert_eq!(out.combined(), "boom");
    }

    #[tokio::test]
    async fn missing_program_is_runtime_unavailable() {
        let err = ProcessRunner::default()
            .run(&HostCommand::new("modhost-definitely-not-a-binary"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Host(HostError::RuntimeUnavailable { .. })
        ));
    }
}
