#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Control of the container running the managed server
//!
//! Everything goes through the container runtime's CLI. Console lines are
//! delivered with `rcon-cli` inside the container.

mod docker;
mod process;

pub use docker::DockerHost;
pub use process::{CommandOutput, CommandRunner, HostCommand, ProcessRunner};

use async_trait::async_trait;
use modhost_errors::Error;
use modhost_types::ContainerState;
use std::time::Duration;

/// Bound on a single runtime CLI call; `docker stop` waits for the server
/// to save, so this is generous
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(120);

/// Host operations the rest of modhost relies on
#[async_trait]
pub trait HostControl: Send + Sync {
    /// Name of the controlled container
    fn container(&self) -> &str;

    /// Run `argv` inside the container
    ///
    /// # Errors
    ///
    /// Returns `ContainerNotFound` if the container does not exist, or
    /// `RuntimeUnavailable` if the runtime CLI cannot be run. A non-zero exit
    /// inside the container is returned as output, not as an error.
    async fn exec_command(&self, argv: &[String]) -> Result<CommandOutput, Error>;

    /// Send one line to the server console and return its reply
    ///
    /// # Errors
    ///
    /// Returns `CommandFailed` when the console tool exits non-zero, plus the
    /// errors of [`HostControl::exec_command`].
    async fn console(&self, line: &str) -> Result<String, Error>;

    /// # Errors
    ///
    /// Returns `RuntimeUnavailable` if the runtime cannot be queried. A
    /// missing container is [`ContainerState::NotFound`], not an error.
    async fn status(&self) -> Result<ContainerState, Error>;

    /// # Errors
    ///
    /// Returns `ActionFailed` if the runtime rejects the action.
    async fn start(&self) -> Result<(), Error>;

    /// # Errors
    ///
    /// Returns `ActionFailed` if the runtime rejects the action.
    async fn stop(&self) -> Result<(), Error>;

    /// # Errors
    ///
    /// Returns `ActionFailed` if the runtime rejects the action.
    async fn restart(&self) -> Result<(), Error>;
}
