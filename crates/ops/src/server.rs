//! Server console and lifecycle operations

use crate::{CommandReply, OpsCtx, ServerAction};
use modhost_errors::{Error, OpsError};
use modhost_events::{AppEvent, EventEmitter, HostEvent};
use modhost_types::{CommandRecord, ContainerState};
use std::time::Duration;

/// Send a line to the server console
///
/// Only commands the console accepts are recorded in the audit trail.
///
/// # Errors
///
/// Returns `CommandFailed` if the console rejects the command, an error if
/// the container cannot be reached, or a storage error if the audit trail
/// cannot be saved.
pub async fn send_command(ctx: &OpsCtx, command: &str) -> Result<CommandReply, Error> {
    let command = command.trim();
    if command.is_empty() {
        return Err(OpsError::InvalidOperation {
            operation: "empty console command".to_string(),
        }
        .into());
    }

    let output = ctx.host.console(command).await?;
    ctx.commands.append(CommandRecord::now(command)).await?;
    let history = ctx.commands.history().await;
    Ok(CommandReply { output, history })
}

pub async fn command_history(ctx: &OpsCtx) -> Vec<CommandRecord> {
    ctx.commands.history().await
}

/// # Errors
///
/// Returns an error if the container runtime cannot be queried.
pub async fn server_status(ctx: &OpsCtx) -> Result<ContainerState, Error> {
    ctx.host.status().await
}

/// # Errors
///
/// Returns `ActionFailed` if the container cannot be started.
pub async fn start_server(ctx: &OpsCtx) -> Result<(), Error> {
    ctx.host.start().await
}

/// Warn players, save the world and stop the container
///
/// # Errors
///
/// Returns `ActionFailed` if the container cannot be stopped. Failed
/// announcements are reported as warnings only.
pub async fn stop_server(ctx: &OpsCtx) -> Result<(), Error> {
    graceful(ctx, ServerAction::Stop).await
}

/// Warn players, save the world and restart the container
///
/// # Errors
///
/// Returns `ActionFailed` if the container cannot be restarted.
pub async fn restart_server(ctx: &OpsCtx) -> Result<(), Error> {
    graceful(ctx, ServerAction::Restart).await
}

async fn graceful(ctx: &OpsCtx, action: ServerAction) -> Result<(), Error> {
    let running = match ctx.host.status().await {
        Ok(state) => state.is_running(),
        Err(e) => {
            ctx.emit_warning_with_context("could not query server status", e.to_string());
            false
        }
    };

    if running {
        let [first, second, last] = ctx.config.host.announce_delays;
        let verb = action.announce_verb();
        announce(ctx, &format!("say Server {verb} in 15 seconds")).await;
        tokio::time::sleep(Duration::from_secs(first)).await;
        announce(ctx, &format!("say Server {verb} in 5 seconds")).await;
        tokio::time::sleep(Duration::from_secs(second)).await;
        announce(ctx, "save-all").await;
        tokio::time::sleep(Duration::from_secs(last)).await;
    }

    match action {
        ServerAction::Start => ctx.host.start().await,
        ServerAction::Stop => ctx.host.stop().await,
        ServerAction::Restart => ctx.host.restart().await,
    }
}

async fn announce(ctx: &OpsCtx, line: &str) {
    match ctx.host.console(line).await {
        Ok(_) => ctx.emit(AppEvent::Host(HostEvent::Announcement {
            container: ctx.host.container().to_string(),
            message: line.to_string(),
        })),
        Err(e) => {
            ctx.emit_warning_with_context(format!("announcement failed: {line}"), e.to_string());
        }
    }
}
