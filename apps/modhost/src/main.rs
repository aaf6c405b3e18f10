//! modhost - mod manager for a containerized Minecraft server
//!
//! This is the main CLI application that drives every operation through the
//! ops crate.

mod cli;
mod display;
mod error;
mod events;
mod logging;
mod setup;

use crate::cli::{Cli, ColorChoice, Commands, GlobalArgs};
use crate::display::OutputRenderer;
use crate::error::CliError;
use crate::events::EventHandler;
use crate::setup::SystemSetup;
use clap::Parser;
use modhost_config::Config;
use modhost_events::EventReceiver;
use modhost_ops::{OperationResult, OpsContextBuilder, OpsCtx};
use std::future::Future;
use std::path::Path;
use std::process;
use tokio::select;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    // Config decides where logs go, so load it before tracing is up
    let config = match load_config(&cli.global).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    init_tracing(json_mode, cli.global.debug, &config.logs_path());

    match run(cli, config).await {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            error!("Application error: {}", e);
            if json_mode {
                let code = e.code().unwrap_or("cli.error");
                let body = serde_json::json!({
                    "type": "Error",
                    "data": { "code": code, "message": e.to_string() }
                });
                println!("{body}");
            } else {
                eprintln!("Error: {e}");
            }
            process::exit(1);
        }
    }
}

/// Main application logic. Returns whether the result counts as success.
async fn run(cli: Cli, config: Config) -> Result<bool, CliError> {
    info!("Starting modhost v{}", env!("CARGO_PKG_VERSION"));

    let setup = SystemSetup::initialize(config.clone()).await?;

    let (event_sender, mut event_receiver) = modhost_events::channel();

    let ops_ctx = OpsContextBuilder::new()
        .with_store(setup.store())
        .with_registry(setup.registry())
        .with_fetcher(setup.downloads())
        .with_host(setup.host(event_sender.clone()))
        .with_event_sender(event_sender)
        .with_config(config)
        .build()?;

    apply_color_choice(cli.global.color);
    let renderer = OutputRenderer::new(cli.global.json, cli.global.color);
    let colors_enabled = match cli.global.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => console::Term::stderr().features().colors_supported(),
    };
    let mut event_handler = EventHandler::new(colors_enabled, cli.global.debug, cli.global.json);

    let result = with_events(
        execute_command(cli.command, &ops_ctx),
        &mut event_receiver,
        &mut event_handler,
    )
    .await?;

    renderer.render_result(&result)?;

    // A removal leaves a server restart running; exiting would cancel it
    with_events(
        ops_ctx.wait_background(),
        &mut event_receiver,
        &mut event_handler,
    )
    .await;

    info!("Command completed");
    Ok(result.is_success())
}

/// Defaults, then the config file, then environment, then CLI flags
async fn load_config(global: &GlobalArgs) -> Result<Config, CliError> {
    let mut config = Config::load_or_default(global.config.as_deref()).await?;
    config.merge_env()?;

    if let Some(version) = &global.game_version {
        if version.trim().is_empty() {
            return Err(CliError::InvalidArguments(
                "--game-version must not be empty".to_string(),
            ));
        }
        config.registry.game_version.clone_from(version);
    }

    Ok(config)
}

/// Drive `work` to completion while forwarding events to the handler
async fn with_events<F, T>(
    work: F,
    event_receiver: &mut EventReceiver,
    event_handler: &mut EventHandler,
) -> T
where
    F: Future<Output = T>,
{
    let mut work = Box::pin(work);

    loop {
        select! {
            result = &mut work => {
                // Drain whatever was emitted right before completion
                while let Ok(event) = event_receiver.try_recv() {
                    event_handler.handle_event(event);
                }
                return result;
            }

            event = event_receiver.recv() => {
                if let Some(event) = event {
                    event_handler.handle_event(event);
                }
            }
        }
    }
}

/// Execute the specified command
async fn execute_command(command: Commands, ctx: &OpsCtx) -> Result<OperationResult, CliError> {
    match command {
        Commands::Search {
            query,
            sort,
            limit,
            offset,
        } => {
            let page =
                modhost_ops::search(ctx, query.as_deref(), sort.as_deref(), limit, offset).await?;
            Ok(OperationResult::SearchResults(page))
        }

        Commands::Show { project } => {
            let view = modhost_ops::project_details(ctx, &project).await?;
            Ok(OperationResult::Project(Box::new(view)))
        }

        Commands::Add { project, no_deps } => {
            let report = modhost_ops::add_project(ctx, &project, !no_deps).await?;
            Ok(OperationResult::Staged(report))
        }

        Commands::Install => {
            let outcome = modhost_ops::install_ready(ctx).await?;
            Ok(OperationResult::Install(outcome))
        }

        Commands::Remove { version, ready } => {
            let report = if ready {
                modhost_ops::remove_ready(ctx, &version).await?
            } else {
                modhost_ops::remove_installed(ctx, &version).await?
            };
            Ok(OperationResult::Removal(report))
        }

        Commands::List { ready } => {
            let records = if ready {
                modhost_ops::list_ready(ctx).await
            } else {
                modhost_ops::list_installed(ctx).await
            };
            Ok(OperationResult::PackageList(records))
        }

        Commands::Lookup { project } => {
            let lookup = modhost_ops::lookup_by_project(ctx, &project).await?;
            Ok(OperationResult::Lookup(lookup))
        }

        Commands::Exec { command } => {
            let reply = modhost_ops::send_command(ctx, &command.join(" ")).await?;
            Ok(OperationResult::Command(reply))
        }

        Commands::History => Ok(OperationResult::CommandHistory(
            modhost_ops::command_history(ctx).await,
        )),

        Commands::Status => {
            let state = modhost_ops::server_status(ctx).await?;
            Ok(OperationResult::ServerStatus(state))
        }

        Commands::ServerConfig { summary } => {
            if summary {
                let settings = modhost_ops::server_config_summary(ctx).await?;
                Ok(OperationResult::ServerConfigSummary(settings))
            } else {
                let settings = modhost_ops::server_config(ctx).await?;
                Ok(OperationResult::ServerConfig(settings))
            }
        }

        Commands::Players => Ok(OperationResult::Players(
            modhost_ops::players_data(ctx).await?,
        )),

        Commands::Start => {
            modhost_ops::start_server(ctx).await?;
            Ok(OperationResult::Success("Server started".to_string()))
        }

        Commands::Stop => {
            modhost_ops::stop_server(ctx).await?;
            Ok(OperationResult::Success("Server stopped".to_string()))
        }

        Commands::Restart => {
            modhost_ops::restart_server(ctx).await?;
            Ok(OperationResult::Success("Server restarted".to_string()))
        }

        Commands::Backups => {
            let backups = modhost_ops::list_backups(ctx).await?;
            Ok(OperationResult::Backups(backups))
        }

        Commands::Export { output } => {
            let report = modhost_ops::export_artifacts(ctx, &output).await?;
            Ok(OperationResult::Export(report))
        }
    }
}

fn apply_color_choice(choice: ColorChoice) {
    match choice {
        ColorChoice::Always => {
            console::set_colors_enabled(true);
            console::set_colors_enabled_stderr(true);
        }
        ColorChoice::Never => {
            console::set_colors_enabled(false);
            console::set_colors_enabled_stderr(false);
        }
        ColorChoice::Auto => {}
    }
}

/// Initialize tracing/logging
fn init_tracing(json_mode: bool, debug_enabled_flag: bool, log_dir: &Path) {
    let debug_enabled = std::env::var("RUST_LOG").is_ok() || debug_enabled_flag;
    let file_filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::new("info,modhost=debug,modhost_ops=info")
        })
    };

    if debug_enabled {
        // Debug mode: structured JSON logs to file
        if let Err(e) = std::fs::create_dir_all(log_dir) {
            if !json_mode {
                eprintln!("Warning: Failed to create log directory: {e}");
            }
        }

        let log_file = log_dir.join(format!(
            "modhost-{}.log",
            chrono::Utc::now().format("%Y%m%d-%H%M%S")
        ));

        match std::fs::File::create(&log_file) {
            Ok(file) => {
                tracing_subscriber::fmt()
                    .json()
                    .with_writer(file)
                    .with_env_filter(file_filter())
                    .init();

                if !json_mode {
                    eprintln!("Debug logging enabled: {}", log_file.display());
                }
                return;
            }
            Err(e) => {
                if !json_mode {
                    eprintln!("Warning: Failed to create log file: {e}");
                }
            }
        }
    }

    if json_mode {
        // Keep stdout and stderr clean for machine-readable output
        tracing_subscriber::fmt()
            .with_writer(std::io::sink)
            .with_env_filter("off")
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new("warn,modhost=warn,modhost_ops=warn")
                }),
            )
            .init();
    }
}
