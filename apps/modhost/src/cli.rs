//! Command line interface definition

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// modhost - mod manager for a containerized Minecraft server
#[derive(Parser)]
#[command(name = "modhost")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Mod manager for a containerized Minecraft server")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Write debug logs to the logs directory
    #[arg(long, global = true)]
    pub debug: bool,

    /// Color output control
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Game version to filter the registry by
    #[arg(long, global = true, value_name = "VERSION")]
    pub game_version: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    Always,
    Auto,
    Never,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Search the registry for server-side mods
    #[command(alias = "find")]
    Search {
        /// Search text; empty lists popular mods
        query: Option<String>,

        /// Sort order: relevance, downloads, follows, newest, updated
        #[arg(long)]
        sort: Option<String>,

        /// Results per page
        #[arg(long)]
        limit: Option<u32>,

        #[arg(long, default_value_t = 0)]
        offset: u32,
    },

    /// Show a registry project and whether it is added
    #[command(alias = "info")]
    Show {
        /// Project id or slug
        project: String,
    },

    /// Add the newest compatible version of a project to the ready list
    Add {
        /// Project id or slug
        project: String,

        /// Do not add required dependencies
        #[arg(long)]
        no_deps: bool,
    },

    /// Install everything in the ready list
    #[command(alias = "i")]
    Install,

    /// Remove a version and the dependencies only it needed
    #[command(alias = "rm")]
    Remove {
        /// Version id
        version: String,

        /// Remove from the ready list instead of the installed list
        #[arg(long)]
        ready: bool,
    },

    /// List installed mods
    #[command(alias = "ls")]
    List {
        /// List the ready list instead
        #[arg(long)]
        ready: bool,
    },

    /// Show where a project is added
    Lookup {
        /// Project id
        project: String,
    },

    /// Send a command to the server console
    Exec {
        /// Console command, e.g. `say hello`
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },

    /// Show console commands sent so far
    History,

    /// Show the server container state
    Status,

    /// Show the settings in server.properties
    ServerConfig {
        /// Only the commonly tuned settings
        #[arg(long)]
        summary: bool,
    },

    /// Show banned IPs, banned players, whitelist and operators
    Players,

    /// Start the server container
    Start,

    /// Warn players, save and stop the server
    Stop,

    /// Warn players, save and restart the server
    Restart,

    /// List artifact backups
    Backups,

    /// Pack installed artifacts into a .tar.gz
    Export {
        /// Destination archive
        output: PathBuf,
    },
}
