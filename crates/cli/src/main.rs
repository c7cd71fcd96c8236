//! Jule CLI - jule command

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod cmd;
mod config;
mod logging;
mod output;
mod sample;
mod session;
mod util;

use output::OutputFormat;
use session::Session;

/// Jule - offline timeline explorer for directory snapshots
#[derive(Parser)]
#[command(name = "jule")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// Config file (default: <config dir>/jule/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding snapshot containers
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Directory for cached diff results
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    /// Deployment plugin
    #[arg(long, global = true)]
    plugin: Option<String>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Output format (default: table on a terminal, jsonl otherwise)
    #[arg(long, value_enum, global = true)]
    format: Option<OutputFormat>,

    /// Sort rows by these columns (comma separated)
    #[arg(long, value_delimiter = ',', global = true)]
    order_by: Vec<String>,
}

#[derive(Args)]
struct SelectArgs {
    /// Properties to show (comma separated, `*` for all)
    #[arg(long, value_delimiter = ',')]
    select: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List snapshot containers under the data directory
    Snapshots {
        /// Only snapshots with this label
        #[arg(long)]
        label: Option<String>,
    },
    /// List every entry of a snapshot
    List {
        /// Snapshot file (absolute, or relative to the data directory)
        snapshot: PathBuf,
        #[command(flatten)]
        select: SelectArgs,
    },
    /// Show everyone reporting (directly or not) to matching people
    Subordinates {
        snapshot: PathBuf,
        /// Display-name glob, case-insensitive
        pattern: String,
        /// Do not descend past this distance
        #[arg(long)]
        max_distance: Option<usize>,
        /// Hide rows closer than this distance
        #[arg(long, default_value = "0")]
        min_distance: usize,
        #[command(flatten)]
        select: SelectArgs,
    },
    /// Show the management chain above matching people
    RootPath {
        snapshot: PathBuf,
        /// Display-name glob, case-insensitive
        pattern: String,
        #[command(flatten)]
        select: SelectArgs,
    },
    /// Show entries added or removed between two snapshots
    Diff {
        snapshot: PathBuf,
        baseline: PathBuf,
        #[command(flatten)]
        select: SelectArgs,
    },
    /// Day-by-day arrivals and departures
    Timeline {
        /// Only snapshots with this label
        #[arg(long)]
        label: Option<String>,
    },
    /// Day-by-day property changes
    Changes {
        /// Only snapshots with this label
        #[arg(long)]
        label: Option<String>,
    },
    /// Inspect or clear the diff cache
    #[command(subcommand)]
    Cache(CacheCommands),
    /// Write a series of synthetic daily snapshots
    Sample {
        /// Output directory (default: the data directory)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Number of daily snapshots
        #[arg(long, default_value = "3")]
        days: u32,
        /// RNG seed (random if omitted)
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Show configuration
    #[command(subcommand)]
    Config(ConfigCommands),
    /// List available plugins
    Plugins,
}

#[derive(Subcommand)]
enum CacheCommands {
    /// Entry count and size
    Stats,
    /// Delete every cached result
    Clear,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the config file location
    Path,
    /// Print the effective configuration
    Show {
        /// Print a commented example instead
        #[arg(long)]
        example: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let global = &cli.global;

    let (mut config, config_path) = config::load(global.config.as_deref())?;
    if let Some(data_dir) = &global.data_dir {
        config.data_dir = data_dir.clone();
    }
    if let Some(cache_dir) = &global.cache_dir {
        config.cache_dir = cache_dir.clone();
    }
    if let Some(plugin) = &global.plugin {
        config.plugin = plugin.clone();
    }
    config.validate().context("Invalid configuration")?;

    let log_guard = logging::init(global.verbose, &config.log_level, global.log_file.as_deref())?;
    tracing::debug!(config = ?config_path, data_dir = %config.data_dir.display(), "Configuration loaded");

    let session = Session::new(
        config,
        config_path,
        global.format,
        global.order_by.clone(),
        log_guard.dispatch().clone(),
    )?;

    let result = run(cli.command, &session).await;
    if let Err(err) = &result {
        tracing::error!(error = %format!("{err:#}"), "Command failed");
    }
    drop(log_guard);
    result
}

async fn run(command: Commands, session: &Session) -> Result<()> {
    match command {
        Commands::Snapshots { label } => cmd::snapshots::run(session, label).await,
        Commands::List { snapshot, select } => cmd::query::list(session, &snapshot, &select.select).await,
        Commands::Subordinates { snapshot, pattern, max_distance, min_distance, select } => {
            cmd::query::subordinates(session, &snapshot, &pattern, max_distance, min_distance, &select.select).await
        }
        Commands::RootPath { snapshot, pattern, select } => {
            cmd::query::root_path(session, &snapshot, &pattern, &select.select).await
        }
        Commands::Diff { snapshot, baseline, select } => {
            cmd::diff::run(session, &snapshot, &baseline, &select.select).await
        }
        Commands::Timeline { label } => cmd::timeline::run(session, cmd::timeline::Kind::Membership, label).await,
        Commands::Changes { label } => cmd::timeline::run(session, cmd::timeline::Kind::Changes, label).await,
        Commands::Cache(cache_cmd) => match cache_cmd {
            CacheCommands::Stats => cmd::cache::stats(session).await,
            CacheCommands::Clear => cmd::cache::clear(session).await,
        },
        Commands::Sample { out, days, seed } => cmd::sample::run(session, out, days, seed).await,
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Path => cmd::config::run_path(session).await,
            ConfigCommands::Show { example } => cmd::config::run_show(session, example).await,
        },
        Commands::Plugins => cmd::plugins::run(session).await,
    }
}
