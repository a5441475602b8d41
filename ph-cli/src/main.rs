//! pihole-keeper CLI - back up and refresh Pi-hole appliances.
//!
//! For every configured appliance: log in, download the teleporter export,
//! trigger a gravity update, and log out. Additional commands read status,
//! toggle blocking, and dump configuration.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::instrument::WithSubscriber;
use tracing::info;

use ph_core::config::AppConfig;
use ph_core::constants::{self, env};
use ph_core::error::PhResult;
use ph_core::logging::Logger;

/// pihole-keeper - teleporter backups and gravity updates for Pi-hole.
#[derive(Parser)]
#[command(
    name = "pihole-keeper",
    version,
    about = "Back up and refresh Pi-hole appliances",
    long_about = "Logs in to each configured Pi-hole, saves a teleporter backup, \
                  triggers a gravity update and logs out again.\n\
                  A failing host never stops the others."
)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Web interface password.
    #[arg(long, env = env::PASSWORD, hide_env_values = true, global = true)]
    password: Option<String>,

    /// Comma-separated IPv4 addresses of the appliances.
    #[arg(long, env = env::IP_LIST, global = true)]
    hosts: Option<String>,

    /// Directory receiving backups [default: backup].
    #[arg(long, env = env::PATH_TO_BACKUP, global = true)]
    backup_dir: Option<String>,

    /// Directory of the log file [default: working directory].
    #[arg(long, env = env::BASE_DIR, global = true)]
    log_dir: Option<PathBuf>,

    /// Verify appliance TLS certificates.
    #[arg(long, global = true)]
    verify_tls: bool,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json).
    #[arg(short = 'f', long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output for scripting.
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Save a teleporter backup and run a gravity update on every host (default).
    Run,
    /// Show version and blocking state of every host.
    Status,
    /// Enable or disable DNS blocking on every host.
    Blocking {
        #[command(subcommand)]
        action: commands::blocking::BlockingAction,
    },
    /// Print the configuration of every host as JSON.
    Config,
}

#[tokio::main]
async fn main() -> PhResult<()> {
    let cli = Cli::parse();

    let mut config = match cli.config.as_deref() {
        Some(path) => AppConfig::load_from_file(path)?,
        None => AppConfig::default(),
    };
    // An empty PATH_TO_BACKUP means "use the default"
    let backup_dir = cli.backup_dir.filter(|d| !d.is_empty());
    config
        .appliance
        .apply_overrides(cli.password, cli.hosts, backup_dir);
    if cli.verify_tls {
        config.api.verify_tls = true;
    }

    let log_level = if cli.verbose {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };
    let log_dir = match cli.log_dir {
        Some(dir) => dir,
        None => config.effective_log_dir()?,
    };
    let logger = Logger::init(&log_level, &log_dir, config.logging.json_output)?;

    let format = cli.format;
    let command = cli.command.unwrap_or(Commands::Run);

    async move {
        info!("{} v{}", constants::APP_NAME, constants::APP_VERSION);
        match command {
            Commands::Run => commands::run::run(&config, format).await,
            Commands::Status => commands::status::run(&config, format).await,
            Commands::Blocking { action } => commands::blocking::run(&config, action, format).await,
            Commands::Config => commands::config::run(&config, format).await,
        }
    }
    .with_subscriber(logger.dispatch().clone())
    .await
}
