//! Starsync CLI - Command-line interface for Starsync
//!
//! Provides commands for:
//! - Archiving GitHub stars and projecting them to Raindrop.io
//! - Previewing what the next sync would change
//! - Inspecting configuration

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{config::ConfigCommand, diff::DiffCommand, sync::SyncCommand, CommandContext};
use output::OutputFormat;
use starsync_core::config::{Config, LoggingConfig};

#[derive(Debug, Parser)]
#[command(
    name = "starsync",
    version,
    about = "Archive GitHub stars and mirror them to Raindrop.io"
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Archive starred repositories and project changes to Raindrop.io
    Sync(SyncCommand),
    /// Show what changed since the last archived snapshot
    Diff(DiffCommand),
    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Level used when `RUST_LOG` is unset
fn log_filter(verbose: u8, quiet: bool, logging: &LoggingConfig) -> String {
    match (quiet, verbose) {
        (true, _) => "error".to_string(),
        (false, 0) => logging.level.clone(),
        (false, 1) => "debug".to_string(),
        (false, _) => "trace".to_string(),
    }
}

fn init_tracing(cli: &Cli, logging: &LoggingConfig) {
    let filter = log_filter(cli.verbose, cli.quiet, logging);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);

    // Commands report a broken file themselves; logging falls back to defaults
    let logging = Config::load_or_default(&config_path)
        .map(|c| c.logging)
        .unwrap_or_default();
    init_tracing(&cli, &logging);

    let ctx = CommandContext {
        format: if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        },
        quiet: cli.quiet,
        config_path,
    };

    match &cli.command {
        Commands::Sync(cmd) => cmd.execute(&ctx).await,
        Commands::Diff(cmd) => cmd.execute(&ctx).await,
        Commands::Config(cmd) => cmd.execute(&ctx).await,
    }
}
