//! CLI entry and dispatch.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use blocknav_core::config::Config;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "blocknav")]
#[command(version = "0.1")]
#[command(about = "Keyboard navigation for block toolbox flyouts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Replay a key sequence against a toolbox and print the selection trace
    Replay {
        /// Toolbox file (TOML with [[category]] tables)
        #[arg(long, value_name = "FILE")]
        toolbox: PathBuf,

        /// Comma-separated key names (e.g. right,down,down,left)
        #[arg(long, value_name = "KEYS", value_delimiter = ',', required = true)]
        keys: Vec<String>,

        /// Print one JSON object per key
        #[arg(long)]
        json: bool,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
pub(crate) enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Print the default config
    Generate,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Replay {
            toolbox,
            keys,
            json,
        } => {
            let config = Config::load().context("load config")?;
            init_logging(&config.log_filter);
            commands::replay::run(&commands::replay::ReplayOptions {
                toolbox: &toolbox,
                keys: &keys,
                json,
                config: &config,
            })
        }
        // Runs without loading the config so a broken file can be inspected.
        Commands::Config { command } => {
            init_logging(Config::DEFAULT_LOG_FILTER);
            commands::config::run(&command)
        }
    }
}

/// Logs to stderr; `RUST_LOG` overrides the configured filter.
fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}
