//! composer-sync CLI
//!
//! Resolves the components installed on a WordPress host to Composer
//! packages and updates composer.json after confirmation.

mod cli;
mod commands;
mod console;
mod error;

use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::{Cli, Commands};
use error::{CliError, Result};

/// Environment variable holding a tracing filter, e.g. `sync_core=debug`.
const LOG_ENV: &str = "COMPOSER_SYNC_LOG";

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose)?;

    match cli.command {
        Some(cmd) => execute_command(cmd, cli.root),
        None => {
            println!("{} Composer/WordPress sync", "composer-sync".green().bold());
            println!();
            println!("Run {} for available commands.", "composer-sync --help".cyan());
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) -> Result<()> {
    let filter = match EnvFilter::try_from_env(LOG_ENV) {
        Ok(filter) => filter,
        Err(_) if verbose => EnvFilter::new("debug"),
        Err(_) => return Ok(()),
    };

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| CliError::user(format!("Failed to set tracing subscriber: {e}")))?;
    tracing::debug!("Verbose mode enabled");
    Ok(())
}

fn execute_command(cmd: Commands, root: Option<PathBuf>) -> Result<()> {
    match cmd {
        Commands::Sync(args) => {
            let root = match root {
                Some(root) => root,
                None => std::env::current_dir()?,
            };
            commands::run_sync(&root, &args)
        }
        Commands::CheckConstraint { existing, target } => {
            commands::run_check_constraint(&existing, &target);
            Ok(())
        }
    }
}
