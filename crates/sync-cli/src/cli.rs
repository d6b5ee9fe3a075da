//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// composer-sync - Bring composer.json in line with an installed WordPress site
#[derive(Parser, Debug)]
#[command(name = "composer-sync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project root (defaults to the current directory)
    #[arg(long, global = true, env = "COMPOSER_SYNC_ROOT")]
    pub root: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Resolve installed components and update composer.json
    ///
    /// Examples:
    ///   composer-sync sync                 # Interactive run
    ///   composer-sync sync --dry-run       # Show the proposed changes only
    ///   composer-sync sync --offline --yes # No network, no prompts
    Sync(SyncArgs),

    /// Check whether a declared constraint already covers a version
    ///
    /// Examples:
    ///   composer-sync check-constraint '^5.3' 5.5
    ///   composer-sync check-constraint '~5.3.0' 5.5
    CheckConstraint {
        /// Constraint as declared in composer.json
        existing: String,

        /// Version or constraint to compare against
        target: String,
    },
}

/// Options for the sync command
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncArgs {
    /// Composer manifest to update
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Host inventory snapshot (JSON)
    #[arg(long)]
    pub inventory: Option<PathBuf>,

    /// Directory holding pro-plugins.json
    #[arg(long)]
    pub pro_dir: Option<PathBuf>,

    /// Never query the public package index
    #[arg(long)]
    pub offline: bool,

    /// Answer yes to every prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Preview changes without writing them
    #[arg(long)]
    pub dry_run: bool,
}
