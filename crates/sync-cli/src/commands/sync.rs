//! sync command implementation

use std::path::Path;

use colored::Colorize;
use sync_core::{InventoryFile, SyncConfig, SyncEngine, SyncOutcome};
use sync_fs::NormalizedPath;

use crate::cli::SyncArgs;
use crate::console::{ConsoleOperator, print_changes, print_unresolved};
use crate::error::Result;

/// Merge command-line overrides into the loaded configuration.
fn apply_overrides(config: &mut SyncConfig, args: &SyncArgs) {
    if let Some(manifest) = &args.manifest {
        config.manifest = manifest.to_string_lossy().into_owned();
    }
    if let Some(inventory) = &args.inventory {
        config.wordpress.inventory = inventory.to_string_lossy().into_owned();
    }
    if let Some(dir) = &args.pro_dir {
        config.pro_repositories.dir = Some(dir.to_string_lossy().into_owned());
    }
    if args.offline {
        config.index.enabled = false;
    }
}

/// Run the sync command
///
/// Loads `composer-sync.toml` from `path`, resolves the host inventory and
/// updates composer.json once the operator confirms.
pub fn run_sync(path: &Path, args: &SyncArgs) -> Result<()> {
    let root = NormalizedPath::new(path);
    let mut config = SyncConfig::load(&root)?;
    apply_overrides(&mut config, args);
    tracing::debug!(?config, "effective configuration");

    let engine = SyncEngine::from_config(&config, &root)?;
    let host = InventoryFile::new(config.inventory_path(&root));
    let mut operator = ConsoleOperator::new(args.yes);

    let report = engine.run(&host, &mut operator, args.dry_run)?;

    println!();
    match report.outcome {
        SyncOutcome::UpToDate => {
            println!("composer.json is already up-to-date. No changes needed.");
        }
        SyncOutcome::DryRun => {
            print_changes(&report.changes);
            println!();
            println!("{} Dry run, nothing was written.", "=>".blue().bold());
        }
        SyncOutcome::Declined => {
            println!("Aborted. No changes were made.");
        }
        SyncOutcome::Applied => {
            println!(
                "{}: Successfully updated {}.",
                "Success".green().bold(),
                report.manifest_path
            );
        }
    }

    print_unresolved(&report.unresolved);
    Ok(())
}
