//! check-constraint command

use colored::Colorize;
use sync_core::{ConstraintForm, satisfies};

/// Print whether `existing` already covers `target`.
pub fn run_check_constraint(existing: &str, target: &str) {
    let form = ConstraintForm::classify(existing);
    tracing::debug!(?form, "classified constraint");

    if satisfies(existing, target) {
        println!(
            "{} {} already covers {}",
            "OK".green().bold(),
            existing.cyan(),
            target.cyan()
        );
    } else {
        println!(
            "{} {} does not cover {}; it would be replaced",
            "UPDATE".yellow().bold(),
            existing.cyan(),
            target.cyan()
        );
    }
}
