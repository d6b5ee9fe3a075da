//! Terminal implementation of the engine's operator
//!
//! Prompts use dialoguer and default to "no". When stdin is not a terminal
//! the default answer is taken without prompting.

use std::io::IsTerminal;

use colored::Colorize;
use dialoguer::Confirm;
use sync_core::{ChangeSet, ExistingMatch, Operator, UnresolvedItem};

/// Prints progress and asks the person at the terminal.
pub struct ConsoleOperator {
    assume_yes: bool,
    interactive: bool,
}

impl ConsoleOperator {
    pub fn new(assume_yes: bool) -> Self {
        Self {
            assume_yes,
            interactive: std::io::stdin().is_terminal(),
        }
    }

    fn ask(&self, prompt: &str) -> sync_core::Result<bool> {
        if self.assume_yes {
            return Ok(true);
        }
        if !self.interactive {
            println!("{prompt} [y/N] {}", "(no terminal, assuming no)".dimmed());
            return Ok(false);
        }
        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(sync_core::Error::prompt)
    }
}

impl Operator for ConsoleOperator {
    fn progress(&mut self, message: &str) {
        println!("{} {}", "=>".blue().bold(), message);
    }

    fn confirm_match(&mut self, candidate: &ExistingMatch) -> sync_core::Result<bool> {
        let item = &candidate.item;
        println!();
        println!("{}", "Potential match found:".yellow().bold());
        println!("  {}: {} (v{})", item.kind, item.name, item.version);
        println!("  Package: {}", candidate.package.cyan());
        if item.single_file {
            println!("  {}", "Note: This is a single-file MU-plugin".red());
        }
        self.ask("Use this package?")
    }

    fn confirm_changes(&mut self, changes: &ChangeSet) -> sync_core::Result<bool> {
        print_changes(changes);
        println!();
        self.ask("Apply these changes to composer.json?")
    }
}

/// Print the proposed change set.
pub fn print_changes(changes: &ChangeSet) {
    println!();
    println!("The following changes are proposed for composer.json:");
    if !changes.requires.is_empty() {
        println!("{}", "--- Requirements ---".yellow());
        for change in &changes.requires {
            println!("{change}");
        }
    }
    let repositories = changes.repository_lines();
    if !repositories.is_empty() {
        println!("{}", "--- Repositories ---".yellow());
        for line in repositories {
            println!("{line}");
        }
    }
}

/// Print the unresolved components as a name/version/type/slug table.
pub fn print_unresolved(items: &[UnresolvedItem]) {
    if items.is_empty() {
        return;
    }

    println!();
    println!(
        "{}: The following items could not be resolved and were omitted:",
        "Warning".yellow().bold()
    );

    let rows: Vec<[&str; 4]> = items
        .iter()
        .map(|item| [item.name.as_str(), item.version.as_str(), item.kind.as_str(), item.slug.as_str()])
        .collect();
    for line in format_table(["name", "version", "type", "slug"], &rows) {
        println!("{line}");
    }
}

/// Lay out rows in left-aligned columns separated by two spaces.
fn format_table(header: [&str; 4], rows: &[[&str; 4]]) -> Vec<String> {
    let mut widths = header.map(str::len);
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render = |cells: &[&str; 4]| {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![render(&header)];
    lines.push(
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("  "),
    );
    lines.extend(rows.iter().map(render));
    lines
}
