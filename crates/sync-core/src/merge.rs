//! Merging resolved packages into composer.json
//!
//! Merge rules:
//!
//! - A package already in `require-dev` is left alone; it is never copied
//!   into `require`.
//! - A package already in `require` keeps its constraint unless the
//!   constraint checker says it does not cover the new one. Packages the
//!   operator confirmed by hand always take the new constraint.
//! - New packages are appended to `require`.
//! - Repositories are keyed by url. An existing entry is never replaced, and
//!   within one run the first descriptor seen for a url wins.

use std::fmt;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::component::{RepositoryDescriptor, ResolvedPackage};
use crate::constraint::satisfies;
use crate::error::Result;
use crate::manifest::{ComposerManifest, Section};

/// How a pending requirement was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequireOrigin {
    /// Found by the resolver strategy chain
    Resolved,
    /// Matched against an existing entry and confirmed by the operator
    Confirmed,
}

/// A requirement waiting to be merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequire {
    pub constraint: String,
    pub origin: RequireOrigin,
}

/// Everything collected during a run, before it touches the manifest.
#[derive(Debug, Clone, Default)]
pub struct PendingChanges {
    requires: IndexMap<String, PendingRequire>,
    repositories: IndexMap<String, RepositoryDescriptor>,
}

impl PendingChanges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a resolved package and its repository, if any.
    ///
    /// A later resolution of the same package replaces the earlier
    /// constraint; repositories keep the first descriptor per url.
    pub fn add_resolved(&mut self, resolved: ResolvedPackage) {
        self.requires.insert(
            resolved.package,
            PendingRequire {
                constraint: resolved.constraint,
                origin: RequireOrigin::Resolved,
            },
        );
        if let Some(repository) = resolved.repository {
            self.add_repository(repository);
        }
    }

    /// Record a package the operator confirmed by hand.
    pub fn add_confirmed(&mut self, package: impl Into<String>, constraint: impl Into<String>) {
        self.requires.insert(
            package.into(),
            PendingRequire {
                constraint: constraint.into(),
                origin: RequireOrigin::Confirmed,
            },
        );
    }

    /// Record a repository unless one with the same url is already pending.
    pub fn add_repository(&mut self, repository: RepositoryDescriptor) {
        self.repositories
            .entry(repository.url.clone())
            .or_insert(repository);
    }

    pub fn requires(&self) -> impl Iterator<Item = (&str, &PendingRequire)> {
        self.requires.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn repositories(&self) -> impl Iterator<Item = &RepositoryDescriptor> {
        self.repositories.values()
    }

    pub fn is_empty(&self) -> bool {
        self.requires.is_empty() && self.repositories.is_empty()
    }

    fn origin_of(&self, package: &str) -> Option<RequireOrigin> {
        self.requires.get(package).map(|pending| pending.origin)
    }
}

/// Apply pending changes to a copy of `original`.
pub fn merge(original: &ComposerManifest, pending: &PendingChanges) -> Result<ComposerManifest> {
    let mut merged = original.clone();

    let mut require: Map<String, Value> = original
        .section(Section::Require)
        .cloned()
        .unwrap_or_default();

    for (package, wanted) in pending.requires() {
        if original.declares(Section::RequireDev, package) {
            tracing::debug!(package, "already in require-dev, skipping");
            continue;
        }

        let keep_existing = match require.get(package) {
            None => false,
            Some(_) if wanted.origin == RequireOrigin::Confirmed => false,
            // A non-string constraint is something we cannot judge
            Some(existing) => existing
                .as_str()
                .is_none_or(|existing| satisfies(existing, &wanted.constraint)),
        };

        if !keep_existing {
            require.insert(package.to_string(), Value::String(wanted.constraint.clone()));
        }
    }

    if original.section(Section::Require).is_some() || !require.is_empty() {
        merged.set_section(Section::Require, require);
    }

    let existing_urls = original.repository_urls();
    let new_repositories: Vec<RepositoryDescriptor> = pending
        .repositories()
        .filter(|repo| !existing_urls.contains(&repo.url.as_str()))
        .cloned()
        .collect();
    merged.append_repositories(&new_repositories)?;

    Ok(merged)
}

/// One requirement line of the proposed change set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequireChange {
    Add {
        package: String,
        constraint: String,
    },
    Modify {
        package: String,
        from: String,
        to: String,
    },
}

impl fmt::Display for RequireChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add {
                package,
                constraint,
            } => write!(f, "ADD:    {package}: {constraint}"),
            Self::Modify { package, from, to } => write!(f, "MODIFY: {package}: {from} -> {to}"),
        }
    }
}

/// What the operator is asked to approve.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub requires: Vec<RequireChange>,
    /// Urls of repositories that will be added
    pub repositories: Vec<String>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.requires.is_empty() && self.repositories.is_empty()
    }

    /// Repository lines in display form.
    pub fn repository_lines(&self) -> Vec<String> {
        self.repositories
            .iter()
            .map(|url| format!("ADD:    Repository at {url}"))
            .collect()
    }
}

/// Compare the merged manifest with the original for display.
///
/// A constraint that changed but is still covered by the original one is not
/// reported, unless the operator confirmed that package by hand.
pub fn diff(
    original: &ComposerManifest,
    merged: &ComposerManifest,
    pending: &PendingChanges,
) -> ChangeSet {
    let mut changes = ChangeSet::default();

    for (package, value) in merged.section(Section::Require).into_iter().flatten() {
        let new_constraint = value_text(value);
        let Some(old) = original
            .section(Section::Require)
            .and_then(|require| require.get(package))
        else {
            changes.requires.push(RequireChange::Add {
                package: package.clone(),
                constraint: new_constraint,
            });
            continue;
        };

        if old == value {
            continue;
        }
        let old_constraint = value_text(old);
        let confirmed = pending.origin_of(package) == Some(RequireOrigin::Confirmed);
        if confirmed || !satisfies(&old_constraint, &new_constraint) {
            changes.requires.push(RequireChange::Modify {
                package: package.clone(),
                from: old_constraint,
                to: new_constraint,
            });
        }
    }

    let original_urls = original.repository_urls();
    changes.repositories = merged
        .repository_urls()
        .into_iter()
        .filter(|url| !original_urls.contains(url))
        .map(str::to_string)
        .collect();

    changes
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
