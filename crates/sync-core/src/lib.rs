//! Resolution and merge engine for composer-sync
//!
//! This crate maps what is installed on a WordPress host to Composer
//! packages and merges the result into the project's composer.json:
//!
//! - **Resolver**: an ordered chain of strategies (pro repositories, local
//!   component manifests, the public package index, the core package)
//! - **Constraint checker**: decides whether a declared constraint already
//!   covers the installed version, so satisfied entries are left alone
//! - **Existing matcher**: offers declared packages for components nothing
//!   else could resolve
//! - **Merge and diff**: updates `require` and `repositories` without
//!   touching anything else, and describes the change for confirmation
//!
//! # Architecture
//!
//! ```text
//!                  composer-sync (CLI)
//!                          |
//!                      sync-core
//!                          |
//!                       sync-fs
//! ```
//!
//! Everything with side effects outside the manifest is injected: the host
//! inventory ([`HostInventory`]), the package index ([`PackageIndex`]) and the
//! person answering prompts ([`Operator`]).

pub mod component;
pub mod config;
pub mod constraint;
pub mod engine;
pub mod error;
pub mod existing;
pub mod host;
pub mod index;
pub mod manifest;
pub mod merge;
pub mod operator;
pub mod pro_repo;
pub mod resolver;
pub mod version;

pub use component::{
    ComponentDescriptor, ComponentKind, RepositoryDescriptor, ResolvedPackage, UnresolvedItem,
};
pub use config::{ComponentDirs, SyncConfig};
pub use constraint::{ConstraintForm, satisfies};
pub use engine::{SyncEngine, SyncOutcome, SyncReport};
pub use error::{Error, Result};
pub use existing::{ExistingMatch, find_candidates, match_existing};
pub use host::{HostInventory, Inventory, InventoryFile};
pub use index::{HttpPackageIndex, OfflineIndex, PackageIndex, StaticIndex};
pub use manifest::{ComposerManifest, Section};
pub use merge::{ChangeSet, PendingChanges, RequireChange, diff, merge};
pub use operator::{Operator, ScriptedOperator};
pub use pro_repo::{ProRepoManifest, ProRepoMatch};
pub use resolver::{PackageResolver, ResolutionSession, ResolveStrategy};
pub use version::{constraint_for, to_minor};
