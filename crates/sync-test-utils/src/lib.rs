//! Shared test utilities for the composer-sync workspace.
//!
//! This crate provides throwaway WordPress/Composer projects so that crate
//! test suites do not each build their own. It is a dev-dependency only.
//!
//! # Modules
//!
//! - [`project`] — [`TestProject`](project::TestProject) on-disk fixture
//! - [`inventory`] — [`InventoryBuilder`](inventory::InventoryBuilder) for host snapshots

pub mod inventory;
pub mod project;

pub use inventory::InventoryBuilder;
pub use project::TestProject;
