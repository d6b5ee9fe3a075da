//! Command implementations for sync-cli

pub mod check;
pub mod sync;

pub use check::run_check_constraint;
pub use sync::run_sync;
