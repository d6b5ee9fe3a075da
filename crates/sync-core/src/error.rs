//! Error types for sync-core

use std::path::PathBuf;

/// Result type for sync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sync-core operations
///
/// Only failures that must stop a run live here. A component that cannot be
/// resolved is not an error; it ends up in the unresolved list instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The composer manifest does not exist
    #[error("{path} not found. Please run 'composer init' first.")]
    ManifestNotFound { path: PathBuf },

    /// The composer manifest is not valid JSON
    #[error("Unable to parse existing {path}: {message}. Aborting.")]
    ManifestParse { path: PathBuf, message: String },

    /// The composer manifest parsed but is not a JSON object
    #[error("{path} must contain a JSON object at the top level")]
    ManifestShape { path: PathBuf },

    /// The host inventory snapshot could not be read or parsed
    #[error("Failed to load host inventory from {path}: {message}")]
    Inventory { path: PathBuf, message: String },

    /// The composer-sync.toml configuration is invalid
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// The HTTP client for the package index could not be built
    #[error("Failed to initialise package index client: {message}")]
    HttpClient { message: String },

    /// An interactive prompt failed (closed stdin, no terminal)
    #[error("Interactive prompt error: {message}")]
    Prompt { message: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from sync-fs
    #[error(transparent)]
    Fs(#[from] sync_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a prompt error from any displayable failure.
    pub fn prompt(message: impl std::fmt::Display) -> Self {
        Self::Prompt {
            message: message.to_string(),
        }
    }
}
