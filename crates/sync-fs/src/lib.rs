//! Filesystem primitives for composer-sync
//!
//! Provides slash-normalized paths and the read/write helpers the sync engine
//! uses for the composer manifest, component manifests, and config files.

pub mod error;
pub mod io;
pub mod path;

pub use error::{Error, Result};
pub use path::NormalizedPath;
