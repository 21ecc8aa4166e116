use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while resolving a change
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The changed file exists but could not be read
    #[error("IO error reading {0}: {1}")]
    IoError(PathBuf, #[source] std::io::Error),
}

/// Result type for resolver operations
pub type Result<T> = std::result::Result<T, ResolveError>;
