use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading an artifact source
#[derive(Error, Debug)]
pub enum LoaderError {
    /// Failed to read file
    #[error("IO error reading {0}: {1}")]
    IoError(PathBuf, #[source] std::io::Error),

    /// File is not valid JSON
    #[error("Malformed JSON in {0}: {1}")]
    Json(PathBuf, #[source] serde_json::Error),

    /// JSON parsed but the top-level shape is unusable
    #[error("Unexpected shape in {0}: {1}")]
    InvalidShape(PathBuf, String),

    /// File too large
    #[error("File {0} exceeds maximum size ({1} bytes)")]
    FileTooLarge(PathBuf, usize),
}

/// Result type for loader operations
pub type LoaderResult<T> = Result<T, LoaderError>;
