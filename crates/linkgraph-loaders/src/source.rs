//! Reading artifact sources.
//!
//! Every loader goes through these helpers so a missing file is always
//! `Ok(None)` and every other failure is a [`LoaderError`] the project builder
//! can report without aborting the build.

use crate::errors::{LoaderError, LoaderResult};
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Read a UTF-8 text file. A missing file is `Ok(None)`.
pub fn read_text(path: &Path, max_file_size: usize) -> LoaderResult<Option<String>> {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(LoaderError::IoError(path.to_path_buf(), e)),
    };

    if metadata.len() > max_file_size as u64 {
        return Err(LoaderError::FileTooLarge(path.to_path_buf(), max_file_size));
    }

    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(LoaderError::IoError(path.to_path_buf(), e)),
    }
}

/// Read and parse a JSON file. A missing file is `Ok(None)`.
pub fn read_json(path: &Path, max_file_size: usize) -> LoaderResult<Option<Value>> {
    match read_text(path, max_file_size)? {
        Some(text) => parse_json(path, &text).map(Some),
        None => Ok(None),
    }
}

/// Parse JSON text, attributing errors to `path`.
pub fn parse_json(path: &Path, text: &str) -> LoaderResult<Value> {
    serde_json::from_str(text).map_err(|e| LoaderError::Json(path.to_path_buf(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_file_is_none() {
        let result = read_json(Path::new("/definitely/not/here.json"), 1024).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_malformed_json_is_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = read_json(file.path(), 1024).unwrap_err();
        assert!(matches!(err, LoaderError::Json(..)));
    }

    #[test]
    fn test_oversized_file_is_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[1, 2, 3, 4, 5, 6, 7, 8, 9]").unwrap();
        let err = read_text(file.path(), 4).unwrap_err();
        assert!(matches!(err, LoaderError::FileTooLarge(_, 4)));
    }
}
