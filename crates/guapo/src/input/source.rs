//! Raw line source and file metadata.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{GuapoError, Result};

/// Metadata about a file that was read into raw lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Number of non-blank lines returned.
    pub line_count: usize,
    /// When the file was read.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a file that has been read.
    pub fn new(path: PathBuf, hash: String, size_bytes: u64, line_count: usize) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            line_count,
            loaded_at: Utc::now(),
        }
    }
}

/// Read a UTF-8 text file into trimmed, non-blank lines.
pub fn read_lines(path: impl AsRef<Path>) -> Result<(Vec<String>, SourceMetadata)> {
    let path = path.as_ref();

    let contents = fs::read(path).map_err(|e| GuapoError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut hasher = Sha256::new();
    hasher.update(&contents);
    let hash = format!("sha256:{:x}", hasher.finalize());

    let text = String::from_utf8(contents).map_err(|e| GuapoError::Io {
        path: path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
    })?;

    let lines = lines_from_str(&text);
    if lines.is_empty() {
        return Err(GuapoError::EmptyData(format!(
            "Empty file: {}",
            path.display()
        )));
    }

    debug!(path = %path.display(), lines = lines.len(), "read source file");

    let metadata = SourceMetadata::new(path.to_path_buf(), hash, text.len() as u64, lines.len());
    Ok((lines, metadata))
}

/// Split text into trimmed lines, dropping blank ones.
pub fn lines_from_str(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_read_lines_trims_and_hashes() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "a,b\r\n 1,2 \n\n3,4\n").unwrap();

        let (lines, metadata) = read_lines(file.path()).unwrap();
        assert_eq!(lines, vec!["a,b", "1,2", "3,4"]);
        assert_eq!(metadata.line_count, 3);
        assert!(metadata.hash.starts_with("sha256:"));
        assert_eq!(metadata.hash.len(), "sha256:".len() + 64);
    }

    #[test]
    fn test_read_lines_empty_file() {
        let file = NamedTempFile::new().unwrap();
        let err = read_lines(file.path()).unwrap_err();
        assert!(matches!(err, GuapoError::EmptyData(_)));
    }

    #[test]
    fn test_read_lines_missing_file() {
        let err = read_lines("/nonexistent/data.csv").unwrap_err();
        assert!(matches!(err, GuapoError::Io { .. }));
    }
}
