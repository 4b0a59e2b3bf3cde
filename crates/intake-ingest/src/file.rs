use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{IngestError, Result};

/// Identity of an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileRef {
    pub path: PathBuf,
    pub display_name: String,
    /// Lowercase hex SHA-256 of the file contents.
    pub fingerprint: String,
}

impl FileRef {
    /// Read the file once to fingerprint it.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let bytes = fs::read(&path).map_err(|source| IngestError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(Self::from_bytes(path, &bytes))
    }

    /// Build a reference for contents already in memory.
    pub fn from_bytes(path: impl Into<PathBuf>, bytes: &[u8]) -> Self {
        let path = path.into();
        Self {
            display_name: display_name(&path),
            fingerprint: sha256_hex(bytes),
            path,
        }
    }

    /// First 12 hex characters of the fingerprint.
    pub fn short_fingerprint(&self) -> &str {
        let end = self.fingerprint.len().min(12);
        &self.fingerprint[..end]
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(ToString::to_string)
        .unwrap_or_else(|| path.display().to_string())
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// A human-friendly default name derived from a file name, e.g.
/// `Carrington_Loan_Tape_Q1_2025.csv` becomes `Carrington Loan Tape Q1 2025`.
pub fn infer_display_name(file: &FileRef) -> String {
    let stem = Path::new(&file.display_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(&file.display_name);
    stem.replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
