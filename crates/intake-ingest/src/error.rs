//! Error types for file intake.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading an uploaded tabular file.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed csv in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("{path} has no header row")]
    NoHeader { path: PathBuf },
    #[error("{path} has an empty header in column {position}")]
    EmptyHeader { path: PathBuf, position: usize },
    #[error("{path} repeats the header '{name}'")]
    DuplicateHeader { path: PathBuf, name: String },
}

pub type Result<T> = std::result::Result<T, IngestError>;
