//! Error types for suggestion providers and template stores.

use std::io;
use std::path::PathBuf;

use intake_model::ModelError;
use thiserror::Error;

/// Failure of a mapping-suggestion provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The provider could not be reached or produced no answer.
    #[error("suggestion provider unavailable: {0}")]
    Unavailable(String),
    /// The request was cancelled before completion.
    #[error("suggestion request cancelled")]
    Cancelled,
}

/// Errors from template store operations.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template not found: {0}")]
    NotFound(String),
    /// Stored ids double as file stems and must already be slugs.
    #[error("invalid template id '{0}': use lowercase letters, digits and '-'")]
    InvalidId(String),
    #[error("template file {path} holds id '{found}', expected '{expected}'")]
    IdMismatch {
        path: PathBuf,
        expected: String,
        found: String,
    },
    #[error("template store io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid template file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Model(#[from] ModelError),
}
