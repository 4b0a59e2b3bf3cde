use std::fmt;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use intake_ingest::IngestError;
use intake_map::TemplateError;
use intake_model::ModelError;

use crate::step::WizardStep;

/// An unmet condition that keeps the wizard from moving forward.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum Blocker {
    NoFile,
    /// The profile's name field is empty; carries the field label.
    MissingName(String),
    MissingDocuments,
    RequiredFieldUnmapped(String),
    MissingTemplateName,
    SuggestionPending,
}

impl fmt::Display for Blocker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoFile => f.write_str("no source file accepted"),
            Self::MissingName(label) => write!(f, "{label} is required"),
            Self::MissingDocuments => f.write_str("no documents associated"),
            Self::RequiredFieldUnmapped(field) => {
                write!(f, "required field '{field}' is not mapped")
            }
            Self::MissingTemplateName => f.write_str("template name is required"),
            Self::SuggestionPending => f.write_str("auto-mapping is still running"),
        }
    }
}

pub(crate) fn join_blockers(blockers: &[Blocker]) -> String {
    blockers
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Error)]
pub enum WizardError {
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error("column '{0}' is not in the uploaded file")]
    UnknownColumn(String),
    #[error("'{field}' is not a field of schema '{schema}'")]
    UnknownField { field: String, schema: String },
    #[error("no source file has been accepted")]
    NoFile,
    #[error("profile '{0}' does not accept an existing document batch")]
    UnsupportedDocumentSource(String),
    #[error("cannot continue: {}", join_blockers(.0))]
    Blocked(Vec<Blocker>),
}

pub type Result<T> = std::result::Result<T, WizardError>;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("cannot submit: {}", join_blockers(.0))]
    Blocked(Vec<Blocker>),
    #[error("cannot submit from {0}; submission happens at review")]
    NotAtReview(WizardStep),
    #[error("invalid template: {0}")]
    Template(#[from] ModelError),
    #[error("submission rejected: {0}")]
    Rejected(String),
    #[error("failed to write submission to {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode submission")]
    Encode(#[from] serde_json::Error),
}
