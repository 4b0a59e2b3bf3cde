//! Packaging a finished session and handing it to a submitter.

use std::collections::BTreeMap;
use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use intake_ingest::FileRef;
use intake_map::template_id_from_name;
use intake_model::{ColumnMapping, MappingTemplate};

use crate::error::{Blocker, SubmitError};
use crate::profile::DocumentSource;
use crate::session::WizardSession;
use crate::step::WizardStep;

/// Everything the downstream pipeline needs to process an upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionPackage {
    pub profile: String,
    pub schema: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<String>,
    pub file: FileRef,
    pub row_count: usize,
    pub mappings: Vec<ColumnMapping>,
    /// Target field to source column; the first column wins on duplicates.
    pub field_columns: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documents: Option<DocumentSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_template: Option<MappingTemplate>,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionReceipt {
    /// Reference assigned by the submitter.
    pub reference: String,
    pub package: SubmissionPackage,
}

/// Receives finished submissions.
pub trait Submitter {
    /// Deliver the package, answering with a reference for it.
    fn submit(
        &self,
        package: &SubmissionPackage,
    ) -> impl Future<Output = Result<String, SubmitError>> + Send;
}

/// A failed submission. The session comes back unchanged so it can be
/// retried.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct SubmitFailure {
    pub session: Box<WizardSession>,
    #[source]
    pub error: SubmitError,
}

impl WizardSession {
    /// Build the submission package, or report what blocks it. Only a
    /// session at the review step can be packaged.
    pub fn package(&self) -> Result<SubmissionPackage, SubmitError> {
        if self.step() != WizardStep::ReviewSubmit {
            return Err(SubmitError::NotAtReview(self.step()));
        }
        let blockers = self.submit_blockers();
        if !blockers.is_empty() {
            return Err(SubmitError::Blocked(blockers));
        }
        let Some(file) = self.file() else {
            return Err(SubmitError::Blocked(vec![Blocker::NoFile]));
        };

        let draft = self.template_draft();
        let new_template = if draft.save {
            let name = draft.name.trim();
            Some(
                MappingTemplate::from_mappings(template_id_from_name(name), name, self.mappings())?
                    .with_description(draft.description.trim()),
            )
        } else {
            None
        };

        let batch_id = self.batch_id().trim();
        Ok(SubmissionPackage {
            profile: self.profile().key.clone(),
            schema: self.schema().name().to_string(),
            name: self.name().trim().to_string(),
            batch_id: (!batch_id.is_empty()).then(|| batch_id.to_string()),
            file: file.clone(),
            row_count: self.preview().map_or(0, |p| p.row_count),
            mappings: self.mappings().to_vec(),
            field_columns: self.field_columns(),
            documents: self.documents().cloned(),
            new_template,
            submitted_at: Utc::now(),
        })
    }

    /// Submit the session. Succeeding consumes it; failing hands it back
    /// inside the error.
    pub async fn submit<S: Submitter + ?Sized>(
        self,
        submitter: &S,
    ) -> Result<SubmissionReceipt, SubmitFailure> {
        let package = match self.package() {
            Ok(package) => package,
            Err(error) => {
                return Err(SubmitFailure {
                    session: Box::new(self),
                    error,
                });
            }
        };
        match submitter.submit(&package).await {
            Ok(reference) => {
                info!(
                    reference = %reference,
                    profile = %package.profile,
                    mapped = package.field_columns.len(),
                    "submitted upload"
                );
                Ok(SubmissionReceipt { reference, package })
            }
            Err(error) => {
                warn!(%error, "submission failed; session kept for retry");
                Err(SubmitFailure {
                    session: Box::new(self),
                    error,
                })
            }
        }
    }
}
