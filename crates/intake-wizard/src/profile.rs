//! Wizard profiles: the schema variant plus the metadata and document
//! association an upload of that kind collects.

use serde::{Deserialize, Serialize};

use intake_ingest::FileRef;
use intake_model::TargetSchema;

use crate::step::WizardStep;

/// Which companion documents an upload must carry before review.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentRequirement {
    /// No documents are collected.
    #[default]
    None,
    /// At least one uploaded document.
    Uploads,
    /// At least one uploaded document, or a previously processed batch.
    UploadsOrExistingBatch,
}

impl DocumentRequirement {
    pub fn is_required(self) -> bool {
        !matches!(self, Self::None)
    }

    pub fn allows_existing_batch(self) -> bool {
        matches!(self, Self::UploadsOrExistingBatch)
    }
}

/// Where an upload's documents come from. The two modes are exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DocumentSource {
    ExistingBatch { batch_id: String },
    Upload { files: Vec<FileRef> },
}

impl DocumentSource {
    pub fn is_complete(&self) -> bool {
        match self {
            Self::ExistingBatch { batch_id } => !batch_id.trim().is_empty(),
            Self::Upload { files } => !files.is_empty(),
        }
    }
}

/// A kind of upload the wizard can run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardProfile {
    pub key: String,
    pub title: String,
    pub schema: TargetSchema,
    pub name_label: String,
    pub name_required: bool,
    /// Whether a free-text batch id is collected alongside the name.
    pub collects_batch_id: bool,
    pub documents: DocumentRequirement,
    pub step_labels: [String; 3],
}

impl WizardProfile {
    /// Servicer advance reconciliation: an advance ledger export plus the
    /// invoices it covers.
    pub fn advance_recon() -> Self {
        Self {
            key: "advance-recon".to_string(),
            title: "Advance Reconciliation".to_string(),
            schema: TargetSchema::advance_recon(),
            name_label: "Transfer Name".to_string(),
            name_required: true,
            collects_batch_id: true,
            documents: DocumentRequirement::Uploads,
            step_labels: labels(["Upload Ledger", "Map CSV Columns", "Review & Submit"]),
        }
    }

    /// Loan-tape document audit: a loan tape plus the loan documents to
    /// verify it against.
    pub fn doc_audit() -> Self {
        Self {
            key: "doc-audit".to_string(),
            title: "Document Audit".to_string(),
            schema: TargetSchema::loan_tape(),
            name_label: "Audit Name".to_string(),
            name_required: true,
            collects_batch_id: false,
            documents: DocumentRequirement::UploadsOrExistingBatch,
            step_labels: labels(["Upload Loan Tape", "Map Loan Tape", "Review & Submit"]),
        }
    }

    /// A bare profile around a custom schema: no name, no documents.
    pub fn custom(schema: TargetSchema) -> Self {
        Self {
            key: "custom".to_string(),
            title: schema.name().to_string(),
            schema,
            name_label: "Name".to_string(),
            name_required: false,
            collects_batch_id: false,
            documents: DocumentRequirement::None,
            step_labels: labels([
                WizardStep::SourceUpload.label(),
                WizardStep::ColumnMapping.label(),
                WizardStep::ReviewSubmit.label(),
            ]),
        }
    }

    /// Keep everything but the schema.
    #[must_use]
    pub fn with_schema(mut self, schema: TargetSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn builtin() -> Vec<Self> {
        vec![Self::advance_recon(), Self::doc_audit()]
    }

    pub fn by_key(key: &str) -> Option<Self> {
        Self::builtin().into_iter().find(|p| p.key == key)
    }

    pub fn step_label(&self, step: WizardStep) -> &str {
        &self.step_labels[usize::from(step.number() - 1)]
    }
}

fn labels(names: [&str; 3]) -> [String; 3] {
    names.map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_profiles_by_key() {
        let audit = WizardProfile::by_key("doc-audit").unwrap();
        assert_eq!(audit.schema.name(), "Loan Tape");
        assert!(audit.documents.allows_existing_batch());
        assert_eq!(audit.step_label(WizardStep::SourceUpload), "Upload Loan Tape");
        assert!(WizardProfile::by_key("ai-docs").is_none());
    }

    #[test]
    fn test_document_source_completeness() {
        assert!(!DocumentSource::Upload { files: Vec::new() }.is_complete());
        assert!(!DocumentSource::ExistingBatch {
            batch_id: " ".to_string()
        }
        .is_complete());
        assert!(DocumentSource::ExistingBatch {
            batch_id: "eb1".to_string()
        }
        .is_complete());
    }
}
