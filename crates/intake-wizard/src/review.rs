//! Step 3 review projection and the save-as-template sub-form.

use serde::{Deserialize, Serialize};

use intake_model::{ConfidenceTier, MappingOrigin};

use crate::profile::DocumentSource;
use crate::session::WizardSession;
use crate::step::WizardStep;

/// The optional "save mapping as template" form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDraft {
    pub save: bool,
    pub name: String,
    pub description: String,
}

impl TemplateDraft {
    /// Checked but without a usable name.
    pub fn is_missing_name(&self) -> bool {
        self.save && self.name.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewEntry {
    pub source_column: String,
    pub target_field: String,
    pub confidence: u8,
    pub tier: ConfidenceTier,
    pub origin: MappingOrigin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DocumentSummary {
    None,
    ExistingBatch { batch_id: String },
    Upload { files: Vec<String> },
}

/// Read-only summary shown before submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewSummary {
    pub profile: String,
    pub step: WizardStep,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<String>,
    pub file_name: Option<String>,
    pub row_count: usize,
    pub column_count: usize,
    /// Mapped columns in file order.
    pub mapped: Vec<ReviewEntry>,
    pub unmapped_columns: Vec<String>,
    pub documents: DocumentSummary,
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<TemplateDraft>,
}

impl WizardSession {
    pub fn review(&self) -> ReviewSummary {
        let mut mapped = Vec::new();
        let mut unmapped_columns = Vec::new();
        for mapping in self.mappings() {
            match mapping.target.field_name() {
                Some(field) => {
                    let confidence = mapping.reported_confidence();
                    mapped.push(ReviewEntry {
                        source_column: mapping.source_column.clone(),
                        target_field: field.to_string(),
                        confidence: confidence.value(),
                        tier: confidence.tier(),
                        origin: mapping.origin,
                    });
                }
                None => unmapped_columns.push(mapping.source_column.clone()),
            }
        }

        let documents = match self.documents() {
            None => DocumentSummary::None,
            Some(DocumentSource::ExistingBatch { batch_id }) => DocumentSummary::ExistingBatch {
                batch_id: batch_id.clone(),
            },
            Some(DocumentSource::Upload { files }) => DocumentSummary::Upload {
                files: files.iter().map(|f| f.display_name.clone()).collect(),
            },
        };

        let warnings = self
            .duplicate_targets()
            .into_iter()
            .map(|duplicate| {
                format!(
                    "'{}' is mapped from {}; '{}' will be used",
                    duplicate.field,
                    duplicate.columns.join(", "),
                    duplicate.columns[0]
                )
            })
            .collect();

        let batch_id = (self.profile().collects_batch_id && !self.batch_id().trim().is_empty())
            .then(|| self.batch_id().trim().to_string());
        let draft = self.template_draft();

        ReviewSummary {
            profile: self.profile().title.clone(),
            step: self.step(),
            name: self.name().trim().to_string(),
            batch_id,
            file_name: self.file().map(|f| f.display_name.clone()),
            row_count: self.preview().map_or(0, |p| p.row_count),
            column_count: self.mappings().len(),
            mapped,
            unmapped_columns,
            documents,
            warnings,
            template: draft.save.then(|| draft.clone()),
        }
    }
}
