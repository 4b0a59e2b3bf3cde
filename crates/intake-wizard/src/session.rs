//! The wizard session: upload, column mapping and navigation state for one
//! in-progress upload.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use intake_ingest::{FileIntake, FileRef, TabularPreview, infer_display_name};
use intake_map::{ProviderError, SuggestionRequest, TemplateStore};
use intake_model::{ColumnMapping, FieldTarget, TargetSchema};

use crate::error::{Blocker, Result, WizardError};
use crate::profile::{DocumentSource, WizardProfile};
use crate::review::TemplateDraft;
use crate::step::WizardStep;

/// Identifies one in-flight auto-suggest; answers carrying any other ticket
/// are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SuggestTicket(u64);

/// What happened to an auto-suggest answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestOutcome {
    /// No file is loaded, or a suggestion is already running.
    NotStarted,
    /// The mapping set was replaced; carries the number of mapped columns.
    Applied { mapped: usize },
    /// The provider failed; mappings are unchanged.
    Failed(ProviderError),
    Cancelled,
    /// The answer belonged to a superseded request and was dropped.
    Stale,
}

/// Mapping status of one required field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequiredFieldStatus {
    pub field: String,
    /// Source columns currently mapped to the field, in file order.
    pub columns: Vec<String>,
}

impl RequiredFieldStatus {
    pub fn is_satisfied(&self) -> bool {
        !self.columns.is_empty()
    }
}

/// A target field chosen by more than one source column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateTarget {
    pub field: String,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardSession {
    profile: WizardProfile,
    step: WizardStep,
    file: Option<FileRef>,
    preview: Option<TabularPreview>,
    mappings: Vec<ColumnMapping>,
    name: String,
    #[serde(default)]
    name_inferred: bool,
    batch_id: String,
    documents: Option<DocumentSource>,
    template: TemplateDraft,
    #[serde(skip)]
    pending: Option<SuggestTicket>,
    #[serde(skip)]
    tickets_issued: u64,
}

impl WizardSession {
    pub fn new(profile: WizardProfile) -> Self {
        Self {
            profile,
            step: WizardStep::SourceUpload,
            file: None,
            preview: None,
            mappings: Vec::new(),
            name: String::new(),
            name_inferred: false,
            batch_id: String::new(),
            documents: None,
            template: TemplateDraft::default(),
            pending: None,
            tickets_issued: 0,
        }
    }

    pub fn profile(&self) -> &WizardProfile {
        &self.profile
    }

    pub fn schema(&self) -> &TargetSchema {
        &self.profile.schema
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn file(&self) -> Option<&FileRef> {
        self.file.as_ref()
    }

    pub fn preview(&self) -> Option<&TabularPreview> {
        self.preview.as_ref()
    }

    /// One mapping per source column, in file order.
    pub fn mappings(&self) -> &[ColumnMapping] {
        &self.mappings
    }

    pub fn mapping(&self, column: &str) -> Option<&ColumnMapping> {
        self.mappings.iter().find(|m| m.source_column == column)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn batch_id(&self) -> &str {
        &self.batch_id
    }

    pub fn documents(&self) -> Option<&DocumentSource> {
        self.documents.as_ref()
    }

    pub fn template_draft(&self) -> &TemplateDraft {
        &self.template
    }

    // Step 1: source upload

    /// Parse `file` with `intake` and accept it. On an intake error the
    /// session is left untouched.
    pub fn accept_file<I: FileIntake + ?Sized>(&mut self, intake: &I, file: FileRef) -> Result<()> {
        let preview = intake.intake(&file)?;
        self.accept_parsed(file, preview);
        Ok(())
    }

    /// Accept an already parsed file, replacing any previous one. Every
    /// column starts unmapped.
    pub fn accept_parsed(&mut self, file: FileRef, preview: TabularPreview) {
        self.cancel_auto_suggest();
        if self.name.trim().is_empty() || self.name_inferred {
            self.name = infer_display_name(&file);
            self.name_inferred = true;
        }
        self.mappings = preview
            .columns
            .iter()
            .map(|column| ColumnMapping::unmapped(column.name.clone()))
            .collect();
        info!(
            file = %file.display_name,
            fingerprint = %file.short_fingerprint(),
            columns = preview.columns.len(),
            rows = preview.row_count,
            "accepted source file"
        );
        self.file = Some(file);
        self.preview = Some(preview);
        self.step = WizardStep::SourceUpload;
    }

    /// Drop the accepted file and its mappings. Does nothing when no file is
    /// loaded.
    pub fn remove_file(&mut self) {
        self.cancel_auto_suggest();
        let Some(file) = self.file.take() else {
            return;
        };
        info!(file = %file.display_name, "removed source file");
        self.preview = None;
        self.mappings.clear();
        if self.name_inferred {
            self.name.clear();
            self.name_inferred = false;
        }
        self.step = WizardStep::SourceUpload;
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.name_inferred = false;
    }

    pub fn set_batch_id(&mut self, batch_id: impl Into<String>) {
        self.batch_id = batch_id.into();
    }

    /// Attach an uploaded document, switching away from an existing batch.
    pub fn add_document(&mut self, file: FileRef) {
        match &mut self.documents {
            Some(DocumentSource::Upload { files }) => files.push(file),
            _ => {
                self.documents = Some(DocumentSource::Upload { files: vec![file] });
            }
        }
    }

    /// Remove an uploaded document by position.
    pub fn remove_document(&mut self, index: usize) -> Option<FileRef> {
        match &mut self.documents {
            Some(DocumentSource::Upload { files }) if index < files.len() => {
                Some(files.remove(index))
            }
            _ => None,
        }
    }

    /// Use a previously processed batch. Clears any uploaded documents.
    pub fn select_existing_batch(&mut self, batch_id: impl Into<String>) -> Result<()> {
        if !self.profile.documents.allows_existing_batch() {
            return Err(WizardError::UnsupportedDocumentSource(self.profile.key.clone()));
        }
        self.documents = Some(DocumentSource::ExistingBatch {
            batch_id: batch_id.into(),
        });
        Ok(())
    }

    /// Switch to uploaded documents. Clears any selected batch.
    pub fn use_uploaded_documents(&mut self) {
        if !matches!(self.documents, Some(DocumentSource::Upload { .. })) {
            self.documents = Some(DocumentSource::Upload { files: Vec::new() });
        }
    }

    pub fn documents_complete(&self) -> bool {
        !self.profile.documents.is_required()
            || self.documents.as_ref().is_some_and(DocumentSource::is_complete)
    }

    // Step 2: column mapping

    /// Start an auto-suggest. Returns `None` when no file is loaded or one is
    /// already running.
    pub fn begin_auto_suggest(&mut self) -> Option<SuggestTicket> {
        if self.preview.is_none() || self.pending.is_some() {
            return None;
        }
        self.tickets_issued += 1;
        let ticket = SuggestTicket(self.tickets_issued);
        self.pending = Some(ticket);
        debug!(ticket = ticket.0, "auto-suggest started");
        Some(ticket)
    }

    pub fn is_suggesting(&self) -> bool {
        self.pending.is_some()
    }

    /// Abandon the running auto-suggest, if any; its answer will be stale.
    pub fn cancel_auto_suggest(&mut self) -> bool {
        let cancelled = self.pending.take().is_some();
        if cancelled {
            debug!("auto-suggest cancelled");
        }
        cancelled
    }

    /// The provider input for the current file.
    pub fn suggestion_request(&self) -> Option<SuggestionRequest> {
        let preview = self.preview.as_ref()?;
        let samples = preview
            .column_names()
            .map(|column| {
                let values = preview
                    .samples(column)
                    .into_iter()
                    .map(ToString::to_string)
                    .collect();
                (column.to_string(), values)
            })
            .collect();
        Some(
            SuggestionRequest::new(
                self.profile.schema.clone(),
                preview.column_names().map(ToString::to_string).collect(),
            )
            .with_samples(samples)
            .with_hints(preview.hints.clone()),
        )
    }

    /// Deliver a provider answer. A successful answer replaces the whole
    /// mapping set; a failure leaves it unchanged.
    pub fn finish_auto_suggest(
        &mut self,
        ticket: SuggestTicket,
        result: std::result::Result<Vec<ColumnMapping>, ProviderError>,
    ) -> SuggestOutcome {
        if self.pending != Some(ticket) {
            debug!(ticket = ticket.0, "dropping stale auto-suggest answer");
            return SuggestOutcome::Stale;
        }
        self.pending = None;
        match result {
            Ok(suggested) => {
                self.replace_with_suggestions(suggested);
                let mapped = self.mapped_count();
                info!(mapped, unmapped = self.unmapped_count(), "applied auto-suggest");
                SuggestOutcome::Applied { mapped }
            }
            Err(ProviderError::Cancelled) => SuggestOutcome::Cancelled,
            Err(error) => {
                warn!(%error, "auto-suggest failed; mappings unchanged");
                SuggestOutcome::Failed(error)
            }
        }
    }

    fn replace_with_suggestions(&mut self, suggested: Vec<ColumnMapping>) {
        let mut by_column: BTreeMap<String, ColumnMapping> = BTreeMap::new();
        for mapping in suggested {
            if self.mapping(&mapping.source_column).is_none() {
                warn!(column = %mapping.source_column, "suggestion for unknown column dropped");
                continue;
            }
            by_column.entry(mapping.source_column.clone()).or_insert(mapping);
        }
        let schema = &self.profile.schema;
        for mapping in &mut self.mappings {
            *mapping = match by_column.remove(&mapping.source_column) {
                Some(suggestion) => match suggestion.target.field_name() {
                    Some(field) if !schema.contains(field) => {
                        warn!(
                            column = %suggestion.source_column,
                            field,
                            "suggested field is not in the schema; left unmapped"
                        );
                        ColumnMapping::unmapped(suggestion.source_column)
                    }
                    _ => suggestion,
                },
                None => ColumnMapping::unmapped(mapping.source_column.clone()),
            };
        }
    }

    /// Apply a saved template. Columns the template names are overwritten
    /// with certain confidence; the rest keep their mapping. Returns the
    /// number of columns changed.
    pub fn apply_template<S: TemplateStore + ?Sized>(
        &mut self,
        store: &S,
        id: &str,
    ) -> Result<usize> {
        if self.file.is_none() {
            return Err(WizardError::NoFile);
        }
        let template = store.require(id)?;
        self.cancel_auto_suggest();
        let schema = &self.profile.schema;
        let mut applied = 0;
        for mapping in &mut self.mappings {
            let Some(entry) = template.entry_for(&mapping.source_column) else {
                continue;
            };
            if let Some(field) = entry.target.field_name()
                && !schema.contains(field)
            {
                warn!(
                    template = %template.id,
                    column = %entry.source_column,
                    field,
                    "template field is not in the schema; entry skipped"
                );
                continue;
            }
            *mapping =
                ColumnMapping::from_template(entry.source_column.clone(), entry.target.clone());
            applied += 1;
        }
        info!(template = %template.id, applied, "applied mapping template");
        Ok(applied)
    }

    /// Manually map one column. Duplicated targets are allowed.
    pub fn set_mapping(&mut self, column: &str, target: FieldTarget) -> Result<()> {
        if self.file.is_none() {
            return Err(WizardError::NoFile);
        }
        if let Some(field) = target.field_name()
            && !self.profile.schema.contains(field)
        {
            return Err(WizardError::UnknownField {
                field: field.to_string(),
                schema: self.profile.schema.name().to_string(),
            });
        }
        let Some(index) = self.mappings.iter().position(|m| m.source_column == column) else {
            return Err(WizardError::UnknownColumn(column.to_string()));
        };
        self.cancel_auto_suggest();
        debug!(column, target = %target, "manual mapping");
        self.mappings[index] = ColumnMapping::manual(column, target);
        Ok(())
    }

    /// True when every required field has at least one source column mapped
    /// to it.
    pub fn all_required_mapped(&self) -> bool {
        self.profile
            .schema
            .required_fields()
            .all(|field| self.mappings.iter().any(|m| m.target.is(&field.name)))
    }

    pub fn required_status(&self) -> Vec<RequiredFieldStatus> {
        self.profile
            .schema
            .required_fields()
            .map(|field| RequiredFieldStatus {
                field: field.name.clone(),
                columns: self
                    .mappings
                    .iter()
                    .filter(|m| m.target.is(&field.name))
                    .map(|m| m.source_column.clone())
                    .collect(),
            })
            .collect()
    }

    pub fn mapped_count(&self) -> usize {
        self.mappings.iter().filter(|m| m.is_mapped()).count()
    }

    pub fn unmapped_count(&self) -> usize {
        self.mappings.len() - self.mapped_count()
    }

    /// Fields mapped from more than one column, in schema order.
    pub fn duplicate_targets(&self) -> Vec<DuplicateTarget> {
        self.profile
            .schema
            .fields()
            .iter()
            .filter_map(|field| {
                let columns: Vec<String> = self
                    .mappings
                    .iter()
                    .filter(|m| m.target.is(&field.name))
                    .map(|m| m.source_column.clone())
                    .collect();
                (columns.len() > 1).then(|| DuplicateTarget {
                    field: field.name.clone(),
                    columns,
                })
            })
            .collect()
    }

    /// The source column feeding each mapped field. When several columns map
    /// to one field the first in file order wins.
    pub fn field_columns(&self) -> BTreeMap<String, String> {
        let mut fields = BTreeMap::new();
        for mapping in &self.mappings {
            if let Some(field) = mapping.target.field_name() {
                fields
                    .entry(field.to_string())
                    .or_insert_with(|| mapping.source_column.clone());
            }
        }
        fields
    }

    // Step 3: template sub-form

    pub fn set_save_as_template(&mut self, save: bool) {
        self.template.save = save;
    }

    pub fn set_template_name(&mut self, name: impl Into<String>) {
        self.template.name = name.into();
    }

    pub fn set_template_description(&mut self, description: impl Into<String>) {
        self.template.description = description.into();
    }

    // Navigation

    /// Conditions blocking the move out of the current step.
    pub fn blockers(&self) -> Vec<Blocker> {
        self.blockers_for(self.step)
    }

    pub fn can_advance(&self) -> bool {
        self.step.is_last() || self.blockers().is_empty()
    }

    /// Conditions blocking submission, whatever the current step.
    pub fn submit_blockers(&self) -> Vec<Blocker> {
        self.blockers_for(WizardStep::ReviewSubmit)
    }

    pub fn can_submit(&self) -> bool {
        self.step == WizardStep::ReviewSubmit && self.submit_blockers().is_empty()
    }

    fn blockers_for(&self, step: WizardStep) -> Vec<Blocker> {
        let mut blockers = Vec::new();
        if self.file.is_none() {
            blockers.push(Blocker::NoFile);
        }
        if self.profile.name_required && self.name.trim().is_empty() {
            blockers.push(Blocker::MissingName(self.profile.name_label.clone()));
        }
        if step == WizardStep::SourceUpload {
            return blockers;
        }
        if self.is_suggesting() {
            blockers.push(Blocker::SuggestionPending);
        }
        blockers.extend(
            self.required_status()
                .into_iter()
                .filter(|status| !status.is_satisfied())
                .map(|status| Blocker::RequiredFieldUnmapped(status.field)),
        );
        if !self.documents_complete() {
            blockers.push(Blocker::MissingDocuments);
        }
        if step == WizardStep::ReviewSubmit && self.template.is_missing_name() {
            blockers.push(Blocker::MissingTemplateName);
        }
        blockers
    }

    /// Move to the next step if its guard holds. Advancing from the last
    /// step leaves the session where it is.
    pub fn advance(&mut self) -> Result<WizardStep> {
        let Some(next) = self.step.next() else {
            return Ok(self.step);
        };
        let blockers = self.blockers();
        if !blockers.is_empty() {
            debug!(step = %self.step, blocked = blockers.len(), "advance blocked");
            return Err(WizardError::Blocked(blockers));
        }
        if next == WizardStep::ReviewSubmit {
            for duplicate in self.duplicate_targets() {
                warn!(
                    field = %duplicate.field,
                    columns = ?duplicate.columns,
                    "several columns map to one field; the first is used"
                );
            }
        }
        info!(from = %self.step, to = %next, "wizard advanced");
        self.step = next;
        Ok(next)
    }

    /// Step back. Never changes mappings or metadata.
    pub fn back(&mut self) -> WizardStep {
        if let Some(previous) = self.step.previous() {
            info!(from = %self.step, to = %previous, "wizard went back");
            self.step = previous;
        }
        self.step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_model::{Confidence, MappingOrigin, TargetField};

    fn session_with(headers: &[&str]) -> WizardSession {
        let schema = TargetSchema::new(
            "Ledger",
            vec![
                TargetField::required("Date", intake_model::FieldKind::Date),
                TargetField::optional("Memo", intake_model::FieldKind::Text),
            ],
        )
        .unwrap();
        let mut session = WizardSession::new(WizardProfile::custom(schema));
        let preview = TabularPreview::from_rows(
            headers.iter().map(ToString::to_string).collect(),
            Vec::new(),
        );
        session.accept_parsed(FileRef::from_bytes("ledger.csv", b"x"), preview);
        session
    }

    #[test]
    fn test_stale_ticket_is_ignored() {
        let mut session = session_with(&["Trans Date"]);
        let first = session.begin_auto_suggest().unwrap();
        session.cancel_auto_suggest();
        let second = session.begin_auto_suggest().unwrap();
        assert_ne!(first, second);

        let answer = vec![ColumnMapping::suggested(
            "Trans Date",
            FieldTarget::field("Date"),
            Confidence::saturating(95),
        )];
        assert_eq!(
            session.finish_auto_suggest(first, Ok(answer.clone())),
            SuggestOutcome::Stale
        );
        assert!(session.is_suggesting());
        assert_eq!(
            session.finish_auto_suggest(second, Ok(answer)),
            SuggestOutcome::Applied { mapped: 1 }
        );
        assert_eq!(
            session.mapping("Trans Date").unwrap().origin,
            MappingOrigin::Suggested
        );
    }

    #[test]
    fn test_suggestions_outside_schema_become_unmapped() {
        let mut session = session_with(&["Trans Date", "GL Code"]);
        let ticket = session.begin_auto_suggest().unwrap();
        let answer = vec![
            ColumnMapping::suggested(
                "GL Code",
                FieldTarget::field("Ledger Account"),
                Confidence::saturating(80),
            ),
            ColumnMapping::suggested(
                "Ghost",
                FieldTarget::field("Date"),
                Confidence::saturating(80),
            ),
        ];
        session.finish_auto_suggest(ticket, Ok(answer));
        assert!(session.mappings().iter().all(|m| !m.is_mapped()));
        assert_eq!(session.mappings().len(), 2);
    }

    #[test]
    fn test_manual_edit_cancels_pending_suggestion() {
        let mut session = session_with(&["Trans Date"]);
        let ticket = session.begin_auto_suggest().unwrap();
        session
            .set_mapping("Trans Date", FieldTarget::field("Memo"))
            .unwrap();
        assert!(!session.is_suggesting());
        assert_eq!(
            session.finish_auto_suggest(ticket, Ok(Vec::new())),
            SuggestOutcome::Stale
        );
        assert!(session.mapping("Trans Date").unwrap().target.is("Memo"));
    }

    #[test]
    fn test_field_columns_take_first_column() {
        let mut session = session_with(&["A", "B"]);
        session.set_mapping("B", FieldTarget::field("Date")).unwrap();
        session.set_mapping("A", FieldTarget::field("Date")).unwrap();
        assert_eq!(session.field_columns().get("Date").map(String::as_str), Some("A"));
        assert_eq!(session.duplicate_targets().len(), 1);
    }
}
