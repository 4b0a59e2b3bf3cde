//! Saved column-mapping templates for recurring file formats.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::mapping::ColumnMapping;
use crate::target::FieldTarget;

/// One column entry of a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateEntry {
    pub source_column: String,
    pub target: FieldTarget,
}

impl TemplateEntry {
    pub fn new(source_column: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source_column: source_column.into(),
            target: FieldTarget::field(target),
        }
    }
}

/// A named set of column mappings keyed by source column name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub mappings: Vec<TemplateEntry>,
    pub last_modified: DateTime<Utc>,
}

impl MappingTemplate {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        mappings: Vec<TemplateEntry>,
    ) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ModelError::EmptyTemplateName);
        }
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ModelError::EmptyTemplateId {
                name: name.trim().to_string(),
            });
        }
        Ok(Self {
            id,
            name: name.trim().to_string(),
            description: String::new(),
            mappings,
            last_modified: Utc::now(),
        })
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Build a template from the mapped entries of a mapping set. Unmapped
    /// columns are left out.
    pub fn from_mappings<'a>(
        id: impl Into<String>,
        name: impl Into<String>,
        mappings: impl IntoIterator<Item = &'a ColumnMapping>,
    ) -> Result<Self> {
        let entries = mappings
            .into_iter()
            .filter(|m| m.is_mapped())
            .map(|m| TemplateEntry {
                source_column: m.source_column.clone(),
                target: m.target.clone(),
            })
            .collect();
        Self::new(id, name, entries)
    }

    /// The entry for an exact source column name.
    pub fn entry_for(&self, source_column: &str) -> Option<&TemplateEntry> {
        self.mappings
            .iter()
            .find(|entry| entry.source_column == source_column)
    }
}
