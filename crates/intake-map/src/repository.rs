//! File-system repository for mapping templates.
//!
//! Each template is stored as a pretty-printed JSON file named
//! `{template_id}.json` inside the repository directory, wrapped with the
//! time it was saved and a format version. Ids must already be slugs (see
//! [`template_id_from_name`]) so that no two ids share a file.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use intake_model::MappingTemplate;

use crate::error::TemplateError;
use crate::store::TemplateStore;
use crate::utils::template_id_from_name;

const FORMAT_VERSION: &str = "1.0";

/// Repository for storing and retrieving mapping templates.
#[derive(Debug, Clone)]
pub struct TemplateRepository {
    base_dir: PathBuf,
}

/// Metadata about a stored template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateMetadata {
    pub id: String,
    pub name: String,
    pub file_path: PathBuf,
    pub mapping_count: usize,
    pub saved_at: DateTime<Utc>,
}

/// Template plus repository bookkeeping, as written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredTemplate {
    #[serde(flatten)]
    pub template: MappingTemplate,
    pub saved_at: DateTime<Utc>,
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    FORMAT_VERSION.to_string()
}

impl StoredTemplate {
    pub fn new(template: MappingTemplate) -> Self {
        Self {
            template,
            saved_at: Utc::now(),
            version: default_version(),
        }
    }
}

impl TemplateRepository {
    /// Open a repository, creating the directory if needed.
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self, TemplateError> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir).map_err(|source| TemplateError::Io {
            path: base_dir.clone(),
            source,
        })?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Save a template, returning the file it was written to.
    pub fn save(&self, template: &MappingTemplate) -> Result<PathBuf, TemplateError> {
        let path = self
            .template_path(&template.id)
            .ok_or_else(|| TemplateError::InvalidId(template.id.clone()))?;
        let stored = StoredTemplate::new(template.clone());
        let json = serde_json::to_string_pretty(&stored).map_err(|source| TemplateError::Json {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, json).map_err(|source| TemplateError::Io {
            path: path.clone(),
            source,
        })?;
        debug!(template_id = %template.id, path = %path.display(), "saved mapping template");
        Ok(path)
    }

    /// Load a template by id. Returns `None` if no file exists or `id` is
    /// not a valid template id.
    pub fn load(&self, id: &str) -> Result<Option<StoredTemplate>, TemplateError> {
        let Some(path) = self.template_path(id).filter(|path| path.exists()) else {
            return Ok(None);
        };
        let stored = read_stored(&path)?;
        if stored.template.id != id {
            return Err(TemplateError::IdMismatch {
                path,
                expected: id.to_string(),
                found: stored.template.id,
            });
        }
        Ok(Some(stored))
    }

    /// List all templates, sorted by name. Unreadable files are skipped.
    pub fn list(&self) -> Result<Vec<TemplateMetadata>, TemplateError> {
        let mut metadata: Vec<TemplateMetadata> = self
            .stored_templates()?
            .into_iter()
            .map(|(path, stored)| TemplateMetadata {
                id: stored.template.id.clone(),
                name: stored.template.name.clone(),
                file_path: path,
                mapping_count: stored.template.mappings.len(),
                saved_at: stored.saved_at,
            })
            .collect();
        metadata.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(metadata)
    }

    /// Delete a template. Returns whether a file was removed.
    pub fn delete(&self, id: &str) -> Result<bool, TemplateError> {
        let Some(path) = self.template_path(id).filter(|path| path.exists()) else {
            return Ok(false);
        };
        fs::remove_file(&path).map_err(|source| TemplateError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(true)
    }

    pub fn exists(&self, id: &str) -> bool {
        self.template_path(id).is_some_and(|path| path.exists())
    }

    /// File for `id`, or `None` when `id` is not its own slug.
    fn template_path(&self, id: &str) -> Option<PathBuf> {
        (!id.is_empty() && template_id_from_name(id) == id)
            .then(|| self.base_dir.join(format!("{id}.json")))
    }

    fn stored_templates(&self) -> Result<Vec<(PathBuf, StoredTemplate)>, TemplateError> {
        let entries = fs::read_dir(&self.base_dir).map_err(|source| TemplateError::Io {
            path: self.base_dir.clone(),
            source,
        })?;
        let mut templates = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| TemplateError::Io {
                path: self.base_dir.clone(),
                source,
            })?;
            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match read_stored(&path) {
                Ok(stored) => templates.push((path, stored)),
                Err(error) => warn!(path = %path.display(), %error, "skipping unreadable template"),
            }
        }
        Ok(templates)
    }
}

fn read_stored(path: &Path) -> Result<StoredTemplate, TemplateError> {
    let contents = fs::read_to_string(path).map_err(|source| TemplateError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| TemplateError::Json {
        path: path.to_path_buf(),
        source,
    })
}

impl TemplateStore for TemplateRepository {
    fn list(&self) -> Result<Vec<MappingTemplate>, TemplateError> {
        let mut templates: Vec<MappingTemplate> = self
            .stored_templates()?
            .into_iter()
            .map(|(_, stored)| stored.template)
            .collect();
        templates.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(templates)
    }

    fn get(&self, id: &str) -> Result<Option<MappingTemplate>, TemplateError> {
        Ok(self.load(id)?.map(|stored| stored.template))
    }

    fn save(&mut self, template: MappingTemplate) -> Result<(), TemplateError> {
        TemplateRepository::save(self, &template).map(|_| ())
    }
}
