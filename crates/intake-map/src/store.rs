//! Template store abstraction and the in-memory store.

use intake_model::MappingTemplate;

use crate::error::TemplateError;

/// Lookup and save path for mapping templates.
pub trait TemplateStore {
    /// All templates, ordered by name.
    fn list(&self) -> Result<Vec<MappingTemplate>, TemplateError>;

    /// The template with the given id, if any.
    fn get(&self, id: &str) -> Result<Option<MappingTemplate>, TemplateError>;

    /// Insert or replace a template by id.
    fn save(&mut self, template: MappingTemplate) -> Result<(), TemplateError>;

    /// Like [`TemplateStore::get`] but a missing id is an error.
    fn require(&self, id: &str) -> Result<MappingTemplate, TemplateError> {
        self.get(id)?
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))
    }
}

/// Templates held in memory, typically seeded from fixtures.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTemplateStore {
    templates: Vec<MappingTemplate>,
}

impl InMemoryTemplateStore {
    pub fn new(templates: Vec<MappingTemplate>) -> Self {
        let mut store = Self::default();
        for template in templates {
            store.upsert(template);
        }
        store
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    fn upsert(&mut self, template: MappingTemplate) {
        match self.templates.iter_mut().find(|t| t.id == template.id) {
            Some(existing) => *existing = template,
            None => self.templates.push(template),
        }
    }
}

impl TemplateStore for InMemoryTemplateStore {
    fn list(&self) -> Result<Vec<MappingTemplate>, TemplateError> {
        let mut templates = self.templates.clone();
        templates.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(templates)
    }

    fn get(&self, id: &str) -> Result<Option<MappingTemplate>, TemplateError> {
        Ok(self.templates.iter().find(|t| t.id == id).cloned())
    }

    fn save(&mut self, template: MappingTemplate) -> Result<(), TemplateError> {
        self.upsert(template);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_model::TemplateEntry;

    fn template(id: &str, name: &str) -> MappingTemplate {
        MappingTemplate::new(id, name, vec![TemplateEntry::new("Loan #", "Loan Number")]).unwrap()
    }

    #[test]
    fn test_save_replaces_by_id() {
        let mut store = InMemoryTemplateStore::new(vec![template("t1", "Wellington")]);
        store.save(template("t1", "Wellington v2")).unwrap();
        store.save(template("t2", "Carrington")).unwrap();
        assert_eq!(store.len(), 2);
        let names: Vec<String> = store.list().unwrap().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["Carrington", "Wellington v2"]);
    }

    #[test]
    fn test_require_reports_missing_id() {
        let store = InMemoryTemplateStore::default();
        assert!(matches!(store.require("nope"), Err(TemplateError::NotFound(id)) if id == "nope"));
    }
}
