use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("schema '{schema}' has a field with an empty name")]
    EmptyFieldName { schema: String },
    #[error("schema '{schema}' defines field '{field}' more than once")]
    DuplicateField { schema: String, field: String },
    #[error("'{0}' is reserved for unmapped columns and cannot be a field name")]
    ReservedFieldName(String),
    #[error("confidence must be between 0 and 100, got {0}")]
    InvalidConfidence(u32),
    #[error("template name must not be empty")]
    EmptyTemplateName,
    #[error("template '{name}' has an empty id")]
    EmptyTemplateId { name: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
