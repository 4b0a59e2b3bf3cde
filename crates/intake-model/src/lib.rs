//! Data model for servicing file intake: target schemas, column mappings and
//! mapping templates.

pub mod error;
pub mod mapping;
pub mod schema;
pub mod target;
pub mod template;

pub use error::{ModelError, Result};
pub use mapping::{ColumnHint, ColumnMapping, MappingOrigin, SourceColumn};
pub use schema::{FieldKind, TargetField, TargetSchema};
pub use target::{Confidence, ConfidenceTier, FieldTarget, UNMAPPED_LABEL};
pub use template::{MappingTemplate, TemplateEntry};
