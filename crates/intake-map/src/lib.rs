//! Mapping suggestions and mapping templates.
//!
//! - [`provider`]: the suggestion-provider seam plus fuzzy and fixture
//!   providers
//! - [`score`]: Jaro-Winkler column/field scoring with explanations
//! - [`store`] and [`repository`]: template lookup, in memory or on disk

pub mod error;
pub mod provider;
pub mod repository;
pub mod score;
pub mod store;
pub mod utils;

pub use error::{ProviderError, TemplateError};
pub use provider::{
    DEFAULT_MIN_CONFIDENCE, FixtureSuggestionProvider, FuzzySuggestionProvider,
    SuggestionProvider, SuggestionRequest, UnavailableProvider,
};
pub use repository::{StoredTemplate, TemplateMetadata, TemplateRepository};
pub use score::{ColumnScore, ScoreComponent, ScoringEngine, Suggestion};
pub use store::{InMemoryTemplateStore, TemplateStore};
pub use utils::{normalize_text, template_id_from_name};
