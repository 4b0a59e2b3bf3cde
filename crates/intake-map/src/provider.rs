//! Mapping-suggestion providers.
//!
//! A provider receives the source columns of an upload (with sample values
//! and hints) and answers with one mapping per column.

use std::collections::BTreeMap;
use std::future::Future;
use std::time::Duration;

use tracing::debug;

use intake_model::{ColumnHint, ColumnMapping, Confidence, FieldTarget, TargetSchema};

use crate::error::ProviderError;
use crate::score::ScoringEngine;

/// Default minimum confidence for a fuzzy suggestion to be kept.
pub const DEFAULT_MIN_CONFIDENCE: u8 = 70;

/// Input to a suggestion provider.
#[derive(Debug, Clone)]
pub struct SuggestionRequest {
    pub schema: TargetSchema,
    /// Source column names in file order.
    pub columns: Vec<String>,
    /// Preview values per column.
    pub samples: BTreeMap<String, Vec<String>>,
    pub hints: BTreeMap<String, ColumnHint>,
}

impl SuggestionRequest {
    pub fn new(schema: TargetSchema, columns: Vec<String>) -> Self {
        Self {
            schema,
            columns,
            samples: BTreeMap::new(),
            hints: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_hints(mut self, hints: BTreeMap<String, ColumnHint>) -> Self {
        self.hints = hints;
        self
    }

    #[must_use]
    pub fn with_samples(mut self, samples: BTreeMap<String, Vec<String>>) -> Self {
        self.samples = samples;
        self
    }
}

/// Suggests a mapping for every source column.
pub trait SuggestionProvider {
    fn suggest(
        &self,
        request: &SuggestionRequest,
    ) -> impl Future<Output = Result<Vec<ColumnMapping>, ProviderError>> + Send;
}

/// Local provider backed by the fuzzy [`ScoringEngine`].
#[derive(Debug, Clone)]
pub struct FuzzySuggestionProvider {
    min_confidence: Confidence,
}

impl Default for FuzzySuggestionProvider {
    fn default() -> Self {
        Self {
            min_confidence: Confidence::saturating(u32::from(DEFAULT_MIN_CONFIDENCE)),
        }
    }
}

impl FuzzySuggestionProvider {
    pub fn new(min_confidence: Confidence) -> Self {
        Self { min_confidence }
    }

    pub fn min_confidence(&self) -> Confidence {
        self.min_confidence
    }

    /// Synchronous form of [`SuggestionProvider::suggest`].
    pub fn suggest_now(&self, request: &SuggestionRequest) -> Vec<ColumnMapping> {
        let engine = ScoringEngine::new(request.schema.clone(), request.hints.clone());
        let suggestions = engine.suggest_all(&request.columns, self.min_confidence);
        let mut by_column: BTreeMap<&str, ColumnMapping> = BTreeMap::new();
        for suggestion in &suggestions {
            debug!(
                column = %suggestion.source_column,
                field = %suggestion.target_field,
                explanation = %suggestion.score.explain(),
                "fuzzy suggestion"
            );
            by_column.insert(
                suggestion.source_column.as_str(),
                ColumnMapping::suggested(
                    suggestion.source_column.clone(),
                    FieldTarget::field(suggestion.target_field.clone()),
                    suggestion.score.confidence(),
                ),
            );
        }
        request
            .columns
            .iter()
            .map(|column| {
                by_column
                    .remove(column.as_str())
                    .unwrap_or_else(|| ColumnMapping::unmapped(column.clone()))
            })
            .collect()
    }
}

impl SuggestionProvider for FuzzySuggestionProvider {
    fn suggest(
        &self,
        request: &SuggestionRequest,
    ) -> impl Future<Output = Result<Vec<ColumnMapping>, ProviderError>> + Send {
        let mappings = self.suggest_now(request);
        async move { Ok(mappings) }
    }
}

/// Provider that answers with a fixed mapping list after a delay,
/// regardless of the request.
#[derive(Debug, Clone)]
pub struct FixtureSuggestionProvider {
    mappings: Vec<ColumnMapping>,
    delay: Duration,
}

impl FixtureSuggestionProvider {
    pub fn new(mappings: Vec<ColumnMapping>) -> Self {
        Self {
            mappings,
            delay: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl SuggestionProvider for FixtureSuggestionProvider {
    fn suggest(
        &self,
        _request: &SuggestionRequest,
    ) -> impl Future<Output = Result<Vec<ColumnMapping>, ProviderError>> + Send {
        let mappings = self.mappings.clone();
        let delay = self.delay;
        async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            Ok(mappings)
        }
    }
}

/// Provider that always fails; stands in for an unreachable service.
#[derive(Debug, Clone, Default)]
pub struct UnavailableProvider {
    pub reason: String,
}

impl SuggestionProvider for UnavailableProvider {
    fn suggest(
        &self,
        _request: &SuggestionRequest,
    ) -> impl Future<Output = Result<Vec<ColumnMapping>, ProviderError>> + Send {
        let reason = self.reason.clone();
        async move { Err(ProviderError::Unavailable(reason)) }
    }
}
