//! Fuzzy matching and scoring for column-to-field mapping.
//!
//! Uses Jaro-Winkler similarity against the field name and its aliases as the
//! base score, with adjustments for alias hits and type compatibility.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use rapidfuzz::distance::jaro_winkler;

use intake_model::{ColumnHint, Confidence, FieldKind, TargetField, TargetSchema};

use crate::utils::normalize_text;

const ALIAS_MATCH_BOOST: f32 = 1.05;
const TYPE_MISMATCH_PENALTY: f32 = 0.85;
const ALIAS_MATCH_MIN: f32 = 0.9;

/// Score for a single column-field pair.
#[derive(Debug, Clone)]
pub struct ColumnScore {
    /// Final score (0.0 to 1.0, may slightly exceed 1.0 with boosts).
    pub score: f32,
    /// Breakdown of score components for explainability.
    pub explanation: Vec<ScoreComponent>,
}

impl ColumnScore {
    /// Human-readable explanation of the score.
    pub fn explain(&self) -> String {
        self.explanation
            .iter()
            .map(|c| format!("{}: {:.0}%", c.name, c.value * 100.0))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Score as a suggestion confidence. Never reaches 100, which is
    /// reserved for user-selected mappings.
    pub fn confidence(&self) -> Confidence {
        Confidence::from_ratio(self.score).min(Confidence::MAX_SUGGESTED)
    }
}

/// A component contributing to the final score.
#[derive(Debug, Clone)]
pub struct ScoreComponent {
    pub name: &'static str,
    /// Component value (negative for penalties).
    pub value: f32,
    pub description: String,
}

/// A suggested mapping from column to field.
#[derive(Debug, Clone)]
pub struct Suggestion {
    pub source_column: String,
    pub target_field: String,
    pub score: ColumnScore,
}

/// Engine for scoring column-to-field matches.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    schema: TargetSchema,
    hints: BTreeMap<String, ColumnHint>,
}

impl ScoringEngine {
    pub fn new(schema: TargetSchema, hints: BTreeMap<String, ColumnHint>) -> Self {
        Self { schema, hints }
    }

    pub fn schema(&self) -> &TargetSchema {
        &self.schema
    }

    /// Score a single column against a named field.
    ///
    /// Returns `None` if the field doesn't exist in the schema.
    pub fn score(&self, column: &str, field_name: &str) -> Option<ColumnScore> {
        let field = self.schema.field(field_name)?;
        Some(self.compute_score(column, field))
    }

    /// Score all columns against a field, highest first.
    pub fn score_all_for_field(
        &self,
        field_name: &str,
        columns: &[String],
    ) -> Vec<(String, ColumnScore)> {
        let Some(field) = self.schema.field(field_name) else {
            return Vec::new();
        };
        let mut scores: Vec<_> = columns
            .iter()
            .map(|col| (col.clone(), self.compute_score(col, field)))
            .collect();
        scores.sort_by(|a, b| b.1.score.partial_cmp(&a.1.score).unwrap_or(Ordering::Equal));
        scores
    }

    /// Suggest best one-to-one mappings.
    ///
    /// Greedy assignment by descending score; each column and field is
    /// assigned at most once. Ties keep schema order, then column order.
    pub fn suggest_all(&self, columns: &[String], min_confidence: Confidence) -> Vec<Suggestion> {
        let mut candidates: Vec<(usize, usize, ColumnScore)> = Vec::new();
        for (field_idx, field) in self.schema.fields().iter().enumerate() {
            for (col_idx, column) in columns.iter().enumerate() {
                let score = self.compute_score(column, field);
                if score.confidence() >= min_confidence {
                    candidates.push((field_idx, col_idx, score));
                }
            }
        }

        candidates.sort_by(|a, b| {
            b.2.score
                .partial_cmp(&a.2.score)
                .unwrap_or(Ordering::Equal)
                .then(a.0.cmp(&b.0))
                .then(a.1.cmp(&b.1))
        });

        let mut assigned_columns = BTreeSet::new();
        let mut assigned_fields = BTreeSet::new();
        let mut suggestions = Vec::new();
        for (field_idx, col_idx, score) in candidates {
            if assigned_columns.contains(&col_idx) || assigned_fields.contains(&field_idx) {
                continue;
            }
            assigned_columns.insert(col_idx);
            assigned_fields.insert(field_idx);
            suggestions.push(Suggestion {
                source_column: columns[col_idx].clone(),
                target_field: self.schema.fields()[field_idx].name.clone(),
                score,
            });
        }
        suggestions
    }

    fn compute_score(&self, column: &str, field: &TargetField) -> ColumnScore {
        let mut components = Vec::new();
        let normalized_col = normalize_text(column);

        // 1. Base: best Jaro-Winkler similarity over name and aliases
        let name_sim = similarity(&normalized_col, &normalize_text(&field.name));
        let (alias_sim, alias) = field
            .aliases
            .iter()
            .map(|alias| (similarity(&normalized_col, &normalize_text(alias)), alias))
            .max_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal))
            .map_or((0.0, None), |(sim, alias)| (sim, Some(alias)));

        let mut score = name_sim.max(alias_sim);
        components.push(ScoreComponent {
            name: "Name similarity",
            value: name_sim,
            description: format!("'{}' vs '{}'", column, field.name),
        });

        // 2. Alias boost (+5%)
        if let Some(alias) = alias
            && alias_sim > name_sim
            && alias_sim >= ALIAS_MATCH_MIN
        {
            score = alias_sim * ALIAS_MATCH_BOOST;
            components.push(ScoreComponent {
                name: "Alias match",
                value: alias_sim,
                description: format!("'{column}' vs alias '{alias}'"),
            });
        }

        // 3. Type mismatch penalty (-15%)
        if let Some(hint) = self.hints.get(column)
            && hint.null_ratio < 1.0
            && type_mismatch(field.kind, hint.is_numeric)
        {
            score *= TYPE_MISMATCH_PENALTY;
            components.push(ScoreComponent {
                name: "Type mismatch",
                value: TYPE_MISMATCH_PENALTY - 1.0,
                description: if field.kind.is_numeric() {
                    "Field expects numbers, column is text".into()
                } else {
                    "Field expects text, column is numeric".into()
                },
            });
        }

        ColumnScore {
            score,
            explanation: components,
        }
    }
}

fn similarity(a: &str, b: &str) -> f32 {
    jaro_winkler::similarity(a.chars(), b.chars()) as f32
}

fn type_mismatch(kind: FieldKind, column_is_numeric: bool) -> bool {
    match kind {
        FieldKind::Amount | FieldKind::Rate => !column_is_numeric,
        FieldKind::Text => column_is_numeric,
        FieldKind::Date | FieldKind::Identifier => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numeric_hint(is_numeric: bool) -> ColumnHint {
        ColumnHint {
            is_numeric,
            unique_ratio: 1.0,
            null_ratio: 0.0,
        }
    }

    #[test]
    fn test_exact_name_match_scores_high() {
        let engine = ScoringEngine::new(TargetSchema::advance_recon(), BTreeMap::new());
        let score = engine.score("Payee", "Payee").unwrap();
        assert!(score.score > 0.95, "exact match should score > 0.95");
    }

    #[test]
    fn test_alias_match_is_boosted_and_capped() {
        let engine = ScoringEngine::new(TargetSchema::advance_recon(), BTreeMap::new());
        let score = engine.score("Vendor Name", "Payee").unwrap();
        assert!(score.score > 1.0);
        assert_eq!(score.confidence(), Confidence::MAX_SUGGESTED);
        assert!(score.explain().contains("Alias match"));
    }

    #[test]
    fn test_type_mismatch_penalizes_amount_fields() {
        let mut hints = BTreeMap::new();
        hints.insert("Invoice Amt".to_string(), numeric_hint(false));
        let penalized = ScoringEngine::new(TargetSchema::advance_recon(), hints);
        let plain = ScoringEngine::new(TargetSchema::advance_recon(), BTreeMap::new());

        let a = penalized.score("Invoice Amt", "Amount").unwrap();
        let b = plain.score("Invoice Amt", "Amount").unwrap();
        assert!(a.score < b.score);
        assert!(a.explain().contains("Type mismatch"));
    }

    #[test]
    fn test_identifier_fields_accept_numeric_columns() {
        let mut hints = BTreeMap::new();
        hints.insert("Loan #".to_string(), numeric_hint(true));
        let engine = ScoringEngine::new(TargetSchema::advance_recon(), hints);
        let score = engine.score("Loan #", "Loan Number").unwrap();
        assert!(!score.explain().contains("Type mismatch"));
    }

    #[test]
    fn test_suggest_all_is_one_to_one() {
        let engine = ScoringEngine::new(TargetSchema::advance_recon(), BTreeMap::new());
        let columns = vec!["Invoice Amt".to_string(), "Invoice Amount".to_string()];
        let suggestions = engine.suggest_all(&columns, Confidence::saturating(70));
        let amount: Vec<_> = suggestions
            .iter()
            .filter(|s| s.target_field == "Amount")
            .collect();
        assert_eq!(amount.len(), 1);
        assert_eq!(amount[0].source_column, "Invoice Amt");
    }

    #[test]
    fn test_unknown_field_has_no_score() {
        let engine = ScoringEngine::new(TargetSchema::advance_recon(), BTreeMap::new());
        assert!(engine.score("Payee", "Borrower Name").is_none());
        assert!(engine.score_all_for_field("Borrower Name", &[]).is_empty());
    }
}
