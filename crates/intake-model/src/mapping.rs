//! Source columns and their mapping onto target fields.

use serde::{Deserialize, Serialize};

use crate::target::{Confidence, FieldTarget};

/// A column header parsed from an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceColumn {
    pub name: String,
    /// Zero-based ordinal position in the file.
    pub position: usize,
}

impl SourceColumn {
    pub fn new(name: impl Into<String>, position: usize) -> Self {
        Self {
            name: name.into(),
            position,
        }
    }

    /// Build columns from headers in file order.
    pub fn from_headers<I, S>(headers: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        headers
            .into_iter()
            .enumerate()
            .map(|(position, name)| Self::new(name, position))
            .collect()
    }
}

/// Hints about a source column's values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnHint {
    /// True if every non-empty value parses as a number.
    pub is_numeric: bool,
    /// Ratio of unique values to non-empty values (0.0 to 1.0).
    pub unique_ratio: f64,
    /// Ratio of empty values to total rows (0.0 to 1.0).
    pub null_ratio: f64,
}

/// Where a mapping's current target came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingOrigin {
    #[default]
    Unmapped,
    Suggested,
    Template,
    Manual,
}

impl MappingOrigin {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unmapped => "unmapped",
            Self::Suggested => "suggested",
            Self::Template => "template",
            Self::Manual => "manual",
        }
    }
}

/// The mapping of one source column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub source_column: String,
    pub target: FieldTarget,
    confidence: Confidence,
    #[serde(default)]
    pub origin: MappingOrigin,
}

impl ColumnMapping {
    pub fn unmapped(source_column: impl Into<String>) -> Self {
        Self {
            source_column: source_column.into(),
            target: FieldTarget::Unmapped,
            confidence: Confidence::NONE,
            origin: MappingOrigin::Unmapped,
        }
    }

    /// A user-selected mapping. Certain unless the user picked the sentinel.
    pub fn manual(source_column: impl Into<String>, target: FieldTarget) -> Self {
        let confidence = if target.is_mapped() {
            Confidence::CERTAIN
        } else {
            Confidence::NONE
        };
        Self {
            source_column: source_column.into(),
            target,
            confidence,
            origin: MappingOrigin::Manual,
        }
    }

    /// A provider suggestion with the provider's score.
    pub fn suggested(
        source_column: impl Into<String>,
        target: FieldTarget,
        confidence: Confidence,
    ) -> Self {
        if !target.is_mapped() {
            return Self::unmapped(source_column);
        }
        Self {
            source_column: source_column.into(),
            target,
            confidence,
            origin: MappingOrigin::Suggested,
        }
    }

    /// A mapping taken from a saved template.
    pub fn from_template(source_column: impl Into<String>, target: FieldTarget) -> Self {
        let mut mapping = Self::manual(source_column, target);
        mapping.origin = MappingOrigin::Template;
        mapping
    }

    pub fn is_mapped(&self) -> bool {
        self.target.is_mapped()
    }

    /// Confidence as presented: always zero for unmapped columns.
    pub fn reported_confidence(&self) -> Confidence {
        if self.target.is_mapped() {
            self.confidence
        } else {
            Confidence::NONE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_sentinel_reports_zero() {
        let mapping = ColumnMapping::manual("Status", FieldTarget::Unmapped);
        assert_eq!(mapping.reported_confidence(), Confidence::NONE);
        assert_eq!(mapping.origin, MappingOrigin::Manual);
    }

    #[test]
    fn test_suggestion_to_sentinel_is_plain_unmapped() {
        let mapping =
            ColumnMapping::suggested("GL Code", FieldTarget::Unmapped, Confidence::saturating(40));
        assert_eq!(mapping, ColumnMapping::unmapped("GL Code"));
    }

    #[test]
    fn test_columns_keep_file_order() {
        let columns = SourceColumn::from_headers(["Loan #", "Borrower"]);
        assert_eq!(columns[1], SourceColumn::new("Borrower", 1));
    }
}
