//! Field targets and confidence scores.
//!
//! A column is either mapped to a named schema field or left on the
//! `-- Unmapped --` sentinel. Confidence is an integer percentage where
//! 100 means the user picked the field directly.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Display text of the unmapped selection.
pub const UNMAPPED_LABEL: &str = "-- Unmapped --";

/// The field a source column is mapped to.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldTarget {
    /// Sentinel selection; never satisfies a required field.
    #[default]
    Unmapped,
    /// A named field of the target schema.
    Field(String),
}

impl FieldTarget {
    /// Build a target from a field name, treating the sentinel text and
    /// blank input as unmapped.
    pub fn field(name: impl Into<String>) -> Self {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() || trimmed == UNMAPPED_LABEL {
            Self::Unmapped
        } else {
            Self::Field(trimmed.to_string())
        }
    }

    pub fn is_mapped(&self) -> bool {
        matches!(self, Self::Field(_))
    }

    /// Returns the field name, or `None` for the sentinel.
    pub fn field_name(&self) -> Option<&str> {
        match self {
            Self::Unmapped => None,
            Self::Field(name) => Some(name),
        }
    }

    /// True if this target is the named field.
    pub fn is(&self, field: &str) -> bool {
        self.field_name() == Some(field)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Unmapped => UNMAPPED_LABEL,
            Self::Field(name) => name,
        }
    }
}

impl fmt::Display for FieldTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldTarget {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::field(s))
    }
}

impl Serialize for FieldTarget {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldTarget {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::field(s))
    }
}

/// Mapping confidence as an integer percentage (0–100).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u32", into = "u8")]
pub struct Confidence(u8);

impl Confidence {
    /// No confidence; used for unmapped columns.
    pub const NONE: Self = Self(0);
    /// A user-asserted mapping.
    pub const CERTAIN: Self = Self(100);
    /// Highest score an automatic suggestion may report.
    pub const MAX_SUGGESTED: Self = Self(99);

    pub fn new(value: u32) -> Result<Self, ModelError> {
        u8::try_from(value)
            .ok()
            .filter(|v| *v <= 100)
            .map(Self)
            .ok_or(ModelError::InvalidConfidence(value))
    }

    /// Build from a confidence, clamping out-of-range input to 0–100.
    pub fn saturating(value: u32) -> Self {
        Self(value.min(100) as u8)
    }

    /// Convert a 0.0–1.0 score to a percentage, rounding to nearest.
    pub fn from_ratio(ratio: f32) -> Self {
        if !ratio.is_finite() || ratio <= 0.0 {
            return Self::NONE;
        }
        Self::saturating((ratio * 100.0).round() as u32)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn tier(self) -> ConfidenceTier {
        match self.0 {
            90.. => ConfidenceTier::High,
            70..=89 => ConfidenceTier::Medium,
            1..=69 => ConfidenceTier::Low,
            0 => ConfidenceTier::None,
        }
    }
}

impl TryFrom<u32> for Confidence {
    type Error = ModelError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Confidence> for u8 {
    fn from(value: Confidence) -> Self {
        value.0
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Coarse confidence buckets used when presenting mappings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceTier {
    /// Zero confidence (unmapped).
    None,
    /// Below 70%; needs manual confirmation.
    Low,
    /// 70–89%; should be reviewed.
    Medium,
    /// 90% and above.
    High,
}

impl ConfidenceTier {
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
