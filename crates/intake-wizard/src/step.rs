//! Wizard steps.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Total number of steps in the wizard.
pub const TOTAL_STEPS: u8 = 3;

/// The three steps of an upload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[default]
    SourceUpload,
    ColumnMapping,
    ReviewSubmit,
}

impl WizardStep {
    /// Convert a 1-based step number.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::SourceUpload),
            2 => Some(Self::ColumnMapping),
            3 => Some(Self::ReviewSubmit),
            _ => None,
        }
    }

    /// The 1-based step number.
    pub fn number(self) -> u8 {
        match self {
            Self::SourceUpload => 1,
            Self::ColumnMapping => 2,
            Self::ReviewSubmit => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::SourceUpload => "Source Upload",
            Self::ColumnMapping => "Column Mapping",
            Self::ReviewSubmit => "Review & Submit",
        }
    }

    pub fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        self.number().checked_sub(1).and_then(Self::from_number)
    }

    pub fn is_last(self) -> bool {
        self.number() == TOTAL_STEPS
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {} ({})", self.number(), self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_round_trip() {
        for n in 1..=TOTAL_STEPS {
            let step = WizardStep::from_number(n).unwrap();
            assert_eq!(step.number(), n);
        }
        assert_eq!(WizardStep::from_number(0), None);
        assert_eq!(WizardStep::from_number(4), None);
    }

    #[test]
    fn test_neighbours() {
        assert_eq!(WizardStep::SourceUpload.previous(), None);
        assert_eq!(
            WizardStep::SourceUpload.next(),
            Some(WizardStep::ColumnMapping)
        );
        assert_eq!(WizardStep::ReviewSubmit.next(), None);
        assert!(WizardStep::ReviewSubmit.is_last());
    }
}
