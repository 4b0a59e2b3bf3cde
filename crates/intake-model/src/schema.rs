//! Target schemas: the destination fields a tabular upload maps into.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::target::UNMAPPED_LABEL;

/// Value shape expected by a target field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    #[default]
    Text,
    Date,
    Amount,
    Rate,
    Identifier,
}

impl FieldKind {
    /// True for kinds whose values are expected to parse as numbers.
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Amount | Self::Rate)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Date => "date",
            Self::Amount => "amount",
            Self::Rate => "rate",
            Self::Identifier => "identifier",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A destination field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetField {
    pub name: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub kind: FieldKind,
    /// Alternative header spellings seen in source files.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

impl TargetField {
    pub fn required(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            required: true,
            kind,
            aliases: Vec::new(),
        }
    }

    pub fn optional(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            required: false,
            kind,
            aliases: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }
}

/// An ordered set of uniquely named destination fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSchema")]
pub struct TargetSchema {
    name: String,
    fields: Vec<TargetField>,
}

#[derive(Deserialize)]
struct RawSchema {
    name: String,
    fields: Vec<TargetField>,
}

impl TryFrom<RawSchema> for TargetSchema {
    type Error = ModelError;

    fn try_from(raw: RawSchema) -> Result<Self> {
        Self::new(raw.name, raw.fields)
    }
}

impl TargetSchema {
    /// Build a schema, trimming field names and rejecting empty, reserved or
    /// duplicate names.
    pub fn new(name: impl Into<String>, fields: Vec<TargetField>) -> Result<Self> {
        let name = name.into();
        let mut seen = BTreeSet::new();
        let mut cleaned = Vec::with_capacity(fields.len());
        for mut field in fields {
            let trimmed = field.name.trim();
            if trimmed.is_empty() {
                return Err(ModelError::EmptyFieldName { schema: name });
            }
            if trimmed == UNMAPPED_LABEL {
                return Err(ModelError::ReservedFieldName(trimmed.to_string()));
            }
            if !seen.insert(trimmed.to_string()) {
                return Err(ModelError::DuplicateField {
                    schema: name,
                    field: trimmed.to_string(),
                });
            }
            field.name = trimmed.to_string();
            cleaned.push(field);
        }
        Ok(Self {
            name,
            fields: cleaned,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[TargetField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&TargetField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &TargetField> {
        self.fields.iter().filter(|f| f.required)
    }

    /// Advance-ledger schema used by invoice reconciliation uploads.
    pub fn advance_recon() -> Self {
        let fields = vec![
            TargetField::required("Date", FieldKind::Date).with_aliases([
                "Trans Date",
                "Transaction Date",
                "Posted Date",
            ]),
            TargetField::required("Payee", FieldKind::Text).with_aliases([
                "Vendor Name",
                "Vendor",
                "Payee Name",
            ]),
            TargetField::required("Expense Description", FieldKind::Text).with_aliases([
                "Description",
                "Expense Desc",
                "Memo",
            ]),
            TargetField::required("Amount", FieldKind::Amount).with_aliases([
                "Invoice Amt",
                "Invoice Amount",
                "Amt",
            ]),
            TargetField::required("Loan Number", FieldKind::Identifier).with_aliases([
                "Loan #",
                "Loan No",
                "Loan ID",
            ]),
            TargetField::required("Invoice ID", FieldKind::Identifier).with_aliases([
                "Inv ID",
                "Invoice #",
                "Invoice Number",
            ]),
        ];
        Self::builtin("Advance Ledger", fields)
    }

    /// Loan-tape schema used by document audits.
    pub fn loan_tape() -> Self {
        let fields = vec![
            TargetField::required("Loan Number", FieldKind::Identifier).with_aliases([
                "Loan #",
                "Loan No",
                "Loan ID",
            ]),
            TargetField::required("Borrower Name", FieldKind::Text)
                .with_aliases(["Borrower", "Borrower Full Name"]),
            TargetField::required("Property Address", FieldKind::Text)
                .with_aliases(["Address", "Property Addr"]),
            TargetField::required("Original Balance", FieldKind::Amount)
                .with_aliases(["Orig Balance", "Original Amount", "Orig Bal"]),
            TargetField::optional("Current UPB", FieldKind::Amount)
                .with_aliases(["Current Balance", "UPB", "Unpaid Principal Balance"]),
            TargetField::required("Interest Rate", FieldKind::Rate)
                .with_aliases(["Rate", "Note Rate", "Int Rate"]),
            TargetField::optional("Maturity Date", FieldKind::Date)
                .with_aliases(["Maturity", "Maturity Dt"]),
            TargetField::optional("Origination Date", FieldKind::Date)
                .with_aliases(["Orig Date", "Note Date"]),
            TargetField::optional("Loan Type", FieldKind::Text)
                .with_aliases(["Type", "Product Type"]),
            TargetField::optional("Occupancy", FieldKind::Text)
                .with_aliases(["Occupancy Status", "Occupancy Type"]),
        ];
        Self::builtin("Loan Tape", fields)
    }

    fn builtin(name: &str, fields: Vec<TargetField>) -> Self {
        Self {
            name: name.to_string(),
            fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_schemas_have_unique_names() {
        for schema in [TargetSchema::advance_recon(), TargetSchema::loan_tape()] {
            let rebuilt = TargetSchema::new(schema.name(), schema.fields().to_vec());
            assert!(rebuilt.is_ok(), "{} should validate", schema.name());
        }
    }

    #[test]
    fn test_loan_tape_required_set() {
        let schema = TargetSchema::loan_tape();
        let required: Vec<&str> = schema.required_fields().map(|f| f.name.as_str()).collect();
        assert_eq!(
            required,
            vec![
                "Loan Number",
                "Borrower Name",
                "Property Address",
                "Original Balance",
                "Interest Rate"
            ]
        );
    }
}
