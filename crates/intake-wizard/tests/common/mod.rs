#![allow(dead_code)]

use intake_ingest::{FileRef, TabularPreview};
use intake_model::{
    ColumnMapping, Confidence, FieldKind, FieldTarget, MappingTemplate, TargetField, TargetSchema,
    TemplateEntry,
};
use intake_wizard::{WizardProfile, WizardSession};

pub const LEDGER_HEADERS: [&str; 9] = [
    "Trans Date",
    "Vendor Name",
    "Description",
    "Invoice Amt",
    "Loan #",
    "Inv ID",
    "Status",
    "Category",
    "GL Code",
];

pub fn preview(headers: &[&str]) -> TabularPreview {
    let headers: Vec<String> = headers.iter().map(ToString::to_string).collect();
    let row: Vec<String> = headers.iter().map(|h| format!("{h} value")).collect();
    TabularPreview::from_rows(headers, vec![row.clone(), row])
}

pub fn ledger_file() -> FileRef {
    FileRef::from_bytes("Carrington_Advance_Ledger_Q1.csv", b"Trans Date,Vendor Name\n")
}

pub fn session(profile: WizardProfile, headers: &[&str]) -> WizardSession {
    let mut session = WizardSession::new(profile);
    session.accept_parsed(ledger_file(), preview(headers));
    session
}

/// Schema requiring Date, Payee, Amount, Loan Number and Invoice ID.
pub fn five_field_profile() -> WizardProfile {
    let schema = TargetSchema::new(
        "Advance Ledger",
        vec![
            TargetField::required("Date", FieldKind::Date),
            TargetField::required("Payee", FieldKind::Text),
            TargetField::optional("Expense Description", FieldKind::Text),
            TargetField::required("Amount", FieldKind::Amount),
            TargetField::required("Loan Number", FieldKind::Identifier),
            TargetField::required("Invoice ID", FieldKind::Identifier),
        ],
    )
    .unwrap();
    WizardProfile::custom(schema)
}

fn suggested(column: &str, field: &str, confidence: u32) -> ColumnMapping {
    ColumnMapping::suggested(column, FieldTarget::field(field), Confidence::saturating(confidence))
}

/// Auto-mapping answer covering six of the nine ledger columns.
pub fn ledger_suggestions() -> Vec<ColumnMapping> {
    vec![
        suggested("Trans Date", "Date", 95),
        suggested("Vendor Name", "Payee", 91),
        suggested("Description", "Expense Description", 93),
        suggested("Invoice Amt", "Amount", 97),
        suggested("Loan #", "Loan Number", 94),
        suggested("Inv ID", "Invoice ID", 92),
        ColumnMapping::unmapped("Status"),
        ColumnMapping::unmapped("Category"),
        ColumnMapping::unmapped("GL Code"),
    ]
}

pub fn carrington_template() -> MappingTemplate {
    MappingTemplate::new(
        "cmt1",
        "Carrington Standard Export",
        vec![
            TemplateEntry::new("Trans Date", "Date"),
            TemplateEntry::new("Vendor Name", "Payee"),
            TemplateEntry::new("Description", "Expense Description"),
            TemplateEntry::new("Invoice Amt", "Amount"),
            TemplateEntry::new("Loan #", "Loan Number"),
            TemplateEntry::new("Inv ID", "Invoice ID"),
        ],
    )
    .unwrap()
    .with_description("Default column mapping for Carrington servicer advance exports")
}
