//! Integration tests for profile resolution with custom schema files.

use intake_cli::profiles::{load_schema, resolve_profile};
use tempfile::TempDir;

#[test]
fn test_schema_file_replaces_profile_schema() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("schema.json");
    std::fs::write(
        &path,
        r#"{
            "name": "Escrow Advances",
            "fields": [
                {"name": "Loan Number", "required": true, "kind": "identifier"},
                {"name": "Disbursed", "kind": "amount", "aliases": ["Disb Amt"]}
            ]
        }"#,
    )
    .unwrap();

    let profile = resolve_profile("advance-recon", Some(&path)).unwrap();

    assert_eq!(profile.key, "advance-recon");
    assert_eq!(profile.schema.name(), "Escrow Advances");
    let required: Vec<&str> = profile
        .schema
        .required_fields()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(required, vec!["Loan Number"]);
}

#[test]
fn test_schema_with_duplicate_fields_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dupes.json");
    std::fs::write(
        &path,
        r#"{"name": "Dupes", "fields": [{"name": "Amount"}, {"name": " Amount "}]}"#,
    )
    .unwrap();

    let error = load_schema(&path).unwrap_err();
    assert!(format!("{error:#}").contains("Amount"));
}

#[test]
fn test_missing_schema_file_names_the_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.json");
    let error = load_schema(&path).unwrap_err();
    assert!(error.to_string().contains("absent.json"));
}
