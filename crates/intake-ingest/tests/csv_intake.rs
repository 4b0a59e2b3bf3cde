use std::fs;
use std::path::PathBuf;

use intake_ingest::{CsvIntake, FileIntake, FileRef, IngestError};
use tempfile::TempDir;

fn write_csv(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write csv");
    path
}

const LEDGER: &str = "\
Trans Date,Vendor Name,Description,Invoice Amt,Loan #,Inv ID,Status,Category,GL Code
01/15/2025,ABC Property Services,Property Inspection Fee,\"1,250.00\",1039457892,INV-2025-0042,Paid,Inspection,5210-01
01/18/2025,National Title Co.,Title Search Fee,875.50,1039457893,INV-2025-0043,Paid,Title,5220-03

01/20/2025,Metro Appraisal Group,Appraisal Fee,450.00,1039457894,INV-2025-0044,Pending,Appraisal,5230-02
";

#[test]
fn test_reads_headers_rows_and_hints() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "Advance_Ledger_2025Q1.csv", LEDGER);
    let file = FileRef::from_path(&path).expect("file ref");
    let preview = CsvIntake::default().intake(&file).expect("intake");

    let names: Vec<&str> = preview.column_names().collect();
    assert_eq!(
        names,
        vec![
            "Trans Date",
            "Vendor Name",
            "Description",
            "Invoice Amt",
            "Loan #",
            "Inv ID",
            "Status",
            "Category",
            "GL Code"
        ]
    );
    assert_eq!(preview.columns[4].position, 4);
    // Blank line skipped.
    assert_eq!(preview.row_count, 3);
    assert_eq!(preview.rows[0][3], "1,250.00");

    let amount = preview.hints.get("Invoice Amt").expect("amount hint");
    assert!(amount.is_numeric);
    let vendor = preview.hints.get("Vendor Name").expect("vendor hint");
    assert!(!vendor.is_numeric);
    assert!((vendor.unique_ratio - 1.0).abs() < 1e-6);

    assert_eq!(
        preview.samples("Status"),
        vec!["Paid", "Paid", "Pending"]
    );
}

#[test]
fn test_preview_is_capped_but_row_count_is_total() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "ledger.csv", LEDGER);
    let file = FileRef::from_path(&path).unwrap();
    let preview = CsvIntake::default()
        .with_preview_rows(1)
        .intake(&file)
        .unwrap();
    assert_eq!(preview.rows.len(), 1);
    assert_eq!(preview.row_count, 3);

    // Hints cover rows beyond the preview.
    let status = preview.hints.get("Status").unwrap();
    assert!((status.unique_ratio - 2.0 / 3.0).abs() < 1e-6);
    let amount = preview.hints.get("Invoice Amt").unwrap();
    assert!(amount.is_numeric);
    assert!(amount.null_ratio.abs() < 1e-6);
}

#[test]
fn test_hints_match_in_memory_preview() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "ledger.csv", LEDGER);
    let file = FileRef::from_path(&path).unwrap();
    let streamed = CsvIntake::default().intake(&file).unwrap();

    let headers: Vec<String> = streamed.column_names().map(ToString::to_string).collect();
    let in_memory = intake_ingest::TabularPreview::from_rows(headers, streamed.rows.clone());
    assert_eq!(streamed.hints, in_memory.hints);
}

#[test]
fn test_short_rows_are_padded() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "short.csv", "A,B,C\n1\n2,x,y\n");
    let file = FileRef::from_path(&path).unwrap();
    let preview = CsvIntake::default().intake(&file).unwrap();
    assert_eq!(preview.rows[0], vec!["1", "", ""]);
    let c = preview.hints.get("C").unwrap();
    assert!((c.null_ratio - 0.5).abs() < 1e-6);
}

#[test]
fn test_semicolon_delimiter() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "tape.csv", "Loan #;Borrower\n2048119301;Sarah Williams\n");
    let file = FileRef::from_path(&path).unwrap();
    let preview = CsvIntake::default()
        .with_delimiter(b';')
        .intake(&file)
        .unwrap();
    assert_eq!(preview.columns.len(), 2);
    assert_eq!(preview.rows[0][1], "Sarah Williams");
}

#[test]
fn test_empty_file_has_no_header() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "empty.csv", "\n  \n");
    let file = FileRef::from_path(&path).unwrap();
    let err = CsvIntake::default().intake(&file).unwrap_err();
    assert!(matches!(err, IngestError::NoHeader { .. }));
}

#[test]
fn test_duplicate_and_empty_headers_are_malformed() {
    let dir = TempDir::new().unwrap();
    let dup = write_csv(&dir, "dup.csv", "Rate,Rate\n1,2\n");
    let err = CsvIntake::default()
        .intake(&FileRef::from_path(&dup).unwrap())
        .unwrap_err();
    assert!(matches!(err, IngestError::DuplicateHeader { ref name, .. } if name == "Rate"));

    let empty = write_csv(&dir, "gap.csv", "Rate,,Type\n1,2,3\n");
    let err = CsvIntake::default()
        .intake(&FileRef::from_path(&empty).unwrap())
        .unwrap_err();
    assert!(matches!(err, IngestError::EmptyHeader { position: 1, .. }));
}

#[test]
fn test_missing_file_is_io_error() {
    let err = FileRef::from_path("/definitely/not/here.csv").unwrap_err();
    assert!(matches!(err, IngestError::Io { .. }));
}
