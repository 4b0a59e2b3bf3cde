use std::fs;

use intake_map::{TemplateError, TemplateRepository, TemplateStore};
use intake_model::{FieldTarget, MappingTemplate, TemplateEntry};
use tempfile::TempDir;

fn sample_template(id: &str, name: &str) -> MappingTemplate {
    MappingTemplate::new(
        id,
        name,
        vec![
            TemplateEntry::new("Trans Date", "Date"),
            TemplateEntry::new("Vendor Name", "Payee"),
            TemplateEntry::new("Status", "-- Unmapped --"),
        ],
    )
    .unwrap()
    .with_description("Default column mapping for servicer advance exports")
}

#[test]
fn test_repository_save_and_load() {
    let dir = TempDir::new().unwrap();
    let repo = TemplateRepository::new(dir.path().join("templates")).expect("create repo");

    let path = repo
        .save(&sample_template("cmt1", "Carrington Standard Export"))
        .expect("save template");
    assert!(path.exists());
    assert!(path.to_string_lossy().ends_with("cmt1.json"));

    let stored = repo
        .load("cmt1")
        .expect("load template")
        .expect("template should exist");
    assert_eq!(stored.version, "1.0");
    assert_eq!(stored.template.name, "Carrington Standard Export");
    assert_eq!(stored.template.mappings.len(), 3);
    assert_eq!(
        stored.template.entry_for("Status").map(|e| &e.target),
        Some(&FieldTarget::Unmapped)
    );
}

#[test]
fn test_repository_load_nonexistent() {
    let dir = TempDir::new().unwrap();
    let repo = TemplateRepository::new(dir.path()).unwrap();
    assert!(repo.load("missing").unwrap().is_none());
    assert!(matches!(repo.require("missing"), Err(TemplateError::NotFound(_))));
}

#[test]
fn test_repository_exists_and_delete() {
    let dir = TempDir::new().unwrap();
    let repo = TemplateRepository::new(dir.path()).unwrap();
    assert!(!repo.exists("cmt1"));

    repo.save(&sample_template("cmt1", "Carrington")).unwrap();
    assert!(repo.exists("cmt1"));

    assert!(repo.delete("cmt1").unwrap());
    assert!(!repo.exists("cmt1"));
    assert!(!repo.delete("cmt1").unwrap());
}

#[test]
fn test_repository_list_sorted_and_skips_garbage() {
    let dir = TempDir::new().unwrap();
    let repo = TemplateRepository::new(dir.path()).unwrap();
    repo.save(&sample_template("cmt2", "Wellington Ledger Format"))
        .unwrap();
    repo.save(&sample_template("cmt1", "Carrington Standard Export"))
        .unwrap();
    fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
    fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();

    let listed = repo.list().unwrap();
    let ids: Vec<&str> = listed.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["cmt1", "cmt2"]);
    assert_eq!(listed[0].mapping_count, 3);

    let via_trait = TemplateStore::list(&repo).unwrap();
    assert_eq!(via_trait.len(), 2);
}

#[test]
fn test_repository_as_store_round_trips() {
    let dir = TempDir::new().unwrap();
    let mut repo = TemplateRepository::new(dir.path()).unwrap();
    TemplateStore::save(&mut repo, sample_template("servicer-abc", "Servicer ABC")).unwrap();
    let fetched = TemplateStore::get(&repo, "servicer-abc").unwrap().unwrap();
    assert_eq!(fetched.description, "Default column mapping for servicer advance exports");
}

#[test]
fn test_repository_keeps_ids_distinct() {
    let dir = TempDir::new().unwrap();
    let repo = TemplateRepository::new(dir.path()).unwrap();
    repo.save(&sample_template("servicer-abc", "Servicer ABC v2"))
        .unwrap();

    let err = repo
        .save(&sample_template("Servicer ABC", "Servicer ABC v1"))
        .unwrap_err();
    assert!(matches!(err, TemplateError::InvalidId(id) if id == "Servicer ABC"));
    let err = repo.save(&sample_template("---", "Dashes")).unwrap_err();
    assert!(matches!(err, TemplateError::InvalidId(_)));

    assert!(repo.load("Servicer ABC").unwrap().is_none());
    assert!(matches!(
        repo.require("Servicer ABC"),
        Err(TemplateError::NotFound(_))
    ));
    assert!(!repo.exists("Servicer ABC"));
    assert!(!repo.delete("Servicer ABC").unwrap());

    let listed = repo.list().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "Servicer ABC v2");
}

#[test]
fn test_repository_rejects_file_holding_another_id() {
    let dir = TempDir::new().unwrap();
    let repo = TemplateRepository::new(dir.path()).unwrap();
    let written = repo.save(&sample_template("cmt1", "Carrington")).unwrap();
    fs::rename(&written, dir.path().join("cmt9.json")).unwrap();

    let err = repo.load("cmt9").unwrap_err();
    assert!(matches!(
        err,
        TemplateError::IdMismatch { ref expected, ref found, .. }
            if expected == "cmt9" && found == "cmt1"
    ));
}
