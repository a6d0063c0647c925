//! Export envelope tests

use chrono::{TimeZone, Utc};
use provenance_ledger::config::ExportSettings;
use provenance_ledger::provenance::{
    build_chain, export_chain_json, load_export, ExportMetadata,
};
use tempfile::tempdir;

mod common;
use common::*;

#[test]
fn test_scenario_export_contains_root() {
    let chain = build_chain("doc-42", &scenario_versions()).unwrap();
    let metadata = ExportMetadata::new(
        "Provenance Ledger v1",
        Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap(),
        vec!["SOC2 Type II".to_string()],
    );

    let json = export_chain_json(&chain, metadata).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    let root = value["chain"]["merkleRoot"].as_str().unwrap();
    assert_eq!(root.len(), 64);
    assert!(root.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    assert_eq!(value["verification"]["valid"], true);
    assert_eq!(value["verification"]["subjectId"], "doc-42");
    assert_eq!(value["_compliance"][0], "SOC2 Type II");
}

#[test]
fn test_export_roundtrip_through_file() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("doc-42.provenance.json");

    let exporter = ExportSettings::default().exporter();
    let export = exporter.export(&create_test_chain("doc-42", 4));
    exporter.save_export(&export, &path).unwrap();

    let loaded = load_export(&path).unwrap();
    assert_eq!(loaded.chain, export.chain);
    assert!(loaded.is_consistent());
    assert!(loaded.reverify().valid);
}

#[test]
fn test_edited_file_fails_reverification() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("doc-42.provenance.json");

    let exporter = ExportSettings::default().exporter();
    let export = exporter.export(&create_test_chain("doc-42", 3));
    exporter.save_export(&export, &path).unwrap();

    let edited = std::fs::read_to_string(&path)
        .unwrap()
        .replacen(&export.chain.events[1].content_hash, &"b".repeat(64), 1);
    std::fs::write(&path, edited).unwrap();

    let loaded = load_export(&path).unwrap();
    assert_eq!(loaded.chain.events[1].content_hash, "b".repeat(64));
    assert!(!loaded.is_consistent());
    assert!(!loaded.reverify().valid);
}
