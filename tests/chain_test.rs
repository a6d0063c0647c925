//! Chain construction and verification tests

use provenance_ledger::provenance::{
    build_chain, find_tampered_events, verify_chain, ChainBuilder, HashScheme, MutationType,
    GENESIS_HASH,
};
use provenance_ledger::source::StaticVersionSource;

mod common;
use common::*;

#[test]
fn test_scenario_two_versions() {
    let chain = build_chain("doc-42", &scenario_versions()).unwrap();

    assert!(chain.events.len() >= 2);
    assert_eq!(chain.events[0].mutation_type, MutationType::Genesis);
    assert_eq!(chain.events[0].version, "v1");
    assert_eq!(chain.events[1].mutation_type, MutationType::Evolution);
    assert_eq!(chain.events[1].version, "v2");
    // "doc-42" seeds exactly one synthetic sub-event after v2
    assert_eq!(chain.events.len(), 3);
    assert_eq!(chain.events[2].mutation_type, MutationType::QualityGate);
    assert_eq!(chain.events[2].id, format!("{}-evt-002", chain.chain_id));

    let result = verify_chain(&chain);
    assert!(result.valid, "{}", result.message);
    assert!(chain.valid);
}

#[test]
fn test_link_invariant_across_sizes() {
    for versions in 1..=8 {
        let chain = create_test_chain("runbook-nginx-tls", versions);

        assert_eq!(chain.events[0].previous_hash, GENESIS_HASH);
        for window in chain.events.windows(2) {
            assert_eq!(window[1].previous_hash, window[0].content_hash);
            assert_eq!(window[1].index, window[0].index + 1);
        }
        assert!(verify_chain(&chain).valid);
    }
}

#[test]
fn test_build_is_deterministic_per_scheme() {
    for scheme in [HashScheme::Mixing, HashScheme::Sha256] {
        let builder = ChainBuilder::new(scheme);
        let first = builder.build("doc-42", &create_test_versions(5)).unwrap();
        let second = builder.build("doc-42", &create_test_versions(5)).unwrap();

        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }
}

#[test]
fn test_tamper_any_content_hash() {
    let chain = create_test_chain("doc-42", 4);

    for i in 0..chain.events.len() {
        let mut tampered = chain.clone();
        tampered.events[i].content_hash = "d".repeat(64);

        let result = verify_chain(&tampered);
        assert!(!result.valid);
        assert!(!result.merkle_root_verified);
        let broken = result.broken_at_index.expect("tampering must break a link");
        assert!(broken >= i, "broken at {} before tampered event {}", broken, i);
        assert!(find_tampered_events(&tampered).contains(&i));
    }
}

#[test]
fn test_reordered_events_detected() {
    let mut chain = create_test_chain("doc-42", 3);
    chain.events.swap(1, 2);

    let result = verify_chain(&chain);
    assert!(!result.valid);
    assert_eq!(result.broken_at_index, Some(1));
}

#[test]
fn test_build_from_source() {
    let source = StaticVersionSource::new().with_subject("doc-42", scenario_versions());
    let builder = ChainBuilder::default();

    let chain = builder.build_from_source(&source, "doc-42").unwrap();
    assert_eq!(chain, build_chain("doc-42", &scenario_versions()).unwrap());

    let err = builder.build_from_source(&source, "doc-43").unwrap_err();
    assert!(err.is_input_error());
}

#[test]
fn test_empty_history_rejected() {
    let source = StaticVersionSource::new().with_subject("doc-42", Vec::new());
    let err = ChainBuilder::default()
        .build_from_source(&source, "doc-42")
        .unwrap_err();
    assert!(err.is_input_error());
    assert!(err.to_string().contains("doc-42"));
}

#[test]
fn test_fixture_histories_build() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/versions.yml");
    let source = StaticVersionSource::from_yaml_file(&path).unwrap();
    let builder = ChainBuilder::new(HashScheme::Sha256);

    for subject in source.subject_ids() {
        let chain = builder.build_from_source(&source, subject).unwrap();
        assert!(chain.valid, "{}", verify_chain(&chain).message);
        assert_eq!(chain.subject_id, subject);
    }
}
