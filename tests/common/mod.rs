#![allow(dead_code)]

use provenance_ledger::provenance::{build_chain, ProvenanceChain, VersionDescriptor};

const QUARTERS: [&str; 6] = ["2025-Q1", "2025-Q2", "2025-Q3", "2025-Q4", "2026-Q1", "2026-Q2"];

/// The two-version history used throughout the scenarios
pub fn scenario_versions() -> Vec<VersionDescriptor> {
    vec![
        VersionDescriptor::new("v1", "2025-Q1", "initial", 80),
        VersionDescriptor::new("v2", "2025-Q2", "patch", 88),
    ]
}

/// A history of `count` versions across consecutive quarters
pub fn create_test_versions(count: usize) -> Vec<VersionDescriptor> {
    (0..count)
        .map(|i| {
            VersionDescriptor::new(
                &format!("v0.{}", i * 2 + 1),
                QUARTERS[i % QUARTERS.len()],
                &format!("revision {}", i),
                80 + (i as u32 * 3).min(20),
            )
        })
        .collect()
}

pub fn create_test_chain(subject_id: &str, versions: usize) -> ProvenanceChain {
    build_chain(subject_id, &create_test_versions(versions)).expect("Failed to build test chain")
}
