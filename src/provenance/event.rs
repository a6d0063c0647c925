//! Provenance Events and Chains
//!
//! Data model for a subject's hash-linked event sequence and the version
//! descriptors it is built from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::provenance::fingerprint::HashScheme;

/// One entry of a subject's ordered version history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionDescriptor {
    pub version_label: String,
    /// Calendar epoch such as `2025-Q1`
    pub epoch_label: String,
    pub reason: String,
    pub score: u32,
}

impl VersionDescriptor {
    pub fn new(version_label: &str, epoch_label: &str, reason: &str, score: u32) -> Self {
        Self {
            version_label: version_label.to_string(),
            epoch_label: epoch_label.to_string(),
            reason: reason.to_string(),
            score,
        }
    }
}

/// Category of change an event records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationType {
    /// Initial publication
    Genesis,
    /// Version bump
    Evolution,
    /// Approved remediation action applied
    Remediation,
    /// Quality gate score improvement
    QualityGate,
    /// CVE-triggered patch
    CvePatch,
    /// Compliance framework alignment
    ComplianceUpdate,
    /// Automated hardening pass
    Hardening,
}

impl MutationType {
    /// Types a synthetic sub-event may take, in selection order
    pub const SUB_EVENT_TYPES: [MutationType; 5] = [
        MutationType::Remediation,
        MutationType::QualityGate,
        MutationType::Hardening,
        MutationType::ComplianceUpdate,
        MutationType::CvePatch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MutationType::Genesis => "genesis",
            MutationType::Evolution => "evolution",
            MutationType::Remediation => "remediation",
            MutationType::QualityGate => "quality_gate",
            MutationType::CvePatch => "cve_patch",
            MutationType::ComplianceUpdate => "compliance_update",
            MutationType::Hardening => "hardening",
        }
    }

    /// Human-readable label for reports
    pub fn label(&self) -> &'static str {
        match self {
            MutationType::Genesis => "Genesis - Initial Publication",
            MutationType::Evolution => "Evolution - Version Bump",
            MutationType::Remediation => "Remediation - Approved Action Applied",
            MutationType::QualityGate => "Quality Gate - Score Improvement",
            MutationType::CvePatch => "CVE Patch - Vulnerability Mitigation",
            MutationType::ComplianceUpdate => "Compliance Update - Regulatory Alignment",
            MutationType::Hardening => "Hardening - Automated Rewrite",
        }
    }
}

impl fmt::Display for MutationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single immutable provenance event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvenanceEvent {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub subject_id: String,
    pub version: String,
    pub content_hash: String,
    /// `GENESIS_HASH` for index 0
    pub previous_hash: String,
    pub signature: String,
    pub reason: String,
    pub mutation_type: MutationType,
    pub index: usize,
    pub epoch_label: String,
}

impl ProvenanceEvent {
    /// Get a human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "#{} {} {} ({}): {}",
            self.index, self.mutation_type, self.version, self.epoch_label, self.reason
        )
    }
}

/// Full provenance chain for one subject
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvenanceChain {
    pub subject_id: String,
    pub chain_id: String,
    pub hash_scheme: HashScheme,
    pub total_signatures: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Oldest first
    pub events: Vec<ProvenanceEvent>,
    pub merkle_root: String,
    pub valid: bool,
}

impl ProvenanceChain {
    /// Content hashes in chain order, the Merkle leaves
    pub fn leaf_hashes(&self) -> Vec<String> {
        self.events.iter().map(|e| e.content_hash.clone()).collect()
    }

    pub fn find_event(&self, event_id: &str) -> Option<&ProvenanceEvent> {
        self.events.iter().find(|e| e.id == event_id)
    }

    /// Content hash of the most recent event
    pub fn head_hash(&self) -> Option<&str> {
        self.events.last().map(|e| e.content_hash.as_str())
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Get a human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "Chain {} ({}): {} events, root: {}",
            self.chain_id,
            self.subject_id,
            self.events.len(),
            self.merkle_root
        )
    }
}
