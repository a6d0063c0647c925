//! Provenance Chain Verification
//!
//! Re-walks a chain's hash links and recomputes its Merkle root. Integrity
//! failures are reported through `VerificationResult`, never as errors.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

use crate::provenance::event::{ProvenanceChain, ProvenanceEvent};
use crate::provenance::fingerprint::{format_timestamp, Fingerprinter, HashScheme, GENESIS_HASH};
use crate::provenance::merkle::compute_merkle_root;

/// Outcome of verifying one chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub subject_id: String,
    pub valid: bool,
    pub total_events: usize,
    /// Links confirmed before the walk stopped
    pub verified_links: usize,
    pub broken_at_index: Option<usize>,
    pub merkle_root_verified: bool,
    pub message: String,
}

impl VerificationResult {
    /// Get a human-readable summary
    pub fn summary(&self) -> String {
        if self.valid {
            format!("✅ Provenance chain is valid ({} events)", self.total_events)
        } else {
            format!(
                "❌ Provenance chain is invalid ({} events): {}",
                self.total_events, self.message
            )
        }
    }

    /// Get detailed status
    pub fn detailed_status(&self) -> String {
        format!(
            "Subject: {}\nEvents: {}\nVerified links: {}\nBroken at: {}\nMerkle root: {}",
            self.subject_id,
            self.total_events,
            self.verified_links,
            self.broken_at_index
                .map(|i| i.to_string())
                .unwrap_or_else(|| "None".to_string()),
            if self.merkle_root_verified { "✅ Matches" } else { "❌ Mismatch" },
        )
    }
}

/// Why a link was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkFailure {
    PreviousHash,
    Index,
    Signature,
}

impl fmt::Display for LinkFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkFailure::PreviousHash => f.write_str("previous hash mismatch"),
            LinkFailure::Index => f.write_str("index out of sequence"),
            LinkFailure::Signature => f.write_str("signature does not recompute"),
        }
    }
}

/// Verify every link of `chain` and its Merkle root
pub fn verify_chain(chain: &ProvenanceChain) -> VerificationResult {
    let scheme = chain.hash_scheme;
    let total_events = chain.events.len();

    if chain.events.is_empty() {
        warn!("Provenance chain {} has no events", chain.chain_id);
        return VerificationResult {
            subject_id: chain.subject_id.clone(),
            valid: false,
            total_events,
            verified_links: 0,
            broken_at_index: None,
            merkle_root_verified: false,
            message: format!("✗ Chain {} has no events.", chain.chain_id),
        };
    }

    let mut verified_links = 0;
    let mut broken = None;

    for (i, event) in chain.events.iter().enumerate() {
        let expected_previous = if i == 0 {
            GENESIS_HASH
        } else {
            chain.events[i - 1].content_hash.as_str()
        };

        match check_link(scheme, event, i, expected_previous) {
            None => verified_links += 1,
            Some(failure) => {
                // Downstream links are suspect once one breaks
                broken = Some((i, failure));
                break;
            }
        }
    }

    let recomputed_root = compute_merkle_root(scheme, &chain.leaf_hashes());
    let merkle_root_verified = recomputed_root == chain.merkle_root;
    let valid = broken.is_none() && merkle_root_verified;

    let message = if valid {
        format!(
            "✓ Chain {} fully verified. {} events, {} hash links intact, Merkle root matches.",
            chain.chain_id, total_events, verified_links
        )
    } else {
        let mut problems = Vec::new();
        if let Some((index, failure)) = broken {
            problems.push(format!("broken link at index {} ({})", index, failure));
        }
        if !merkle_root_verified {
            problems.push(format!(
                "Merkle root mismatch (stored {}, recomputed {})",
                chain.merkle_root, recomputed_root
            ));
        }
        format!(
            "✗ Chain {} integrity failure: {}.",
            chain.chain_id,
            problems.join("; ")
        )
    };

    if valid {
        info!("Provenance chain {} verified: {} events", chain.chain_id, total_events);
    } else {
        warn!("{}", message);
    }

    VerificationResult {
        subject_id: chain.subject_id.clone(),
        valid,
        total_events,
        verified_links,
        broken_at_index: broken.map(|(index, _)| index),
        merkle_root_verified,
        message,
    }
}

/// Indices of every event whose signature no longer recomputes
///
/// Unlike `verify_chain` this does not stop at the first failure.
pub fn find_tampered_events(chain: &ProvenanceChain) -> Vec<usize> {
    let tampered: Vec<usize> = chain
        .events
        .iter()
        .enumerate()
        .filter(|(_, event)| !signature_matches(chain.hash_scheme, event))
        .map(|(i, _)| i)
        .collect();

    debug!(
        "Found {} tampered events in chain {}",
        tampered.len(),
        chain.chain_id
    );
    tampered
}

fn check_link(
    scheme: HashScheme,
    event: &ProvenanceEvent,
    position: usize,
    expected_previous: &str,
) -> Option<LinkFailure> {
    if event.previous_hash != expected_previous {
        Some(LinkFailure::PreviousHash)
    } else if event.index != position {
        Some(LinkFailure::Index)
    } else if !signature_matches(scheme, event) {
        Some(LinkFailure::Signature)
    } else {
        None
    }
}

fn signature_matches(scheme: HashScheme, event: &ProvenanceEvent) -> bool {
    let expected = scheme.sign(
        &event.content_hash,
        &event.previous_hash,
        &format_timestamp(&event.timestamp),
    );
    expected == event.signature
}
