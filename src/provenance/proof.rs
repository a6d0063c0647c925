//! Inclusion Proofs
//!
//! A `MerkleProof` shows one event belongs to a chain's Merkle root while
//! revealing only sibling hashes, never another event's content.
//! `verify_proof` needs nothing but the proof itself.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::provenance::event::ProvenanceChain;
use crate::provenance::fingerprint::{HashScheme, GENESIS_HASH};
use crate::provenance::merkle::{generate_merkle_path, replay_merkle_path, ProofStep};

/// Merkle inclusion proof for a single event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerkleProof {
    pub event_id: String,
    /// `None` when the event was not found
    pub version: Option<String>,
    pub content_hash: String,
    pub merkle_root: String,
    pub proof_path: Vec<ProofStep>,
    pub hash_scheme: HashScheme,
    pub verified: bool,
    pub message: String,
}

impl MerkleProof {
    /// Replay this proof
    pub fn verify(&self) -> bool {
        verify_proof(self)
    }

    /// Get proof size
    pub fn size(&self) -> usize {
        self.proof_path.len()
    }

    /// Get human-readable representation
    pub fn summary(&self) -> String {
        format!(
            "Merkle proof for {}: {} steps, root: {}",
            self.event_id,
            self.proof_path.len(),
            self.merkle_root
        )
    }
}

/// Generate and eagerly verify the inclusion proof for `event_id`
///
/// A missing event is a normal outcome: the proof comes back with
/// `verified == false` and an explanatory message.
pub fn generate_proof(chain: &ProvenanceChain, event_id: &str) -> MerkleProof {
    let not_found = |message: String| MerkleProof {
        event_id: event_id.to_string(),
        version: None,
        content_hash: GENESIS_HASH.to_string(),
        merkle_root: chain.merkle_root.clone(),
        proof_path: Vec::new(),
        hash_scheme: chain.hash_scheme,
        verified: false,
        message,
    };

    let Some(position) = chain.events.iter().position(|e| e.id == event_id) else {
        debug!("Event {} not found in chain {}", event_id, chain.chain_id);
        return not_found(format!(
            "Event {} not found in chain {}.",
            event_id, chain.chain_id
        ));
    };
    let event = &chain.events[position];

    let proof_path = match generate_merkle_path(chain.hash_scheme, &chain.leaf_hashes(), position) {
        Ok(path) => path,
        Err(e) => return not_found(format!("Could not build proof for {}: {}", event_id, e)),
    };

    let mut proof = MerkleProof {
        event_id: event_id.to_string(),
        version: Some(event.version.clone()),
        content_hash: event.content_hash.clone(),
        merkle_root: chain.merkle_root.clone(),
        proof_path,
        hash_scheme: chain.hash_scheme,
        verified: false,
        message: String::new(),
    };

    proof.verified = verify_proof(&proof);
    proof.message = if proof.verified {
        format!(
            "✓ Inclusion proof verified. Event {} ({}) is part of chain {} without revealing other content.",
            event_id, event.version, chain.chain_id
        )
    } else {
        warn!("Inclusion proof for {} failed to replay", event_id);
        format!(
            "✗ Proof verification failed for event {}. Chain integrity compromised.",
            event_id
        )
    };

    proof
}

/// Replay `proof.proof_path` from its leaf and compare against its root
///
/// A proof that never located its event (`version == None`) is not an
/// inclusion proof and is rejected without replaying.
pub fn verify_proof(proof: &MerkleProof) -> bool {
    if proof.version.is_none() {
        return false;
    }

    replay_merkle_path(proof.hash_scheme, &proof.content_hash, &proof.proof_path)
        == proof.merkle_root
}
