//! Merkle Tree for Provenance Chains
//!
//! Pairwise reduction of an ordered leaf-hash list into a single root, and
//! the sibling paths that let a verifier replay one leaf up to that root
//! without seeing any other leaf.
//!
//! Odd layers duplicate their last node. Leaf order matters: permuting
//! leaves changes the root.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ProvenanceError, Result};
use crate::provenance::fingerprint::{Fingerprinter, HashScheme, GENESIS_HASH};

/// Side of the current node on which the recorded sibling sits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Sibling is the left operand: `hash(sibling + current)`
    Left,
    /// Sibling is the right operand: `hash(current + sibling)`
    Right,
}

/// One layer of an inclusion proof
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofStep {
    pub sibling_hash: String,
    pub direction: Direction,
}

/// Compute the Merkle root over `leaves`; empty input yields `GENESIS_HASH`
pub fn compute_merkle_root(scheme: HashScheme, leaves: &[String]) -> String {
    if leaves.is_empty() {
        return GENESIS_HASH.to_string();
    }

    let mut layer = leaves.to_vec();
    while layer.len() > 1 {
        layer = next_layer(scheme, &layer);
    }

    let root = layer.swap_remove(0);
    debug!("Merkle root over {} leaves: {}", leaves.len(), root);
    root
}

/// Sibling path from `leaves[leaf_index]` up to the root
pub fn generate_merkle_path(
    scheme: HashScheme,
    leaves: &[String],
    leaf_index: usize,
) -> Result<Vec<ProofStep>> {
    if leaf_index >= leaves.len() {
        return Err(ProvenanceError::leaf_index_out_of_range(
            leaf_index,
            leaves.len(),
        ));
    }

    let mut path = Vec::new();
    let mut layer = leaves.to_vec();
    let mut index = leaf_index;

    while layer.len() > 1 {
        let is_right = index % 2 == 1;
        let sibling_index = if is_right {
            index - 1
        } else {
            // Last node of an odd layer pairs with itself
            (index + 1).min(layer.len() - 1)
        };

        path.push(ProofStep {
            sibling_hash: layer[sibling_index].clone(),
            direction: if is_right {
                Direction::Left
            } else {
                Direction::Right
            },
        });

        layer = next_layer(scheme, &layer);
        index /= 2;
    }

    Ok(path)
}

/// Fold `path` onto `leaf_hash`, producing a candidate root
pub fn replay_merkle_path(scheme: HashScheme, leaf_hash: &str, path: &[ProofStep]) -> String {
    path.iter().fold(leaf_hash.to_string(), |current, step| match step.direction {
        Direction::Right => hash_pair(scheme, &current, &step.sibling_hash),
        Direction::Left => hash_pair(scheme, &step.sibling_hash, &current),
    })
}

/// Recompute the root over `leaves` and compare it to `claimed_root`
pub fn verify_merkle_root(scheme: HashScheme, leaves: &[String], claimed_root: &str) -> bool {
    compute_merkle_root(scheme, leaves) == claimed_root
}

/// Number of layers above the leaves, i.e. `ceil(log2(n))`
pub fn tree_depth(leaf_count: usize) -> usize {
    if leaf_count <= 1 {
        0
    } else {
        (usize::BITS - (leaf_count - 1).leading_zeros()) as usize
    }
}

fn next_layer(scheme: HashScheme, layer: &[String]) -> Vec<String> {
    layer
        .chunks(2)
        .map(|pair| {
            let left = &pair[0];
            let right = pair.get(1).unwrap_or(left);
            hash_pair(scheme, left, right)
        })
        .collect()
}

fn hash_pair(scheme: HashScheme, left: &str, right: &str) -> String {
    scheme.hash(&format!("{}{}", left, right))
}
