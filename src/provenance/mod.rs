//! Provenance Engine
//!
//! Per-subject append-only event chains secured by previous-hash links and
//! summarized by a Merkle root, with whole-chain verification and
//! single-event inclusion proofs.

pub mod builder;
pub mod event;
pub mod export;
pub mod fingerprint;
pub mod merkle;
pub mod proof;
pub mod verify;

pub use builder::{build_chain, chain_id, epoch_timestamp, ChainBuilder};
pub use event::{MutationType, ProvenanceChain, ProvenanceEvent, VersionDescriptor};
pub use export::{
    export_chain, export_chain_json, load_export, ExportMetadata, ProvenanceExport,
    ProvenanceExporter,
};
pub use fingerprint::{hash, sign, Fingerprinter, HashScheme, GENESIS_HASH};
pub use merkle::{
    compute_merkle_root, generate_merkle_path, replay_merkle_path, verify_merkle_root, Direction,
    ProofStep,
};
pub use proof::{generate_proof, verify_proof, MerkleProof};
pub use verify::{find_tampered_events, verify_chain, VerificationResult};
