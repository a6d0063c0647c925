//! Provenance Audit Export
//!
//! Serializes a chain together with its verification result as
//! `{_schema, _generated, _compliance, chain, verification}` JSON. The
//! underscore-prefixed envelope fields are supplied by the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::error::Result;
use crate::provenance::event::ProvenanceChain;
use crate::provenance::verify::{verify_chain, VerificationResult};

/// Caller-supplied envelope metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub schema: String,
    pub generated: DateTime<Utc>,
    pub compliance: Vec<String>,
}

impl ExportMetadata {
    pub fn new(schema: &str, generated: DateTime<Utc>, compliance: Vec<String>) -> Self {
        Self {
            schema: schema.to_string(),
            generated,
            compliance,
        }
    }
}

/// Audit export document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvenanceExport {
    #[serde(rename = "_schema")]
    pub schema: String,
    #[serde(rename = "_generated")]
    pub generated: DateTime<Utc>,
    #[serde(rename = "_compliance")]
    pub compliance: Vec<String>,
    pub chain: ProvenanceChain,
    pub verification: VerificationResult,
}

impl ProvenanceExport {
    /// Re-run verification on the embedded chain
    pub fn reverify(&self) -> VerificationResult {
        verify_chain(&self.chain)
    }

    /// True when a fresh verification reproduces the stored one
    pub fn is_consistent(&self) -> bool {
        self.reverify() == self.verification
    }
}

/// Wrap `chain` and a fresh verification of it in an export envelope
pub fn export_chain(chain: &ProvenanceChain, metadata: ExportMetadata) -> ProvenanceExport {
    let verification = verify_chain(chain);

    ProvenanceExport {
        schema: metadata.schema,
        generated: metadata.generated,
        compliance: metadata.compliance,
        chain: chain.clone(),
        verification,
    }
}

/// Render the export envelope for `chain` as pretty JSON
pub fn export_chain_json(chain: &ProvenanceChain, metadata: ExportMetadata) -> Result<String> {
    let export = export_chain(chain, metadata);
    Ok(serde_json::to_string_pretty(&export)?)
}

/// Builds exports with a fixed schema name and compliance list
#[derive(Debug, Clone)]
pub struct ProvenanceExporter {
    schema: String,
    compliance: Vec<String>,
}

impl ProvenanceExporter {
    pub fn new(schema: &str, compliance: Vec<String>) -> Self {
        Self {
            schema: schema.to_string(),
            compliance,
        }
    }

    /// Envelope metadata stamped with the current time
    pub fn metadata(&self) -> ExportMetadata {
        ExportMetadata::new(&self.schema, Utc::now(), self.compliance.clone())
    }

    pub fn export(&self, chain: &ProvenanceChain) -> ProvenanceExport {
        export_chain(chain, self.metadata())
    }

    pub fn export_json(&self, chain: &ProvenanceChain) -> Result<String> {
        export_chain_json(chain, self.metadata())
    }

    /// Save export to file
    pub fn save_export(&self, export: &ProvenanceExport, output_path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(export)?;
        fs::write(output_path, json)?;

        info!(
            "Saved provenance export for {} to {}",
            export.chain.subject_id,
            output_path.display()
        );
        Ok(())
    }
}

/// Load export from file
pub fn load_export(path: &Path) -> Result<ProvenanceExport> {
    let content = fs::read_to_string(path)?;
    let export: ProvenanceExport = serde_json::from_str(&content)?;

    debug!(
        "Loaded provenance export for {} ({} events) from {}",
        export.chain.subject_id,
        export.chain.events.len(),
        path.display()
    );
    Ok(export)
}
