use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::ProvenanceError;
use crate::provenance::export::ProvenanceExporter;
use crate::provenance::fingerprint::HashScheme;

/// Prefix for environment overrides, e.g. `PROVENANCE__HASH_SCHEME=sha256`
pub const ENV_PREFIX: &str = "PROVENANCE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub hash_scheme: HashScheme,
    pub log_filter: String,
    pub export: ExportSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub schema: String,
    pub compliance: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            hash_scheme: HashScheme::default(),
            log_filter: "provenance_ledger=info".to_string(),
            export: ExportSettings::default(),
        }
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            schema: "Provenance Ledger v1".to_string(),
            compliance: vec![
                "SOC2 Type II".to_string(),
                "ISO 27001".to_string(),
                "CIS Benchmark v8".to_string(),
            ],
        }
    }
}

impl ExportSettings {
    /// Exporter stamping envelopes with these settings
    pub fn exporter(&self) -> ProvenanceExporter {
        ProvenanceExporter::new(&self.schema, self.compliance.clone())
    }
}

impl AppConfig {
    /// Defaults, then the optional file, then `PROVENANCE__*` variables
    pub fn load(path: Option<&Path>) -> Result<Self, ProvenanceError> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                return Err(ProvenanceError::ConfigError(format!(
                    "Configuration file not found: {:?}",
                    path
                )));
            }
            builder = builder.add_source(File::from(path));
        }

        let config: AppConfig = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        info!("Configuration loaded (hash scheme: {})", config.hash_scheme);
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ProvenanceError> {
        if self.export.schema.trim().is_empty() {
            return Err(ProvenanceError::ConfigError(
                "export.schema must not be empty".to_string(),
            ));
        }

        if self.log_filter.trim().is_empty() {
            return Err(ProvenanceError::ConfigError(
                "log_filter must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
