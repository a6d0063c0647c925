//! Version history sources
//!
//! Chains are built from version histories handed in by the host; the
//! engine never reaches for global state to find them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::{ProvenanceError, Result};
use crate::provenance::event::VersionDescriptor;

/// Supplies the ordered version history of a subject
pub trait ContentVersionSource {
    fn versions(&self, subject_id: &str) -> Result<Vec<VersionDescriptor>>;
}

/// In-memory version histories keyed by subject id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticVersionSource {
    pub subjects: BTreeMap<String, Vec<VersionDescriptor>>,
}

impl StaticVersionSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subject(mut self, subject_id: &str, versions: Vec<VersionDescriptor>) -> Self {
        self.subjects.insert(subject_id.to_string(), versions);
        self
    }

    /// Load histories from a YAML file of the form `subjects: {id: [...]}`
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ProvenanceError::InputError(format!(
                "Version source file not found: {:?}",
                path
            )));
        }

        let contents = fs::read_to_string(path)?;
        let source: Self = serde_yaml::from_str(&contents)?;

        info!(
            "Loaded version histories for {} subjects from {:?}",
            source.subjects.len(),
            path
        );
        Ok(source)
    }

    pub fn subject_ids(&self) -> impl Iterator<Item = &str> {
        self.subjects.keys().map(String::as_str)
    }
}

impl ContentVersionSource for StaticVersionSource {
    fn versions(&self, subject_id: &str) -> Result<Vec<VersionDescriptor>> {
        self.subjects
            .get(subject_id)
            .cloned()
            .ok_or_else(|| ProvenanceError::unknown_subject(subject_id))
    }
}
