use thiserror::Error;

impl From<serde_json::Error> for ProvenanceError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(format!("JSON serialization error: {}", err))
    }
}

impl From<serde_yaml::Error> for ProvenanceError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::SerializationError(format!("YAML serialization error: {}", err))
    }
}

impl From<std::io::Error> for ProvenanceError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}

impl From<config::ConfigError> for ProvenanceError {
    fn from(err: config::ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum ProvenanceError {
    #[error("Input error: {0}")]
    InputError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("I/O error: {0}")]
    IoError(String),
}

// Contract violations by the caller; integrity failures are never errors.
impl ProvenanceError {
    pub fn empty_version_history(subject_id: &str) -> Self {
        Self::InputError(format!(
            "Version history for subject '{}' is empty (at least one version required)",
            subject_id
        ))
    }

    pub fn empty_subject_id() -> Self {
        Self::InputError("Subject id must not be empty".to_string())
    }

    pub fn leaf_index_out_of_range(index: usize, len: usize) -> Self {
        Self::InputError(format!(
            "Leaf index {} out of range for {} leaves",
            index, len
        ))
    }

    pub fn unknown_subject(subject_id: &str) -> Self {
        Self::InputError(format!("No version history for subject '{}'", subject_id))
    }

    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::InputError(_))
    }
}

pub type Result<T> = std::result::Result<T, ProvenanceError>;
