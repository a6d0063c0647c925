pub mod config;
pub mod error;
pub mod provenance;
pub mod source;

pub use error::ProvenanceError;
