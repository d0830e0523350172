use std::path::PathBuf;

use thiserror::Error;

use crate::types::Modality;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Extraction failed for {}: {reason}", path.display())]
    Extraction { path: PathBuf, reason: String },

    /// One item could not be embedded. Ingestion skips the item and carries on.
    #[error("Embedding failed ({modality}) for {item}: {reason}")]
    Embedding { modality: Modality, item: String, reason: String },

    #[error("Dimension mismatch: index expects {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Generation failed after {attempts} attempt(s): {reason}")]
    Generation { attempts: u32, reason: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Operation failed: {0}")]
    Operation(String),
}

impl Error {
    /// Item-level failures are isolated during ingestion; everything else ends the request.
    pub fn is_item_level(&self) -> bool {
        matches!(self, Error::Embedding { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
