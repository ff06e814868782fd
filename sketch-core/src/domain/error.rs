use thiserror::Error;

use crate::domain::draft::ValidationErrors;
use crate::domain::sketch::SketchId;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded { needed: usize, quota: usize },
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize sketches: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("storage backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("invalid sketch: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("sketch not found: {0}")]
    SketchNotFound(SketchId),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The in-memory collection already holds the change; only the durable
    /// copy is behind.
    #[error("change applied but not saved: {source}")]
    NotPersisted {
        #[source]
        source: StoreError,
    },
}

impl DomainError {
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            DomainError::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DomainError::SketchNotFound(_))
    }
}
