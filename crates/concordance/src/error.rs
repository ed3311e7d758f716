//! Error types for the Concordance library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Concordance operations.
#[derive(Debug, Error)]
pub enum ConcordanceError {
    /// Caller supplied an input outside the accepted domain
    /// (unknown entity type, malformed edit payload).
    #[error("Validation error: {0}")]
    Validation(String),

    /// The repository has no entity with this id.
    #[error("{entity_type} '{id}' not found")]
    NotFound { entity_type: String, id: String },

    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The semantic analyzer failed for a reason other than being unavailable.
    #[error("Semantic analysis error: {0}")]
    Semantic(String),

    /// `CacheRegistry::unregister` was called with an invalidator that was never registered.
    #[error("Invalidator '{0}' is not registered")]
    InvalidatorNotRegistered(String),

    /// An invalidator failed; later invalidators were not run.
    #[error("Invalidator '{name}' failed: {source}")]
    Invalidation {
        name: String,
        #[source]
        source: Box<ConcordanceError>,
    },
}

impl ConcordanceError {
    /// Shorthand for a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ConcordanceError::Validation(message.into())
    }

    /// Shorthand for a not-found error.
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        ConcordanceError::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }
}

/// Result type alias for Concordance operations.
pub type Result<T> = std::result::Result<T, ConcordanceError>;
