//! Pipeline error types

use thiserror::Error;

/// Errors that can occur in the mutation pipeline
///
/// These are the *hard* failures: collaborator breakage, mis-wired hook
/// chains, bad configuration. Validation failures are not errors in this
/// sense — they accumulate in an `ErrorsList` and travel back to the caller
/// as ordinary response data.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Storage collaborator failure
    #[error("Store error: {0}")]
    Store(String),

    /// Authentication collaborator failure (hashing, token encoding)
    #[error("Auth error: {0}")]
    Auth(String),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A validator received a value of a kind it cannot handle
    ///
    /// Signals a mis-assembled validator chain, not bad user input.
    #[error("Unexpected value in validator chain: {0}")]
    UnexpectedValue(String),

    /// An action read a cleaned-data field that validation never produced
    #[error("Cleaned data is missing field: {0}")]
    MissingField(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl PipelineError {
    /// Create a store collaborator error
    pub fn store(msg: impl Into<String>) -> Self {
        PipelineError::Store(msg.into())
    }

    /// Create an auth collaborator error
    pub fn auth(msg: impl Into<String>) -> Self {
        PipelineError::Auth(msg.into())
    }

    /// Create a chain-mismatch error
    pub fn unexpected_value(msg: impl Into<String>) -> Self {
        PipelineError::UnexpectedValue(msg.into())
    }

    /// Create a generic error from a string
    pub fn other(msg: impl Into<String>) -> Self {
        PipelineError::Other(msg.into())
    }
}

/// Result type alias for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;
