/// Core error types for Cadence
use thiserror::Error;

/// Result type alias using `CadenceError`
pub type Result<T> = std::result::Result<T, CadenceError>;

/// Core error type for Cadence
#[derive(Error, Debug)]
pub enum CadenceError {
    /// Session store read/write errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Audio transport errors
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl CadenceError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}

/// Failure reported by an audio transport for a load or play request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request was cancelled because a newer load replaced it
    #[error("Request aborted by a newer load")]
    Aborted,

    /// Any other transport failure (decode, network, device)
    #[error("Transport failure: {0}")]
    Failed(String),
}

impl TransportError {
    /// Create a generic transport failure
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }

    /// Whether this failure is the expected race of a superseded request
    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Aborted)
    }
}
