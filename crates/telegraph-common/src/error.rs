//! Error types for Project Telegraph.

use thiserror::Error;

/// Top-level error type for Telegraph operations.
#[derive(Debug, Error)]
pub enum TelegraphError {
    /// Encounter content errors
    #[error("Content error: {0}")]
    Content(String),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// Invalid setup detected at construction time (programmer error)
    #[error("Invalid setup: {0}")]
    InvalidSetup(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Schema version mismatch
    #[error("Schema version mismatch: expected {expected}, got {actual}")]
    VersionMismatch {
        /// Expected version
        expected: String,
        /// Actual version found
        actual: String,
    },
}

/// Result type alias for Telegraph operations.
pub type TelegraphResult<T> = Result<T, TelegraphError>;
