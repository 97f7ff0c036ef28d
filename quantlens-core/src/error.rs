//! Error types for quantlens-core

use thiserror::Error;

/// Result type for quantlens-core operations
pub type LensResult<T> = std::result::Result<T, LensError>;

/// quantlens-core error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LensError {
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl LensError {
    /// Shorthand for [`LensError::InvalidParameter`]
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        LensError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
