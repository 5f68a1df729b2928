//! Error types for domain value parsing

use thiserror::Error;

/// Errors raised while constructing or parsing domain values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Identifier string is not a valid UUID
    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    /// Confidence outside [0, 1]
    #[error("Confidence out of range: {0}")]
    ConfidenceOutOfRange(f64),
}
