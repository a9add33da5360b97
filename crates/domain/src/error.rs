//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A request path is not relative to the API root.
    #[error("invalid request path: {0}")]
    InvalidPath(String),

    /// A monetary amount could not be parsed.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// A product condition label is not recognised.
    #[error("unknown product condition: {0}")]
    UnknownCondition(String),

    /// A token is not a well-formed JWT.
    #[error("malformed token: {0}")]
    MalformedToken(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
