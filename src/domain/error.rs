//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent malformed records or documents.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("malformed student document: {0}")]
    MalformedDocument(String),

    #[error("invalid {field} value {value:?}: expected an integer")]
    InvalidInteger { field: &'static str, value: String },

    #[error("grade {0:?} is too large to average")]
    GradeOverflow(String),

    #[error("cannot encode student document: {0}")]
    Encoding(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
