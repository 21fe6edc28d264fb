//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// parsing, corrupt stored values). Infrastructure concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. missing field, unknown brand).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A supplied timestamp or interval literal could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// A persisted value does not have the expected shape.
    ///
    /// This signals data corruption and is never silently repaired.
    #[error("malformed stored value: {0}")]
    MalformedStore(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn malformed_store(msg: impl Into<String>) -> Self {
        Self::MalformedStore(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
