//! Domain error model.

use serde_json::Value;
use thiserror::Error;

use crate::kind::ErrorKind;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// invariants, conflicts). `Storage` is the single escape hatch for a failing
/// store and is always reported to clients as an internal error.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A uniqueness rule was violated. `details` identifies the record that
    /// already holds the identity, when known.
    #[error("conflict: {message}")]
    Conflict {
        message: String,
        details: Option<Value>,
    },

    /// The requested state transition is not allowed from the current state.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The backing store failed.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict {
            message: msg.into(),
            details: None,
        }
    }

    pub fn conflict_with(msg: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: msg.into(),
            details: Some(details),
        }
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::Validation(_) | DomainError::InvalidId(_) => ErrorKind::ValidationError,
            DomainError::NotFound(_) => ErrorKind::NotFound,
            DomainError::Conflict { .. } => ErrorKind::Conflict,
            DomainError::Forbidden(_) => ErrorKind::Forbidden,
            DomainError::Storage(_) => ErrorKind::InternalError,
        }
    }

    /// Message safe to show to a client.
    ///
    /// Storage failures collapse to generic text; every domain failure keeps its
    /// specific reason.
    pub fn public_message(&self) -> String {
        match self {
            DomainError::Validation(m)
            | DomainError::InvalidId(m)
            | DomainError::NotFound(m)
            | DomainError::Forbidden(m) => m.clone(),
            DomainError::Conflict { message, .. } => message.clone(),
            DomainError::Storage(_) => "internal server error".to_string(),
        }
    }

    pub fn details(&self) -> Option<&Value> {
        match self {
            DomainError::Conflict { details, .. } => details.as_ref(),
            _ => None,
        }
    }
}
