//! Domain error model.

use thiserror::Error;

/// Domain-level error.
///
/// Deterministic request/data failures only. Storage and transport failures
/// have their own error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An identifier was invalid (e.g. non-numeric path segment).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
