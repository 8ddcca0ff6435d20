//! Storage failure type shared by the repository traits.
//!
//! Core stays free of database crates, so implementations flatten their
//! driver errors into this type.

use thiserror::Error;

/// What went wrong in the backend, as far as callers need to know.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceErrorKind {
    /// A unique index rejected the write.
    UniqueViolation,
    /// A referenced row does not exist.
    ForeignKeyViolation,
    /// Anything else.
    Other,
}

/// A storage backend failed to complete an operation.
#[derive(Debug, Clone, Error)]
#[error("persistence failure: {message}")]
pub struct PersistenceError {
    kind: PersistenceErrorKind,
    message: String,
}

impl PersistenceError {
    /// Creates a new persistence error.
    pub fn new(message: impl Into<String>) -> Self {
        Self::with_kind(PersistenceErrorKind::Other, message)
    }

    /// Creates a persistence error of a specific kind.
    pub fn with_kind(kind: PersistenceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Returns the error kind.
    #[must_use]
    pub const fn kind(&self) -> PersistenceErrorKind {
        self.kind
    }

    /// Returns the backend's error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_kind_is_other() {
        let err = PersistenceError::new("connection reset");
        assert_eq!(err.kind(), PersistenceErrorKind::Other);
        assert_eq!(err.message(), "connection reset");
    }

    #[test]
    fn test_with_kind() {
        let err = PersistenceError::with_kind(
            PersistenceErrorKind::UniqueViolation,
            "duplicate key value violates unique constraint",
        );
        assert_eq!(err.kind(), PersistenceErrorKind::UniqueViolation);
    }
}
