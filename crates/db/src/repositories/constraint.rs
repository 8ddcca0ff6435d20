//! Maps database constraint violations onto repository errors.
//!
//! The pre-insert existence checks catch the common case; these helpers
//! cover the race where two writers pass the check together and the
//! index or foreign key rejects the loser.

use sea_orm::{DbErr, SqlErr};

use khata_core::PersistenceError;
use khata_core::persistence::PersistenceErrorKind;

/// Which constraint a failed write tripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// Unique index.
    Unique,
    /// Foreign key.
    ForeignKey,
}

/// Classifies a database error, or `None` if it is not a constraint violation.
#[must_use]
pub fn violation(err: &DbErr) -> Option<Violation> {
    match err.sql_err()? {
        SqlErr::UniqueConstraintViolation(_) => Some(Violation::Unique),
        SqlErr::ForeignKeyConstraintViolation(_) => Some(Violation::ForeignKey),
        _ => None,
    }
}

/// Flattens a database error for the core persistence traits, keeping its kind.
pub(crate) fn persistence(err: DbErr) -> PersistenceError {
    let kind = match violation(&err) {
        Some(Violation::Unique) => PersistenceErrorKind::UniqueViolation,
        Some(Violation::ForeignKey) => PersistenceErrorKind::ForeignKeyViolation,
        None => PersistenceErrorKind::Other,
    };
    PersistenceError::with_kind(kind, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_sql_errors_are_not_violations() {
        assert_eq!(violation(&DbErr::Custom("boom".to_string())), None);
        assert_eq!(violation(&DbErr::RecordNotFound("x".to_string())), None);
    }

    #[test]
    fn test_persistence_keeps_message() {
        let err = persistence(DbErr::Custom("boom".to_string()));
        assert_eq!(err.kind(), PersistenceErrorKind::Other);
        assert!(err.message().contains("boom"));
    }
}
