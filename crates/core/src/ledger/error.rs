//! Ledger error types for validation and state errors.

use rust_decimal::Decimal;
use thiserror::Error;

use khata_shared::AppError;

use crate::persistence::PersistenceError;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Lookup Errors ==========
    /// Customer does not exist.
    #[error("Customer not found")]
    CustomerNotFound,

    /// Store does not exist.
    #[error("Store not found")]
    StoreNotFound,

    /// Ledger row does not exist.
    #[error("Credit not found")]
    CreditNotFound,

    // ========== Business Rule Errors ==========
    /// Customer belongs to a different store.
    #[error("Customer does not belong to this store")]
    CustomerStoreMismatch,

    /// Amount is zero or negative.
    #[error("Amount must be greater than 0")]
    NonPositiveAmount,

    /// Customer has been deactivated.
    #[error("Customer is inactive")]
    CustomerInactive,

    /// Payment recorded without a journal number.
    #[error("Journal number is required for payment_received transactions")]
    MissingJournalNumber,

    /// Transaction would push the balance above the customer's credit limit.
    #[error(
        "Credit limit exceeded. Current balance: {current_balance}, Credit limit: {credit_limit}, Requested amount: {amount}"
    )]
    CreditLimitExceeded {
        /// Outstanding balance before the transaction.
        current_balance: Decimal,
        /// The customer's credit limit.
        credit_limit: Decimal,
        /// Amount that was requested.
        amount: Decimal,
    },

    // ========== Query Errors ==========
    /// Start date after end date.
    #[error("Start date must be before or equal to end date")]
    InvalidDateRange,

    /// Date range longer than allowed.
    #[error("Date range cannot exceed {max_days} days")]
    DateRangeTooLong {
        /// Maximum span in days.
        max_days: i64,
    },

    /// Negative amount bound.
    #[error("Amount filters must be non-negative")]
    NegativeAmountFilter,

    /// Minimum amount above maximum amount.
    #[error("Minimum amount must be less than or equal to maximum amount")]
    InvalidAmountRange,

    /// Listing limit outside the allowed window.
    #[error("Limit must be between 1 and {max}")]
    InvalidLimit {
        /// Largest accepted limit.
        max: u64,
    },

    // ========== Persistence Errors ==========
    /// Storage failure.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::CustomerNotFound => "CUSTOMER_NOT_FOUND",
            Self::StoreNotFound => "STORE_NOT_FOUND",
            Self::CreditNotFound => "CREDIT_NOT_FOUND",
            Self::CustomerStoreMismatch => "CUSTOMER_STORE_MISMATCH",
            Self::NonPositiveAmount => "NON_POSITIVE_AMOUNT",
            Self::CustomerInactive => "CUSTOMER_INACTIVE",
            Self::MissingJournalNumber => "MISSING_JOURNAL_NUMBER",
            Self::CreditLimitExceeded { .. } => "CREDIT_LIMIT_EXCEEDED",
            Self::InvalidDateRange => "INVALID_DATE_RANGE",
            Self::DateRangeTooLong { .. } => "DATE_RANGE_TOO_LONG",
            Self::NegativeAmountFilter => "NEGATIVE_AMOUNT_FILTER",
            Self::InvalidAmountRange => "INVALID_AMOUNT_RANGE",
            Self::InvalidLimit { .. } => "INVALID_LIMIT",
            Self::Persistence(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::CustomerNotFound | Self::StoreNotFound | Self::CreditNotFound => 404,
            Self::Persistence(_) => 500,
            _ => 400,
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::CustomerNotFound
            | LedgerError::StoreNotFound
            | LedgerError::CreditNotFound => Self::NotFound(err.to_string()),
            LedgerError::Persistence(e) => Self::Database(e.to_string()),
            _ => Self::Validation(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_not_found_errors_map_to_404() {
        for err in [
            LedgerError::CustomerNotFound,
            LedgerError::StoreNotFound,
            LedgerError::CreditNotFound,
        ] {
            assert_eq!(err.http_status_code(), 404);
            assert_eq!(AppError::from(err).status_code(), 404);
        }
    }

    #[test]
    fn test_business_rules_map_to_400() {
        let err = LedgerError::CreditLimitExceeded {
            current_balance: dec!(480),
            credit_limit: dec!(500),
            amount: dec!(25),
        };
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.error_code(), "CREDIT_LIMIT_EXCEEDED");
        assert!(err.to_string().starts_with("Credit limit exceeded"));

        let app: AppError = err.into();
        assert!(matches!(app, AppError::Validation(_)));
    }

    #[test]
    fn test_persistence_maps_to_database_error() {
        let err = LedgerError::from(PersistenceError::new("connection reset"));
        assert_eq!(err.http_status_code(), 500);
        assert!(AppError::from(err).is_internal());
    }

    #[test]
    fn test_messages_match_documented_text() {
        assert_eq!(LedgerError::CustomerNotFound.to_string(), "Customer not found");
        assert_eq!(LedgerError::StoreNotFound.to_string(), "Store not found");
        assert_eq!(
            LedgerError::CustomerStoreMismatch.to_string(),
            "Customer does not belong to this store"
        );
        assert_eq!(
            LedgerError::DateRangeTooLong { max_days: 365 }.to_string(),
            "Date range cannot exceed 365 days"
        );
    }
}
