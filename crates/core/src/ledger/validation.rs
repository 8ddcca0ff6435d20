//! Business rule validation for ledger writes and queries.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{CreditEntry, CreditFilter, TransactionType};

/// Largest page accepted by the recent-transactions listing.
pub const MAX_RECENT_LIMIT: u64 = 100;

/// Longest span accepted by the date-range listing.
pub const MAX_RANGE_DAYS: i64 = 365;

/// Amounts must be strictly positive.
pub fn validate_amount(amount: Decimal) -> Result<(), LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::NonPositiveAmount);
    }
    Ok(())
}

/// Payments must carry a non-blank journal number.
pub fn validate_journal_number(
    transaction_type: TransactionType,
    journal_number: Option<&str>,
) -> Result<(), LedgerError> {
    let present = journal_number.is_some_and(|j| !j.trim().is_empty());
    if transaction_type == TransactionType::PaymentReceived && !present {
        return Err(LedgerError::MissingJournalNumber);
    }
    Ok(())
}

/// Rejects a credit that would push the balance above the limit.
///
/// The limit itself is reachable: `current + amount == limit` passes.
pub fn check_credit_limit(
    current_balance: Decimal,
    amount: Decimal,
    credit_limit: Decimal,
) -> Result<(), LedgerError> {
    if current_balance + amount > credit_limit {
        return Err(LedgerError::CreditLimitExceeded {
            current_balance,
            credit_limit,
            amount,
        });
    }
    Ok(())
}

/// Balance after replacing `existing` with `updated` in the customer's ledger.
#[must_use]
pub fn adjusted_balance(
    current_balance: Decimal,
    existing: &CreditEntry,
    updated: &CreditEntry,
) -> Decimal {
    current_balance - existing.signed_amount() + updated.signed_amount()
}

/// Start must not come after end.
pub fn validate_date_order(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), LedgerError> {
    if start > end {
        return Err(LedgerError::InvalidDateRange);
    }
    Ok(())
}

/// Ordered range no longer than [`MAX_RANGE_DAYS`].
pub fn validate_date_span(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), LedgerError> {
    validate_date_order(start, end)?;
    if end - start > Duration::days(MAX_RANGE_DAYS) {
        return Err(LedgerError::DateRangeTooLong {
            max_days: MAX_RANGE_DAYS,
        });
    }
    Ok(())
}

/// Amount bounds are non-negative and ordered.
pub fn validate_amount_bounds(
    min_amount: Option<Decimal>,
    max_amount: Option<Decimal>,
) -> Result<(), LedgerError> {
    if min_amount.is_some_and(|m| m < Decimal::ZERO)
        || max_amount.is_some_and(|m| m < Decimal::ZERO)
    {
        return Err(LedgerError::NegativeAmountFilter);
    }
    if let (Some(min), Some(max)) = (min_amount, max_amount)
        && min > max
    {
        return Err(LedgerError::InvalidAmountRange);
    }
    Ok(())
}

/// Date and amount checks of a ledger filter. Entity existence is checked by the service.
pub fn validate_filter(filter: &CreditFilter) -> Result<(), LedgerError> {
    if let (Some(start), Some(end)) = (filter.start_date, filter.end_date) {
        validate_date_order(start, end)?;
    }
    validate_amount_bounds(filter.min_amount, filter.max_amount)
}

/// Recent listing limit must be in `1..=MAX_RECENT_LIMIT`.
pub fn validate_recent_limit(limit: u64) -> Result<(), LedgerError> {
    if limit == 0 || limit > MAX_RECENT_LIMIT {
        return Err(LedgerError::InvalidLimit {
            max: MAX_RECENT_LIMIT,
        });
    }
    Ok(())
}
