//! Ledger aggregation.
//!
//! Pure functions that fold ledger rows into summaries. Callers pick the row
//! set (one customer, one customer within a store, one store); these
//! functions never filter.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use khata_shared::types::{CustomerId, StoreId};
use rust_decimal::Decimal;

use super::types::{
    BalanceSnapshot, CreditEntry, CustomerSummary, OutstandingBalance, StoreSummary,
    TransactionType,
};

/// Running given/received totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Totals {
    given: Decimal,
    received: Decimal,
}

impl Totals {
    fn add(&mut self, entry: &CreditEntry) {
        match entry.transaction_type {
            TransactionType::CreditGiven => self.given += entry.amount,
            TransactionType::PaymentReceived => self.received += entry.amount,
        }
    }

    fn outstanding(self) -> Decimal {
        self.given - self.received
    }

    fn of(rows: &[CreditEntry]) -> Self {
        let mut totals = Self::default();
        for row in rows {
            totals.add(row);
        }
        totals
    }
}

fn count(rows: &[CreditEntry]) -> u64 {
    u64::try_from(rows.len()).unwrap_or(u64::MAX)
}

fn latest<'a>(dates: impl Iterator<Item = &'a DateTime<Utc>>) -> Option<DateTime<Utc>> {
    dates.max().copied()
}

/// Outstanding balance (given minus received) of a row set.
#[must_use]
pub fn outstanding_balance(rows: &[CreditEntry]) -> Decimal {
    Totals::of(rows).outstanding()
}

/// Summarizes one customer's rows.
#[must_use]
pub fn customer_summary(rows: &[CreditEntry]) -> CustomerSummary {
    let totals = Totals::of(rows);

    CustomerSummary {
        total_credit_given: totals.given,
        total_payments_received: totals.received,
        outstanding_balance: totals.outstanding(),
        transaction_count: count(rows),
        last_transaction_date: latest(rows.iter().map(|r| &r.transaction_date)),
    }
}

/// Summarizes a store's rows.
#[must_use]
pub fn store_summary(rows: &[CreditEntry]) -> StoreSummary {
    let totals = Totals::of(rows);
    let customers: HashSet<CustomerId> = rows.iter().map(|r| r.customer_id).collect();

    StoreSummary {
        total_customers: u64::try_from(customers.len()).unwrap_or(u64::MAX),
        total_credit_given: totals.given,
        total_payments_received: totals.received,
        outstanding_balance: totals.outstanding(),
        transaction_count: count(rows),
    }
}

/// Ranks customers by outstanding balance, highest first.
///
/// Customers whose balance is zero or negative are dropped. Equal balances
/// keep the order in which each customer first appears in `rows`.
#[must_use]
pub fn rank_outstanding(rows: &[CreditEntry], limit: Option<usize>) -> Vec<OutstandingBalance> {
    let mut order: Vec<CustomerId> = Vec::new();
    let mut per_customer: HashMap<CustomerId, Totals> = HashMap::new();

    for row in rows {
        per_customer
            .entry(row.customer_id)
            .or_insert_with(|| {
                order.push(row.customer_id);
                Totals::default()
            })
            .add(row);
    }

    let mut ranked: Vec<OutstandingBalance> = order
        .into_iter()
        .filter_map(|customer_id| {
            let totals = per_customer.get(&customer_id).copied()?;
            let outstanding = totals.outstanding();
            (outstanding > Decimal::ZERO).then_some(OutstandingBalance {
                customer_id,
                total_credit_given: totals.given,
                total_payments_received: totals.received,
                outstanding_balance: outstanding,
            })
        })
        .collect();

    // `sort_by` is stable, which gives ties their first-encounter order.
    ranked.sort_by(|a, b| b.outstanding_balance.cmp(&a.outstanding_balance));

    if let Some(limit) = limit {
        ranked.truncate(limit);
    }
    ranked
}

/// Builds the cached balance row for one customer in one store.
#[must_use]
pub fn balance_snapshot(
    customer_id: CustomerId,
    store_id: StoreId,
    rows: &[CreditEntry],
) -> BalanceSnapshot {
    let totals = Totals::of(rows);
    let last_of = |kind: TransactionType| {
        latest(
            rows.iter()
                .filter(|r| r.transaction_type == kind)
                .map(|r| &r.transaction_date),
        )
    };

    BalanceSnapshot {
        customer_id,
        store_id,
        total_credit_given: totals.given,
        total_payments_received: totals.received,
        outstanding_balance: totals.outstanding(),
        last_credit_date: last_of(TransactionType::CreditGiven),
        last_payment_date: last_of(TransactionType::PaymentReceived),
        last_transaction_date: latest(rows.iter().map(|r| &r.transaction_date)),
    }
}
