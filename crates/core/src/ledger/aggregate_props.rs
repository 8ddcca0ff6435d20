//! Property-based tests for ledger aggregation.

use khata_shared::types::{CustomerId, StoreId};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::aggregate::{balance_snapshot, customer_summary, rank_outstanding, store_summary};
use super::testing::{day, entry};
use super::types::{CreditEntry, TransactionType};

/// Strategy to generate positive decimal amounts (0.01 to 10,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn transaction_type() -> impl Strategy<Value = TransactionType> {
    prop_oneof![
        Just(TransactionType::CreditGiven),
        Just(TransactionType::PaymentReceived)
    ]
}

/// Rows for one customer: (type, amount, day offset).
fn customer_rows() -> impl Strategy<Value = Vec<(TransactionType, Decimal, u32)>> {
    prop::collection::vec((transaction_type(), positive_amount(), 0u32..365), 0..40)
}

/// Rows spread over a handful of customers: (customer index, type, amount).
fn store_rows() -> impl Strategy<Value = Vec<(usize, TransactionType, Decimal)>> {
    prop::collection::vec((0usize..6, transaction_type(), positive_amount()), 0..60)
}

fn build(
    customer: CustomerId,
    store: StoreId,
    raw: &[(TransactionType, Decimal, u32)],
) -> Vec<CreditEntry> {
    raw.iter()
        .map(|(t, amount, d)| entry(customer, store, *t, *amount, day(*d)))
        .collect()
}

fn sum_of(rows: &[CreditEntry], kind: TransactionType) -> Decimal {
    rows.iter()
        .filter(|r| r.transaction_type == kind)
        .map(|r| r.amount)
        .sum()
}

proptest! {
    #[test]
    fn prop_summary_outstanding_is_given_minus_received(raw in customer_rows()) {
        let rows = build(CustomerId::new(), StoreId::new(), &raw);

        let summary = customer_summary(&rows);
        let given = sum_of(&rows, TransactionType::CreditGiven);
        let received = sum_of(&rows, TransactionType::PaymentReceived);

        prop_assert_eq!(summary.total_credit_given, given);
        prop_assert_eq!(summary.total_payments_received, received);
        prop_assert_eq!(summary.outstanding_balance, given - received);
        prop_assert_eq!(summary.transaction_count, rows.len() as u64);
        prop_assert_eq!(
            summary.last_transaction_date,
            rows.iter().map(|r| r.transaction_date).max()
        );
    }

    #[test]
    fn prop_snapshot_agrees_with_summary(raw in customer_rows()) {
        let customer = CustomerId::new();
        let store = StoreId::new();
        let rows = build(customer, store, &raw);

        let summary = customer_summary(&rows);
        let snapshot = balance_snapshot(customer, store, &rows);

        prop_assert_eq!(snapshot.outstanding_balance, summary.outstanding_balance);
        prop_assert_eq!(snapshot.last_transaction_date, summary.last_transaction_date);
        prop_assert!(snapshot.last_credit_date <= snapshot.last_transaction_date);
        prop_assert!(snapshot.last_payment_date <= snapshot.last_transaction_date);
    }

    #[test]
    fn prop_ranking_is_positive_sorted_and_bounded(
        raw in store_rows(),
        limit in prop::option::of(0usize..8),
    ) {
        let store = StoreId::new();
        let customers: Vec<CustomerId> = (0..6).map(|_| CustomerId::new()).collect();
        let rows: Vec<CreditEntry> = raw
            .iter()
            .enumerate()
            .map(|(i, (c, t, amount))| {
                entry(customers[*c], store, *t, *amount, day(u32::try_from(i).unwrap()))
            })
            .collect();

        let ranked = rank_outstanding(&rows, limit);

        prop_assert!(ranked.iter().all(|r| r.outstanding_balance > Decimal::ZERO));
        prop_assert!(ranked
            .windows(2)
            .all(|w| w[0].outstanding_balance >= w[1].outstanding_balance));
        if let Some(limit) = limit {
            prop_assert!(ranked.len() <= limit);
        }
        for r in &ranked {
            prop_assert_eq!(
                r.outstanding_balance,
                r.total_credit_given - r.total_payments_received
            );
        }
    }

    #[test]
    fn prop_store_outstanding_is_sum_of_customers(raw in store_rows()) {
        let store = StoreId::new();
        let customers: Vec<CustomerId> = (0..6).map(|_| CustomerId::new()).collect();
        let rows: Vec<CreditEntry> = raw
            .iter()
            .map(|(c, t, amount)| entry(customers[*c], store, *t, *amount, day(1)))
            .collect();

        let summary = store_summary(&rows);
        let per_customer: Decimal = customers
            .iter()
            .map(|c| {
                let mine: Vec<CreditEntry> =
                    rows.iter().filter(|r| r.customer_id == *c).cloned().collect();
                customer_summary(&mine).outstanding_balance
            })
            .sum();

        prop_assert_eq!(summary.outstanding_balance, per_customer);
        prop_assert!(summary.total_customers <= 6);
    }
}
