//! Test fixtures: row builders and an in-memory `CreditStore`.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use khata_shared::types::{CreditId, CustomerId, StoreId};
use rust_decimal::Decimal;

use super::aggregate;
use super::store::CreditStore;
use super::types::{
    BalanceSnapshot, CreditChanges, CreditDetails, CreditEntry, CreditFilter, Customer,
    CustomerBrief, Store, StoreBrief, TransactionType,
};
use crate::persistence::PersistenceError;

/// 2026-01-01 plus `n` days, at midnight UTC.
pub fn day(n: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap() + Duration::days(i64::from(n))
}

/// A ledger row with everything but the interesting fields defaulted.
pub fn entry(
    customer_id: CustomerId,
    store_id: StoreId,
    transaction_type: TransactionType,
    amount: Decimal,
    transaction_date: DateTime<Utc>,
) -> CreditEntry {
    let journal_number = (transaction_type == TransactionType::PaymentReceived)
        .then(|| "J-TEST".to_string());
    CreditEntry {
        id: CreditId::new(),
        customer_id,
        store_id,
        amount,
        transaction_type,
        items_description: None,
        journal_number,
        transaction_date,
        created_by_owner_id: None,
        created_at: transaction_date,
        updated_at: transaction_date,
    }
}

#[derive(Default)]
struct Tables {
    stores: Vec<Store>,
    customers: Vec<Customer>,
    credits: Vec<CreditEntry>,
    balances: HashMap<(CustomerId, StoreId), BalanceSnapshot>,
}

impl Tables {
    fn refresh_balance(&mut self, customer_id: CustomerId, store_id: StoreId) {
        let rows: Vec<CreditEntry> = self
            .credits
            .iter()
            .filter(|c| c.customer_id == customer_id && c.store_id == store_id)
            .cloned()
            .collect();
        self.balances.insert(
            (customer_id, store_id),
            aggregate::balance_snapshot(customer_id, store_id, &rows),
        );
    }

    fn details(&self, credit: &CreditEntry) -> Option<CreditDetails> {
        let customer = self.customers.iter().find(|c| c.id == credit.customer_id)?;
        let store = self.stores.iter().find(|s| s.id == credit.store_id)?;
        Some(CreditDetails {
            credit: credit.clone(),
            customer: CustomerBrief::from(customer),
            store: StoreBrief::from(store),
        })
    }
}

fn newest_first(mut rows: Vec<CreditEntry>) -> Vec<CreditEntry> {
    rows.sort_by(|a, b| b.transaction_date.cmp(&a.transaction_date));
    rows
}

/// `CreditStore` backed by vectors behind a mutex.
#[derive(Default)]
pub struct InMemoryCreditStore {
    tables: Mutex<Tables>,
    fail_writes: Mutex<bool>,
}

impl InMemoryCreditStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_store(&self, name: &str) -> Store {
        let store = Store {
            id: StoreId::new(),
            name: name.to_string(),
        };
        self.tables.lock().unwrap().stores.push(store.clone());
        store
    }

    pub fn add_customer(
        &self,
        store_id: StoreId,
        name: &str,
        credit_limit: Option<Decimal>,
    ) -> Customer {
        let mut tables = self.tables.lock().unwrap();
        let customer = Customer {
            id: CustomerId::new(),
            store_id,
            name: name.to_string(),
            phone_number: format!("98000000{:02}", tables.customers.len()),
            credit_limit,
            is_active: true,
        };
        tables.customers.push(customer.clone());
        customer
    }

    pub fn deactivate(&self, customer_id: CustomerId) {
        let mut tables = self.tables.lock().unwrap();
        if let Some(c) = tables.customers.iter_mut().find(|c| c.id == customer_id) {
            c.is_active = false;
        }
    }

    /// Inserts a row directly, bypassing service rules.
    pub fn seed(&self, row: CreditEntry) {
        let mut tables = self.tables.lock().unwrap();
        let key = (row.customer_id, row.store_id);
        tables.credits.push(row);
        tables.refresh_balance(key.0, key.1);
    }

    /// Makes every subsequent write fail.
    pub fn fail_writes(&self) {
        *self.fail_writes.lock().unwrap() = true;
    }

    pub fn balance(&self, customer_id: CustomerId, store_id: StoreId) -> Option<BalanceSnapshot> {
        self.tables
            .lock()
            .unwrap()
            .balances
            .get(&(customer_id, store_id))
            .cloned()
    }

    pub fn credit_count(&self) -> usize {
        self.tables.lock().unwrap().credits.len()
    }

    fn check_writable(&self) -> Result<(), PersistenceError> {
        if *self.fail_writes.lock().unwrap() {
            return Err(PersistenceError::new("connection reset"));
        }
        Ok(())
    }
}

#[async_trait]
impl CreditStore for InMemoryCreditStore {
    async fn find_customer(&self, id: CustomerId) -> Result<Option<Customer>, PersistenceError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.customers.iter().find(|c| c.id == id).cloned())
    }

    async fn find_customers(&self, ids: &[CustomerId]) -> Result<Vec<Customer>, PersistenceError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .customers
            .iter()
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect())
    }

    async fn find_store(&self, id: StoreId) -> Result<Option<Store>, PersistenceError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.stores.iter().find(|s| s.id == id).cloned())
    }

    async fn find_credit(&self, id: CreditId) -> Result<Option<CreditEntry>, PersistenceError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.credits.iter().find(|c| c.id == id).cloned())
    }

    async fn customer_credits(
        &self,
        customer_id: CustomerId,
        store_id: Option<StoreId>,
    ) -> Result<Vec<CreditEntry>, PersistenceError> {
        let tables = self.tables.lock().unwrap();
        Ok(newest_first(
            tables
                .credits
                .iter()
                .filter(|c| c.customer_id == customer_id)
                .filter(|c| store_id.is_none_or(|s| c.store_id == s))
                .cloned()
                .collect(),
        ))
    }

    async fn store_credits(&self, store_id: StoreId) -> Result<Vec<CreditEntry>, PersistenceError> {
        let tables = self.tables.lock().unwrap();
        Ok(newest_first(
            tables
                .credits
                .iter()
                .filter(|c| c.store_id == store_id)
                .cloned()
                .collect(),
        ))
    }

    async fn filter_credits(
        &self,
        filter: &CreditFilter,
    ) -> Result<Vec<CreditEntry>, PersistenceError> {
        let tables = self.tables.lock().unwrap();
        Ok(newest_first(
            tables
                .credits
                .iter()
                .filter(|c| filter.customer_id.is_none_or(|v| c.customer_id == v))
                .filter(|c| filter.store_id.is_none_or(|v| c.store_id == v))
                .filter(|c| filter.transaction_type.is_none_or(|v| c.transaction_type == v))
                .filter(|c| filter.start_date.is_none_or(|v| c.transaction_date >= v))
                .filter(|c| filter.end_date.is_none_or(|v| c.transaction_date <= v))
                .filter(|c| filter.min_amount.is_none_or(|v| c.amount >= v))
                .filter(|c| filter.max_amount.is_none_or(|v| c.amount <= v))
                .cloned()
                .collect(),
        ))
    }

    async fn recent_credits(
        &self,
        store_id: Option<StoreId>,
        limit: u64,
    ) -> Result<Vec<CreditDetails>, PersistenceError> {
        let tables = self.tables.lock().unwrap();
        let rows = newest_first(
            tables
                .credits
                .iter()
                .filter(|c| store_id.is_none_or(|s| c.store_id == s))
                .cloned()
                .collect(),
        );
        Ok(rows
            .iter()
            .take(usize::try_from(limit).unwrap())
            .filter_map(|c| tables.details(c))
            .collect())
    }

    async fn credits_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        store_id: Option<StoreId>,
    ) -> Result<Vec<CreditDetails>, PersistenceError> {
        let tables = self.tables.lock().unwrap();
        let rows = newest_first(
            tables
                .credits
                .iter()
                .filter(|c| c.transaction_date >= start && c.transaction_date <= end)
                .filter(|c| store_id.is_none_or(|s| c.store_id == s))
                .cloned()
                .collect(),
        );
        Ok(rows.iter().filter_map(|c| tables.details(c)).collect())
    }

    async fn insert_credit(&self, entry: &CreditEntry) -> Result<CreditEntry, PersistenceError> {
        self.check_writable()?;
        self.seed(entry.clone());
        Ok(entry.clone())
    }

    async fn update_credit(
        &self,
        id: CreditId,
        changes: &CreditChanges,
    ) -> Result<CreditEntry, PersistenceError> {
        self.check_writable()?;
        let mut tables = self.tables.lock().unwrap();
        let row = tables
            .credits
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| PersistenceError::new("row vanished"))?;
        *row = changes.apply_to(row);
        row.updated_at = Utc::now();
        let updated = row.clone();
        tables.refresh_balance(updated.customer_id, updated.store_id);
        Ok(updated)
    }

    async fn delete_credit(&self, id: CreditId) -> Result<(), PersistenceError> {
        self.check_writable()?;
        let mut tables = self.tables.lock().unwrap();
        let Some(pos) = tables.credits.iter().position(|c| c.id == id) else {
            return Ok(());
        };
        let removed = tables.credits.remove(pos);
        tables.refresh_balance(removed.customer_id, removed.store_id);
        Ok(())
    }
}
