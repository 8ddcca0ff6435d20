//! Persistence contract for the credit ledger.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use khata_shared::types::{CreditId, CustomerId, StoreId};

use super::types::{CreditChanges, CreditDetails, CreditEntry, CreditFilter, Customer, Store};
use crate::persistence::PersistenceError;

/// Storage operations the credit service depends on.
///
/// Every write (`insert_credit`, `update_credit`, `delete_credit`) must
/// recompute the affected customer's cached balance from the full row set in
/// the same database transaction as the write itself.
#[async_trait]
pub trait CreditStore: Send + Sync {
    /// Finds a customer by ID.
    async fn find_customer(&self, id: CustomerId) -> Result<Option<Customer>, PersistenceError>;

    /// Finds customers by ID. Unknown IDs are skipped.
    async fn find_customers(&self, ids: &[CustomerId]) -> Result<Vec<Customer>, PersistenceError>;

    /// Finds a store by ID.
    async fn find_store(&self, id: StoreId) -> Result<Option<Store>, PersistenceError>;

    /// Finds a ledger row by ID.
    async fn find_credit(&self, id: CreditId) -> Result<Option<CreditEntry>, PersistenceError>;

    /// All rows for a customer, optionally limited to one store, newest first.
    async fn customer_credits(
        &self,
        customer_id: CustomerId,
        store_id: Option<StoreId>,
    ) -> Result<Vec<CreditEntry>, PersistenceError>;

    /// All rows for a store, newest first.
    async fn store_credits(&self, store_id: StoreId) -> Result<Vec<CreditEntry>, PersistenceError>;

    /// Rows matching every set field of `filter`, newest first.
    async fn filter_credits(
        &self,
        filter: &CreditFilter,
    ) -> Result<Vec<CreditEntry>, PersistenceError>;

    /// The `limit` newest rows, for one store or across all stores.
    async fn recent_credits(
        &self,
        store_id: Option<StoreId>,
        limit: u64,
    ) -> Result<Vec<CreditDetails>, PersistenceError>;

    /// Rows whose date lies in `start..=end`, newest first.
    async fn credits_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        store_id: Option<StoreId>,
    ) -> Result<Vec<CreditDetails>, PersistenceError>;

    /// Persists a new row and refreshes the customer's cached balance.
    async fn insert_credit(&self, entry: &CreditEntry) -> Result<CreditEntry, PersistenceError>;

    /// Applies only the set fields of `changes` and refreshes the cached balance.
    async fn update_credit(
        &self,
        id: CreditId,
        changes: &CreditChanges,
    ) -> Result<CreditEntry, PersistenceError>;

    /// Deletes a row and refreshes the cached balance.
    async fn delete_credit(&self, id: CreditId) -> Result<(), PersistenceError>;
}
