//! Credit service: business rules around ledger reads and writes.
//!
//! Checks run in a fixed order and the first failure wins, so callers always
//! see the most specific error for a request.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use khata_shared::types::{CreditId, CustomerId, StoreId};
use rust_decimal::Decimal;
use tracing::{info, warn};

use super::aggregate;
use super::error::LedgerError;
use super::store::CreditStore;
use super::types::{
    CreateCreditInput, CreditChanges, CreditDetails, CreditEntry, CreditFilter, Customer,
    CustomerBrief, CustomerSummary, RankedCustomer, Store, StoreSummary, TransactionType,
};
use super::validation;

/// Orchestrates validation, persistence, and aggregation for the ledger.
#[derive(Debug)]
pub struct CreditService<S> {
    store: Arc<S>,
}

impl<S> Clone for CreditService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: CreditStore> CreditService<S> {
    /// Creates a new credit service over the given store.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    async fn customer(&self, id: CustomerId) -> Result<Customer, LedgerError> {
        self.store
            .find_customer(id)
            .await?
            .ok_or(LedgerError::CustomerNotFound)
    }

    async fn store_record(&self, id: StoreId) -> Result<Store, LedgerError> {
        self.store
            .find_store(id)
            .await?
            .ok_or(LedgerError::StoreNotFound)
    }

    async fn credit(&self, id: CreditId) -> Result<CreditEntry, LedgerError> {
        self.store
            .find_credit(id)
            .await?
            .ok_or(LedgerError::CreditNotFound)
    }

    async fn current_balance(
        &self,
        customer_id: CustomerId,
        store_id: StoreId,
    ) -> Result<Decimal, LedgerError> {
        let rows = self
            .store
            .customer_credits(customer_id, Some(store_id))
            .await?;
        Ok(aggregate::outstanding_balance(&rows))
    }

    /// Records a new transaction.
    ///
    /// Order of checks: customer exists, store exists, customer belongs to the
    /// store, amount positive, customer active, journal number for payments,
    /// credit limit for credits.
    pub async fn create_credit(
        &self,
        input: CreateCreditInput,
    ) -> Result<CreditEntry, LedgerError> {
        let customer = self.customer(input.customer_id).await?;
        let store = self.store_record(input.store_id).await?;

        if customer.store_id != store.id {
            return Err(LedgerError::CustomerStoreMismatch);
        }
        validation::validate_amount(input.amount)?;
        if !customer.is_active {
            return Err(LedgerError::CustomerInactive);
        }
        validation::validate_journal_number(
            input.transaction_type,
            input.journal_number.as_deref(),
        )?;

        if input.transaction_type == TransactionType::CreditGiven
            && let Some(limit) = customer.credit_limit
        {
            let current = self.current_balance(customer.id, store.id).await?;
            if let Err(e) = validation::check_credit_limit(current, input.amount, limit) {
                warn!(
                    customer_id = %customer.id,
                    %current,
                    %limit,
                    amount = %input.amount,
                    "Credit limit exceeded"
                );
                return Err(e);
            }
        }

        let now = Utc::now();
        let entry = CreditEntry {
            id: CreditId::new(),
            customer_id: customer.id,
            store_id: store.id,
            amount: input.amount,
            transaction_type: input.transaction_type,
            items_description: input.items_description,
            journal_number: input.journal_number,
            transaction_date: input.transaction_date.unwrap_or(now),
            created_by_owner_id: input.created_by_owner_id,
            created_at: now,
            updated_at: now,
        };

        let saved = self.store.insert_credit(&entry).await?;
        info!(
            credit_id = %saved.id,
            customer_id = %saved.customer_id,
            store_id = %saved.store_id,
            transaction_type = %saved.transaction_type,
            amount = %saved.amount,
            "Credit recorded"
        );
        Ok(saved)
    }

    /// Applies a partial update to a transaction.
    pub async fn update_credit(
        &self,
        id: CreditId,
        changes: CreditChanges,
    ) -> Result<CreditEntry, LedgerError> {
        let existing = self.credit(id).await?;

        if let Some(amount) = changes.amount {
            validation::validate_amount(amount)?;
        }

        let updated = changes.apply_to(&existing);
        validation::validate_journal_number(
            updated.transaction_type,
            updated.journal_number.as_deref(),
        )?;

        if changes.touches_balance() && updated.transaction_type == TransactionType::CreditGiven {
            let customer = self.store.find_customer(existing.customer_id).await?;
            if let Some(limit) = customer.and_then(|c| c.credit_limit) {
                let current = self
                    .current_balance(existing.customer_id, existing.store_id)
                    .await?;
                let adjusted = validation::adjusted_balance(current, &existing, &updated);
                if adjusted > limit {
                    warn!(
                        credit_id = %id,
                        %current,
                        %adjusted,
                        %limit,
                        "Credit limit exceeded on update"
                    );
                    return Err(LedgerError::CreditLimitExceeded {
                        current_balance: current,
                        credit_limit: limit,
                        amount: updated.amount,
                    });
                }
            }
        }

        if changes.is_empty() {
            return Ok(existing);
        }

        let saved = self.store.update_credit(id, &changes).await?;
        info!(credit_id = %id, "Credit updated");
        Ok(saved)
    }

    /// Deletes a transaction.
    pub async fn delete_credit(&self, id: CreditId) -> Result<(), LedgerError> {
        let existing = self.credit(id).await?;
        self.store.delete_credit(id).await?;
        info!(credit_id = %id, customer_id = %existing.customer_id, "Credit deleted");
        Ok(())
    }

    /// Returns a transaction by ID.
    pub async fn get_credit(&self, id: CreditId) -> Result<CreditEntry, LedgerError> {
        self.credit(id).await
    }

    /// Lists a customer's transactions, newest first.
    pub async fn customer_credits(
        &self,
        customer_id: CustomerId,
        store_id: Option<StoreId>,
    ) -> Result<Vec<CreditEntry>, LedgerError> {
        self.customer(customer_id).await?;
        Ok(self.store.customer_credits(customer_id, store_id).await?)
    }

    /// Lists a store's transactions, newest first.
    pub async fn store_credits(&self, store_id: StoreId) -> Result<Vec<CreditEntry>, LedgerError> {
        self.store_record(store_id).await?;
        Ok(self.store.store_credits(store_id).await?)
    }

    /// Lists transactions matching a filter, newest first.
    pub async fn filter_credits(
        &self,
        filter: &CreditFilter,
    ) -> Result<Vec<CreditEntry>, LedgerError> {
        if let Some(customer_id) = filter.customer_id {
            self.customer(customer_id).await?;
        }
        if let Some(store_id) = filter.store_id {
            self.store_record(store_id).await?;
        }
        validation::validate_filter(filter)?;

        Ok(self.store.filter_credits(filter).await?)
    }

    /// The `limit` most recent transactions, for one store or all stores.
    pub async fn recent_credits(
        &self,
        limit: u64,
        store_id: Option<StoreId>,
    ) -> Result<Vec<CreditDetails>, LedgerError> {
        validation::validate_recent_limit(limit)?;
        if let Some(store_id) = store_id {
            self.store_record(store_id).await?;
        }
        Ok(self.store.recent_credits(store_id, limit).await?)
    }

    /// Transactions dated within `start..=end`, newest first.
    pub async fn credits_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        store_id: Option<StoreId>,
    ) -> Result<Vec<CreditDetails>, LedgerError> {
        validation::validate_date_span(start, end)?;
        if let Some(store_id) = store_id {
            self.store_record(store_id).await?;
        }
        Ok(self.store.credits_between(start, end, store_id).await?)
    }

    /// Totals for one customer, optionally limited to one store.
    pub async fn customer_summary(
        &self,
        customer_id: CustomerId,
        store_id: Option<StoreId>,
    ) -> Result<CustomerSummary, LedgerError> {
        self.customer(customer_id).await?;
        let rows = self.store.customer_credits(customer_id, store_id).await?;
        Ok(aggregate::customer_summary(&rows))
    }

    /// Totals for one store.
    pub async fn store_summary(&self, store_id: StoreId) -> Result<StoreSummary, LedgerError> {
        self.store_record(store_id).await?;
        let rows = self.store.store_credits(store_id).await?;
        Ok(aggregate::store_summary(&rows))
    }

    /// Customers of a store who owe money, highest balance first.
    pub async fn outstanding_balances(
        &self,
        store_id: StoreId,
        limit: Option<usize>,
    ) -> Result<Vec<RankedCustomer>, LedgerError> {
        self.store_record(store_id).await?;
        let rows = self.store.store_credits(store_id).await?;
        let ranked = aggregate::rank_outstanding(&rows, limit);

        let ids: Vec<CustomerId> = ranked.iter().map(|r| r.customer_id).collect();
        let customers = self.store.find_customers(&ids).await?;

        Ok(ranked
            .into_iter()
            .map(|balance| {
                let customer = customers
                    .iter()
                    .find(|c| c.id == balance.customer_id)
                    .map(CustomerBrief::from);
                RankedCustomer { balance, customer }
            })
            .collect())
    }
}
