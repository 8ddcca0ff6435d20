//! Credit repository: ledger rows and the customer balance cache.
//!
//! Every write runs in one database transaction together with the rebuild of
//! the affected `customer_balances` row.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, QuerySelect, Select, Set, TransactionTrait,
    sea_query::OnConflict,
};
use uuid::Uuid;

use khata_core::PersistenceError;
use khata_core::ledger::{
    CreditChanges, CreditDetails, CreditEntry, CreditFilter, CreditStore, Customer, CustomerBrief,
    Store, StoreBrief, aggregate,
};
use khata_shared::types::{CreditId, CustomerId, StoreId, StoreOwnerId};

use super::constraint::persistence;
use crate::entities::{credits, customer_balances, customers, stores};

fn to_entry(model: credits::Model) -> CreditEntry {
    CreditEntry {
        id: CreditId::from(model.id),
        customer_id: CustomerId::from(model.customer_id),
        store_id: StoreId::from(model.store_id),
        amount: model.amount,
        transaction_type: model.transaction_type.into(),
        items_description: model.items_description,
        journal_number: model.journal_number,
        transaction_date: model.transaction_date,
        created_by_owner_id: model.created_by_owner_id.map(StoreOwnerId::from),
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

pub(crate) fn to_customer(model: customers::Model) -> Customer {
    Customer {
        id: CustomerId::from(model.id),
        store_id: StoreId::from(model.store_id),
        name: model.name,
        phone_number: model.phone_number,
        credit_limit: model.credit_limit,
        is_active: model.is_active,
    }
}

fn to_store(model: stores::Model) -> Store {
    Store {
        id: StoreId::from(model.id),
        name: model.name,
    }
}

/// Rebuilds the cached balance of one customer in one store from its rows.
async fn refresh_balance<C: ConnectionTrait>(
    conn: &C,
    customer_id: Uuid,
    store_id: Uuid,
) -> Result<(), DbErr> {
    let rows: Vec<CreditEntry> = credits::Entity::find()
        .filter(credits::Column::CustomerId.eq(customer_id))
        .filter(credits::Column::StoreId.eq(store_id))
        .all(conn)
        .await?
        .into_iter()
        .map(to_entry)
        .collect();

    let snapshot = aggregate::balance_snapshot(
        CustomerId::from(customer_id),
        StoreId::from(store_id),
        &rows,
    );

    let balance = customer_balances::ActiveModel {
        id: Set(Uuid::now_v7()),
        customer_id: Set(customer_id),
        store_id: Set(store_id),
        total_credit_given: Set(snapshot.total_credit_given),
        total_payments_received: Set(snapshot.total_payments_received),
        outstanding_balance: Set(snapshot.outstanding_balance),
        last_credit_date: Set(snapshot.last_credit_date),
        last_payment_date: Set(snapshot.last_payment_date),
        last_transaction_date: Set(snapshot.last_transaction_date),
        updated_at: Set(Utc::now()),
    };

    customer_balances::Entity::insert(balance)
        .on_conflict(
            OnConflict::columns([
                customer_balances::Column::CustomerId,
                customer_balances::Column::StoreId,
            ])
            .update_columns([
                customer_balances::Column::TotalCreditGiven,
                customer_balances::Column::TotalPaymentsReceived,
                customer_balances::Column::OutstandingBalance,
                customer_balances::Column::LastCreditDate,
                customer_balances::Column::LastPaymentDate,
                customer_balances::Column::LastTransactionDate,
                customer_balances::Column::UpdatedAt,
            ])
            .to_owned(),
        )
        .exec(conn)
        .await?;

    Ok(())
}

/// Credit repository backed by `SeaORM`.
#[derive(Debug, Clone)]
pub struct CreditRepository {
    db: DatabaseConnection,
}

impl CreditRepository {
    /// Creates a new credit repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn newest_first(query: Select<credits::Entity>) -> Select<credits::Entity> {
        query
            .order_by_desc(credits::Column::TransactionDate)
            .order_by_desc(credits::Column::CreatedAt)
    }

    async fn fetch(&self, query: Select<credits::Entity>) -> Result<Vec<CreditEntry>, DbErr> {
        Ok(Self::newest_first(query)
            .all(&self.db)
            .await?
            .into_iter()
            .map(to_entry)
            .collect())
    }

    /// Attaches customer and store projections, keeping row order.
    async fn with_details(&self, rows: Vec<credits::Model>) -> Result<Vec<CreditDetails>, DbErr> {
        let customer_ids: Vec<Uuid> = rows.iter().map(|r| r.customer_id).collect();
        let store_ids: Vec<Uuid> = rows.iter().map(|r| r.store_id).collect();

        let customers: HashMap<Uuid, customers::Model> = customers::Entity::find()
            .filter(customers::Column::Id.is_in(customer_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();
        let stores: HashMap<Uuid, stores::Model> = stores::Entity::find()
            .filter(stores::Column::Id.is_in(store_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let customer = to_customer(customers.get(&row.customer_id)?.clone());
                let store = to_store(stores.get(&row.store_id)?.clone());
                Some(CreditDetails {
                    credit: to_entry(row),
                    customer: CustomerBrief::from(&customer),
                    store: StoreBrief::from(&store),
                })
            })
            .collect())
    }

    /// Returns the cached balance rows of a customer, one per store.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn cached_balances(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<customer_balances::Model>, DbErr> {
        customer_balances::Entity::find()
            .filter(customer_balances::Column::CustomerId.eq(customer_id.into_inner()))
            .all(&self.db)
            .await
    }
}

#[async_trait]
impl CreditStore for CreditRepository {
    async fn find_customer(&self, id: CustomerId) -> Result<Option<Customer>, PersistenceError> {
        customers::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map(|m| m.map(to_customer))
            .map_err(persistence)
    }

    async fn find_customers(&self, ids: &[CustomerId]) -> Result<Vec<Customer>, PersistenceError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        customers::Entity::find()
            .filter(customers::Column::Id.is_in(ids.iter().map(|id| id.into_inner())))
            .all(&self.db)
            .await
            .map(|rows| rows.into_iter().map(to_customer).collect())
            .map_err(persistence)
    }

    async fn find_store(&self, id: StoreId) -> Result<Option<Store>, PersistenceError> {
        stores::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map(|m| m.map(to_store))
            .map_err(persistence)
    }

    async fn find_credit(&self, id: CreditId) -> Result<Option<CreditEntry>, PersistenceError> {
        credits::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map(|m| m.map(to_entry))
            .map_err(persistence)
    }

    async fn customer_credits(
        &self,
        customer_id: CustomerId,
        store_id: Option<StoreId>,
    ) -> Result<Vec<CreditEntry>, PersistenceError> {
        let mut query = credits::Entity::find()
            .filter(credits::Column::CustomerId.eq(customer_id.into_inner()));
        if let Some(store_id) = store_id {
            query = query.filter(credits::Column::StoreId.eq(store_id.into_inner()));
        }
        self.fetch(query).await.map_err(persistence)
    }

    async fn store_credits(&self, store_id: StoreId) -> Result<Vec<CreditEntry>, PersistenceError> {
        let query =
            credits::Entity::find().filter(credits::Column::StoreId.eq(store_id.into_inner()));
        self.fetch(query).await.map_err(persistence)
    }

    async fn filter_credits(
        &self,
        filter: &CreditFilter,
    ) -> Result<Vec<CreditEntry>, PersistenceError> {
        let mut query = credits::Entity::find();

        if let Some(customer_id) = filter.customer_id {
            query = query.filter(credits::Column::CustomerId.eq(customer_id.into_inner()));
        }
        if let Some(store_id) = filter.store_id {
            query = query.filter(credits::Column::StoreId.eq(store_id.into_inner()));
        }
        if let Some(transaction_type) = filter.transaction_type {
            let db_type: crate::entities::sea_orm_active_enums::TransactionType =
                transaction_type.into();
            query = query.filter(credits::Column::TransactionType.eq(db_type));
        }
        if let Some(start) = filter.start_date {
            query = query.filter(credits::Column::TransactionDate.gte(start));
        }
        if let Some(end) = filter.end_date {
            query = query.filter(credits::Column::TransactionDate.lte(end));
        }
        if let Some(min) = filter.min_amount {
            query = query.filter(credits::Column::Amount.gte(min));
        }
        if let Some(max) = filter.max_amount {
            query = query.filter(credits::Column::Amount.lte(max));
        }

        self.fetch(query).await.map_err(persistence)
    }

    async fn recent_credits(
        &self,
        store_id: Option<StoreId>,
        limit: u64,
    ) -> Result<Vec<CreditDetails>, PersistenceError> {
        let mut query = credits::Entity::find();
        if let Some(store_id) = store_id {
            query = query.filter(credits::Column::StoreId.eq(store_id.into_inner()));
        }
        let rows = Self::newest_first(query)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(persistence)?;

        self.with_details(rows).await.map_err(persistence)
    }

    async fn credits_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        store_id: Option<StoreId>,
    ) -> Result<Vec<CreditDetails>, PersistenceError> {
        let mut query = credits::Entity::find()
            .filter(credits::Column::TransactionDate.gte(start))
            .filter(credits::Column::TransactionDate.lte(end));
        if let Some(store_id) = store_id {
            query = query.filter(credits::Column::StoreId.eq(store_id.into_inner()));
        }
        let rows = Self::newest_first(query)
            .all(&self.db)
            .await
            .map_err(persistence)?;

        self.with_details(rows).await.map_err(persistence)
    }

    async fn insert_credit(&self, entry: &CreditEntry) -> Result<CreditEntry, PersistenceError> {
        let txn = self.db.begin().await.map_err(persistence)?;

        let model = credits::ActiveModel {
            id: Set(entry.id.into_inner()),
            customer_id: Set(entry.customer_id.into_inner()),
            store_id: Set(entry.store_id.into_inner()),
            amount: Set(entry.amount),
            transaction_type: Set(entry.transaction_type.into()),
            items_description: Set(entry.items_description.clone()),
            journal_number: Set(entry.journal_number.clone()),
            transaction_date: Set(entry.transaction_date),
            created_by_owner_id: Set(entry.created_by_owner_id.map(StoreOwnerId::into_inner)),
            created_at: Set(entry.created_at),
            updated_at: Set(entry.updated_at),
        }
        .insert(&txn)
        .await
        .map_err(persistence)?;

        refresh_balance(&txn, model.customer_id, model.store_id)
            .await
            .map_err(persistence)?;
        txn.commit().await.map_err(persistence)?;

        Ok(to_entry(model))
    }

    async fn update_credit(
        &self,
        id: CreditId,
        changes: &CreditChanges,
    ) -> Result<CreditEntry, PersistenceError> {
        let txn = self.db.begin().await.map_err(persistence)?;

        let existing = credits::Entity::find_by_id(id.into_inner())
            .one(&txn)
            .await
            .map_err(persistence)?
            .ok_or_else(|| PersistenceError::new(format!("credit {id} disappeared")))?;

        let mut model = existing.into_active_model();
        if let Some(amount) = changes.amount {
            model.amount = Set(amount);
        }
        if let Some(transaction_type) = changes.transaction_type {
            model.transaction_type = Set(transaction_type.into());
        }
        if let Some(items_description) = &changes.items_description {
            model.items_description = Set(items_description.clone());
        }
        if let Some(journal_number) = &changes.journal_number {
            model.journal_number = Set(journal_number.clone());
        }
        if let Some(transaction_date) = changes.transaction_date {
            model.transaction_date = Set(transaction_date);
        }
        model.updated_at = Set(Utc::now());

        let updated = model.update(&txn).await.map_err(persistence)?;
        refresh_balance(&txn, updated.customer_id, updated.store_id)
            .await
            .map_err(persistence)?;
        txn.commit().await.map_err(persistence)?;

        Ok(to_entry(updated))
    }

    async fn delete_credit(&self, id: CreditId) -> Result<(), PersistenceError> {
        let txn = self.db.begin().await.map_err(persistence)?;

        let Some(existing) = credits::Entity::find_by_id(id.into_inner())
            .one(&txn)
            .await
            .map_err(persistence)?
        else {
            return Ok(());
        };

        credits::Entity::delete_by_id(existing.id)
            .exec(&txn)
            .await
            .map_err(persistence)?;
        refresh_balance(&txn, existing.customer_id, existing.store_id)
            .await
            .map_err(persistence)?;
        txn.commit().await.map_err(persistence)?;

        Ok(())
    }
}
