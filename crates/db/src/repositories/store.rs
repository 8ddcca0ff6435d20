//! Store repository for database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set, TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

use khata_shared::types::{StoreId, StoreOwnerId};

use super::constraint::{Violation, violation};
use crate::entities::{store_owners, stores};

/// Error types for store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Another store already uses this phone number.
    #[error("Store phone number already registered")]
    PhoneTaken,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a store.
#[derive(Debug, Clone)]
pub struct CreateStoreInput {
    /// Display name.
    pub name: String,
    /// Contact phone number, unique across stores.
    pub phone_number: String,
    /// Street address.
    pub address: Option<String>,
}

/// Store repository.
#[derive(Debug, Clone)]
pub struct StoreRepository {
    db: DatabaseConnection,
}

impl StoreRepository {
    /// Creates a new store repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a store by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: StoreId) -> Result<Option<stores::Model>, DbErr> {
        stores::Entity::find_by_id(id.into_inner()).one(&self.db).await
    }

    /// Checks if a phone number already belongs to a store.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn phone_exists(&self, phone_number: &str) -> Result<bool, DbErr> {
        let count = stores::Entity::find()
            .filter(stores::Column::PhoneNumber.eq(phone_number))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    /// Creates a store and attaches it to `owner_id` if that owner has none yet.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::PhoneTaken` if the phone number is in use.
    pub async fn create_for_owner(
        &self,
        owner_id: StoreOwnerId,
        input: CreateStoreInput,
    ) -> Result<stores::Model, StoreError> {
        if self.phone_exists(&input.phone_number).await? {
            return Err(StoreError::PhoneTaken);
        }

        let txn = self.db.begin().await?;
        let now = Utc::now();

        let store = stores::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(input.name),
            phone_number: Set(input.phone_number),
            address: Set(input.address),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| match violation(&e) {
            Some(Violation::Unique) => StoreError::PhoneTaken,
            _ => StoreError::Database(e),
        })?;

        store_owners::Entity::update_many()
            .col_expr(store_owners::Column::StoreId, Expr::value(store.id))
            .col_expr(store_owners::Column::UpdatedAt, Expr::value(now))
            .filter(store_owners::Column::Id.eq(owner_id.into_inner()))
            .filter(store_owners::Column::StoreId.is_null())
            .exec(&txn)
            .await?;

        txn.commit().await?;

        tracing::info!(store_id = %store.id, owner_id = %owner_id, "Store created");
        Ok(store)
    }
}
