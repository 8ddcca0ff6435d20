//! Store owner repository: credentials, refresh tokens, access-token records.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, sea_query::Expr,
};
use uuid::Uuid;

use khata_core::PersistenceError;
use khata_core::auth::{NewOwner, OwnerCredentials, OwnerStore, RefreshTokenRecord};
use khata_shared::auth::OwnerProfile;
use khata_shared::types::{RefreshTokenId, StoreId, StoreOwnerId};

use super::constraint::persistence;
use crate::entities::{refresh_tokens, store_owners, tokens};

fn to_profile(model: &store_owners::Model) -> OwnerProfile {
    OwnerProfile {
        id: StoreOwnerId::from(model.id),
        name: model.name.clone(),
        phone_number: model.phone_number.clone(),
        store_id: model.store_id.map(StoreId::from),
        is_active: model.is_active,
        last_login_at: model.last_login_at,
        created_at: model.created_at,
    }
}

/// Store owner repository backed by `SeaORM`.
#[derive(Debug, Clone)]
pub struct StoreOwnerRepository {
    db: DatabaseConnection,
}

impl StoreOwnerRepository {
    /// Creates a new store owner repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OwnerStore for StoreOwnerRepository {
    async fn find_by_phone(
        &self,
        phone_number: &str,
    ) -> Result<Option<OwnerCredentials>, PersistenceError> {
        let owner = store_owners::Entity::find()
            .filter(store_owners::Column::PhoneNumber.eq(phone_number))
            .one(&self.db)
            .await
            .map_err(persistence)?;

        Ok(owner.map(|m| OwnerCredentials {
            profile: to_profile(&m),
            password_hash: m.password_hash,
        }))
    }

    async fn find_by_id(
        &self,
        id: StoreOwnerId,
    ) -> Result<Option<OwnerProfile>, PersistenceError> {
        store_owners::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map(|m| m.as_ref().map(to_profile))
            .map_err(persistence)
    }

    async fn phone_exists(&self, phone_number: &str) -> Result<bool, PersistenceError> {
        let count = store_owners::Entity::find()
            .filter(store_owners::Column::PhoneNumber.eq(phone_number))
            .count(&self.db)
            .await
            .map_err(persistence)?;

        Ok(count > 0)
    }

    async fn create_owner(&self, owner: NewOwner) -> Result<OwnerProfile, PersistenceError> {
        let now = Utc::now();
        let model = store_owners::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(owner.name),
            phone_number: Set(owner.phone_number),
            password_hash: Set(owner.password_hash),
            store_id: Set(owner.store_id.map(StoreId::into_inner)),
            is_active: Set(true),
            last_login_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(persistence)?;

        Ok(to_profile(&model))
    }

    async fn record_login(
        &self,
        id: StoreOwnerId,
        at: DateTime<Utc>,
    ) -> Result<(), PersistenceError> {
        store_owners::Entity::update_many()
            .col_expr(store_owners::Column::LastLoginAt, Expr::value(at))
            .filter(store_owners::Column::Id.eq(id.into_inner()))
            .exec(&self.db)
            .await
            .map_err(persistence)?;

        Ok(())
    }

    async fn save_refresh_token(
        &self,
        owner_id: StoreOwnerId,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<RefreshTokenId, PersistenceError> {
        let model = refresh_tokens::ActiveModel {
            id: Set(Uuid::now_v7()),
            store_owner_id: Set(owner_id.into_inner()),
            token_hash: Set(token_hash.to_string()),
            expires_at: Set(expires_at),
            revoked: Set(false),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await
        .map_err(persistence)?;

        Ok(RefreshTokenId::from(model.id))
    }

    async fn active_refresh_tokens(
        &self,
        owner_id: StoreOwnerId,
        now: DateTime<Utc>,
    ) -> Result<Vec<RefreshTokenRecord>, PersistenceError> {
        let rows = refresh_tokens::Entity::find()
            .filter(refresh_tokens::Column::StoreOwnerId.eq(owner_id.into_inner()))
            .filter(refresh_tokens::Column::Revoked.eq(false))
            .filter(refresh_tokens::Column::ExpiresAt.gt(now))
            .order_by_desc(refresh_tokens::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(persistence)?;

        Ok(rows
            .into_iter()
            .map(|r| RefreshTokenRecord {
                id: RefreshTokenId::from(r.id),
                token_hash: r.token_hash,
                expires_at: r.expires_at,
            })
            .collect())
    }

    async fn save_access_token(
        &self,
        owner_id: StoreOwnerId,
        refresh_token_id: RefreshTokenId,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), PersistenceError> {
        tokens::ActiveModel {
            id: Set(Uuid::now_v7()),
            store_owner_id: Set(owner_id.into_inner()),
            refresh_token_id: Set(refresh_token_id.into_inner()),
            token_hash: Set(token_hash.to_string()),
            expires_at: Set(expires_at),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await
        .map_err(persistence)?;

        Ok(())
    }

    async fn revoke_refresh_tokens(
        &self,
        owner_id: StoreOwnerId,
    ) -> Result<u64, PersistenceError> {
        let result = refresh_tokens::Entity::update_many()
            .col_expr(refresh_tokens::Column::Revoked, Expr::value(true))
            .filter(refresh_tokens::Column::StoreOwnerId.eq(owner_id.into_inner()))
            .filter(refresh_tokens::Column::Revoked.eq(false))
            .exec(&self.db)
            .await
            .map_err(persistence)?;

        Ok(result.rows_affected)
    }
}
