//! Persistence contract for store owners and their sessions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use khata_shared::auth::OwnerProfile;
use khata_shared::types::{RefreshTokenId, StoreId, StoreOwnerId};

use crate::persistence::PersistenceError;

/// An owner profile together with the stored password hash.
#[derive(Debug, Clone)]
pub struct OwnerCredentials {
    /// Public profile.
    pub profile: OwnerProfile,
    /// bcrypt password hash.
    pub password_hash: String,
}

/// Fields for a new owner row.
#[derive(Debug, Clone)]
pub struct NewOwner {
    /// Display name.
    pub name: String,
    /// Login phone number.
    pub phone_number: String,
    /// bcrypt password hash.
    pub password_hash: String,
    /// Existing store to attach to.
    pub store_id: Option<StoreId>,
}

/// A refresh token record, as the auth service sees it.
#[derive(Debug, Clone)]
pub struct RefreshTokenRecord {
    /// Record ID.
    pub id: RefreshTokenId,
    /// Digest of the issued token.
    pub token_hash: String,
    /// Expiry of the issued token.
    pub expires_at: DateTime<Utc>,
}

/// Storage operations the auth service depends on.
#[async_trait]
pub trait OwnerStore: Send + Sync {
    /// Finds an owner and their password hash by phone number.
    async fn find_by_phone(
        &self,
        phone_number: &str,
    ) -> Result<Option<OwnerCredentials>, PersistenceError>;

    /// Finds an owner by ID.
    async fn find_by_id(&self, id: StoreOwnerId)
    -> Result<Option<OwnerProfile>, PersistenceError>;

    /// Returns true if the phone number is already registered.
    async fn phone_exists(&self, phone_number: &str) -> Result<bool, PersistenceError>;

    /// Persists a new owner.
    async fn create_owner(&self, owner: NewOwner) -> Result<OwnerProfile, PersistenceError>;

    /// Stamps the owner's last login time.
    async fn record_login(
        &self,
        id: StoreOwnerId,
        at: DateTime<Utc>,
    ) -> Result<(), PersistenceError>;

    /// Stores the digest of a newly issued refresh token.
    async fn save_refresh_token(
        &self,
        owner_id: StoreOwnerId,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<RefreshTokenId, PersistenceError>;

    /// Refresh tokens of the owner that are not revoked and expire after `now`.
    async fn active_refresh_tokens(
        &self,
        owner_id: StoreOwnerId,
        now: DateTime<Utc>,
    ) -> Result<Vec<RefreshTokenRecord>, PersistenceError>;

    /// Stores the digest of an access token linked to its refresh token.
    async fn save_access_token(
        &self,
        owner_id: StoreOwnerId,
        refresh_token_id: RefreshTokenId,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), PersistenceError>;

    /// Revokes every refresh token of the owner. Returns how many were revoked.
    async fn revoke_refresh_tokens(&self, owner_id: StoreOwnerId)
    -> Result<u64, PersistenceError>;
}
