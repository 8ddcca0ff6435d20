//! In-memory `OwnerStore` for auth service tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use khata_shared::auth::OwnerProfile;
use khata_shared::types::{RefreshTokenId, StoreOwnerId};

use super::store::{NewOwner, OwnerCredentials, OwnerStore, RefreshTokenRecord};
use crate::persistence::{PersistenceError, PersistenceErrorKind};

pub struct StoredRefreshToken {
    pub owner_id: StoreOwnerId,
    pub record: RefreshTokenRecord,
    pub revoked: bool,
}

pub struct StoredAccessToken {
    pub owner_id: StoreOwnerId,
    pub refresh_token_id: RefreshTokenId,
    pub token_hash: String,
}

#[derive(Default)]
pub struct InMemoryOwnerStore {
    pub owners: Mutex<Vec<OwnerCredentials>>,
    pub refresh_tokens: Mutex<Vec<StoredRefreshToken>>,
    pub access_tokens: Mutex<Vec<StoredAccessToken>>,
    pub fail_token_writes: Mutex<bool>,
    /// When set, the next owner insert fails with this kind.
    pub owner_insert_failure: Mutex<Option<PersistenceErrorKind>>,
}

impl InMemoryOwnerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_active(&self, id: StoreOwnerId, active: bool) {
        let mut owners = self.owners.lock().unwrap();
        if let Some(o) = owners.iter_mut().find(|o| o.profile.id == id) {
            o.profile.is_active = active;
        }
    }

    pub fn set_password_hash(&self, id: StoreOwnerId, hash: &str) {
        let mut owners = self.owners.lock().unwrap();
        if let Some(o) = owners.iter_mut().find(|o| o.profile.id == id) {
            o.password_hash = hash.to_string();
        }
    }

    /// Pushes every stored refresh token's expiry into the past.
    pub fn expire_refresh_tokens(&self) {
        let past = Utc::now() - chrono::Duration::seconds(1);
        for t in self.refresh_tokens.lock().unwrap().iter_mut() {
            t.record.expires_at = past;
        }
    }
}

#[async_trait]
impl OwnerStore for InMemoryOwnerStore {
    async fn find_by_phone(
        &self,
        phone_number: &str,
    ) -> Result<Option<OwnerCredentials>, PersistenceError> {
        let owners = self.owners.lock().unwrap();
        Ok(owners
            .iter()
            .find(|o| o.profile.phone_number == phone_number)
            .cloned())
    }

    async fn find_by_id(
        &self,
        id: StoreOwnerId,
    ) -> Result<Option<OwnerProfile>, PersistenceError> {
        let owners = self.owners.lock().unwrap();
        Ok(owners
            .iter()
            .find(|o| o.profile.id == id)
            .map(|o| o.profile.clone()))
    }

    async fn phone_exists(&self, phone_number: &str) -> Result<bool, PersistenceError> {
        let owners = self.owners.lock().unwrap();
        Ok(owners.iter().any(|o| o.profile.phone_number == phone_number))
    }

    async fn create_owner(&self, owner: NewOwner) -> Result<OwnerProfile, PersistenceError> {
        if let Some(kind) = self.owner_insert_failure.lock().unwrap().take() {
            return Err(PersistenceError::with_kind(kind, "constraint violated"));
        }
        let profile = OwnerProfile {
            id: StoreOwnerId::new(),
            name: owner.name,
            phone_number: owner.phone_number,
            store_id: owner.store_id,
            is_active: true,
            last_login_at: None,
            created_at: Utc::now(),
        };
        self.owners.lock().unwrap().push(OwnerCredentials {
            profile: profile.clone(),
            password_hash: owner.password_hash,
        });
        Ok(profile)
    }

    async fn record_login(
        &self,
        id: StoreOwnerId,
        at: DateTime<Utc>,
    ) -> Result<(), PersistenceError> {
        let mut owners = self.owners.lock().unwrap();
        if let Some(o) = owners.iter_mut().find(|o| o.profile.id == id) {
            o.profile.last_login_at = Some(at);
        }
        Ok(())
    }

    async fn save_refresh_token(
        &self,
        owner_id: StoreOwnerId,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<RefreshTokenId, PersistenceError> {
        let id = RefreshTokenId::new();
        self.refresh_tokens.lock().unwrap().push(StoredRefreshToken {
            owner_id,
            record: RefreshTokenRecord {
                id,
                token_hash: token_hash.to_string(),
                expires_at,
            },
            revoked: false,
        });
        Ok(id)
    }

    async fn active_refresh_tokens(
        &self,
        owner_id: StoreOwnerId,
        now: DateTime<Utc>,
    ) -> Result<Vec<RefreshTokenRecord>, PersistenceError> {
        let tokens = self.refresh_tokens.lock().unwrap();
        Ok(tokens
            .iter()
            .filter(|t| t.owner_id == owner_id && !t.revoked && t.record.expires_at > now)
            .map(|t| t.record.clone())
            .collect())
    }

    async fn save_access_token(
        &self,
        owner_id: StoreOwnerId,
        refresh_token_id: RefreshTokenId,
        token_hash: &str,
        _expires_at: DateTime<Utc>,
    ) -> Result<(), PersistenceError> {
        if *self.fail_token_writes.lock().unwrap() {
            return Err(PersistenceError::new("relation \"tokens\" does not exist"));
        }
        self.access_tokens.lock().unwrap().push(StoredAccessToken {
            owner_id,
            refresh_token_id,
            token_hash: token_hash.to_string(),
        });
        Ok(())
    }

    async fn revoke_refresh_tokens(
        &self,
        owner_id: StoreOwnerId,
    ) -> Result<u64, PersistenceError> {
        let mut revoked = 0;
        for t in self.refresh_tokens.lock().unwrap().iter_mut() {
            if t.owner_id == owner_id && !t.revoked {
                t.revoked = true;
                revoked += 1;
            }
        }
        Ok(revoked)
    }
}
