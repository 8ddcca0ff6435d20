//! Authentication types for JWT and tokens.
//!
//! Auth payloads use camelCase on the wire (`phoneNumber`, `storeId`) to stay
//! compatible with existing clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{StoreId, StoreOwnerId};

/// JWT claims shared by access and refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// Store owner ID.
    pub id: StoreOwnerId,
    /// Owner's phone number (login identifier).
    pub phone_number: String,
    /// Owner's display name.
    pub name: String,
    /// Store the owner manages, if one has been created.
    pub store_id: Option<StoreId>,
    /// Unique token ID, so two tokens minted in the same second differ.
    pub jti: Uuid,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a store owner.
    #[must_use]
    pub fn new(subject: &TokenSubject, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            id: subject.id,
            phone_number: subject.phone_number.clone(),
            name: subject.name.clone(),
            store_id: subject.store_id,
            jti: Uuid::new_v4(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the store owner ID from claims.
    #[must_use]
    pub const fn owner_id(&self) -> StoreOwnerId {
        self.id
    }
}

/// The identity a token is minted for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSubject {
    /// Store owner ID.
    pub id: StoreOwnerId,
    /// Owner's phone number.
    pub phone_number: String,
    /// Owner's display name.
    pub name: String,
    /// Owner's store, if any.
    pub store_id: Option<StoreId>,
}

impl From<&OwnerProfile> for TokenSubject {
    fn from(profile: &OwnerProfile) -> Self {
        Self {
            id: profile.id,
            phone_number: profile.phone_number.clone(),
            name: profile.name.clone(),
            store_id: profile.store_id,
        }
    }
}

/// Public store-owner profile. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerProfile {
    /// Store owner ID.
    pub id: StoreOwnerId,
    /// Display name.
    pub name: String,
    /// Login phone number.
    pub phone_number: String,
    /// Store the owner manages.
    pub store_id: Option<StoreId>,
    /// Whether the account is active.
    pub is_active: bool,
    /// Last successful login.
    pub last_login_at: Option<DateTime<Utc>>,
    /// Account creation time.
    pub created_at: DateTime<Utc>,
}

/// Registration request payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Owner's display name.
    pub name: String,
    /// Login phone number.
    pub phone_number: String,
    /// Password or PIN.
    pub password: String,
    /// Existing store to attach to.
    #[serde(default)]
    pub store_id: Option<StoreId>,
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Login phone number.
    pub phone_number: String,
    /// Password or PIN.
    pub password: String,
}

/// Refresh token request, for clients that cannot use cookies.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    /// The refresh token; falls back to the `refreshToken` cookie when absent.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Login response payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Authenticated owner.
    pub user: OwnerProfile,
    /// Access token.
    pub access_token: String,
    /// Refresh token.
    pub refresh_token: String,
}

/// Refresh response payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    /// Owner the new token belongs to.
    pub user: OwnerProfile,
    /// Newly minted access token.
    pub access_token: String,
}
