//! Authentication service: registration, login, refresh, logout.

use std::sync::Arc;

use chrono::Utc;
use khata_shared::auth::{
    Claims, LoginRequest, LoginResponse, OwnerProfile, RefreshResponse, RegisterRequest,
    TokenSubject,
};
use khata_shared::types::StoreOwnerId;
use khata_shared::{JwtError, JwtService};
use tracing::{error, info, warn};

use super::error::AuthError;
use super::password::{PasswordError, hash_password, verify_password};
use super::store::{NewOwner, OwnerStore};
use super::token::hash_token;
use crate::persistence::{PersistenceError, PersistenceErrorKind};

/// Issues and validates store-owner sessions.
#[derive(Debug)]
pub struct AuthService<S> {
    store: Arc<S>,
    jwt: Arc<JwtService>,
}

impl<S> Clone for AuthService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            jwt: Arc::clone(&self.jwt),
        }
    }
}

fn issue_error(e: JwtError) -> AuthError {
    AuthError::TokenIssue(e.to_string())
}

/// Classifies a failed owner insert; a lost race on the phone index is a conflict.
fn register_error(e: PersistenceError) -> AuthError {
    match e.kind() {
        PersistenceErrorKind::UniqueViolation => AuthError::PhoneTaken,
        PersistenceErrorKind::ForeignKeyViolation => AuthError::StoreNotFound,
        PersistenceErrorKind::Other => AuthError::Persistence(e),
    }
}

impl<S: OwnerStore> AuthService<S> {
    /// Creates a new auth service.
    #[must_use]
    pub const fn new(store: Arc<S>, jwt: Arc<JwtService>) -> Self {
        Self { store, jwt }
    }

    /// Registers a new store owner.
    pub async fn register(&self, request: RegisterRequest) -> Result<OwnerProfile, AuthError> {
        if self.store.phone_exists(&request.phone_number).await? {
            return Err(AuthError::PhoneTaken);
        }

        let password_hash = hash_password(&request.password)?;
        let profile = self
            .store
            .create_owner(NewOwner {
                name: request.name,
                phone_number: request.phone_number,
                password_hash,
                store_id: request.store_id,
            })
            .await
            .map_err(register_error)?;

        info!(owner_id = %profile.id, "Store owner registered");
        Ok(profile)
    }

    /// Authenticates by phone number and password and opens a session.
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AuthError> {
        let Some(credentials) = self.store.find_by_phone(&request.phone_number).await? else {
            warn!("Login attempt for unknown phone number");
            return Err(AuthError::InvalidCredentials);
        };

        let matches = match verify_password(&request.password, &credentials.password_hash) {
            Ok(matches) => matches,
            Err(e @ PasswordError::InvalidHash(_)) => {
                error!(
                    owner_id = %credentials.profile.id,
                    error = %e,
                    "Stored password hash is unreadable"
                );
                false
            }
            Err(e) => return Err(e.into()),
        };
        if !matches {
            warn!(owner_id = %credentials.profile.id, "Login attempt with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let mut user = credentials.profile;
        if !user.is_active {
            return Err(AuthError::Inactive);
        }

        let now = Utc::now();
        self.store.record_login(user.id, now).await?;
        user.last_login_at = Some(now);

        let subject = TokenSubject::from(&user);
        let access = self.jwt.generate_access_token(&subject).map_err(issue_error)?;
        let refresh = self
            .jwt
            .generate_refresh_token(&subject)
            .map_err(issue_error)?;

        let refresh_token_id = self
            .store
            .save_refresh_token(user.id, &hash_token(&refresh.token), refresh.expires_at)
            .await?;
        self.store
            .save_access_token(
                user.id,
                refresh_token_id,
                &hash_token(&access.token),
                access.expires_at,
            )
            .await?;

        info!(owner_id = %user.id, "Store owner logged in");
        Ok(LoginResponse {
            user,
            access_token: access.token,
            refresh_token: refresh.token,
        })
    }

    /// Mints a new access token from a live refresh token.
    ///
    /// Domain failures pass through unchanged; anything unexpected is logged
    /// and reported as [`AuthError::RefreshFailed`].
    pub async fn refresh(&self, refresh_token: &str) -> Result<RefreshResponse, AuthError> {
        match self.try_refresh(refresh_token).await {
            Ok(response) => Ok(response),
            Err(e @ (AuthError::TokenRevoked | AuthError::Inactive | AuthError::RefreshFailed)) => {
                Err(e)
            }
            Err(e) => {
                error!(error = %e, "Refresh failed unexpectedly");
                Err(AuthError::RefreshFailed)
            }
        }
    }

    async fn try_refresh(&self, refresh_token: &str) -> Result<RefreshResponse, AuthError> {
        let claims = self
            .jwt
            .validate_refresh_token(refresh_token)
            .map_err(|e| {
                warn!(error = %e, "Refresh token failed verification");
                AuthError::RefreshFailed
            })?;
        let owner_id = claims.owner_id();

        let presented = hash_token(refresh_token);
        let record = self
            .store
            .active_refresh_tokens(owner_id, Utc::now())
            .await?
            .into_iter()
            .find(|r| r.token_hash == presented)
            .ok_or(AuthError::TokenRevoked)?;

        let user = self
            .store
            .find_by_id(owner_id)
            .await?
            .filter(|u| u.is_active)
            .ok_or(AuthError::Inactive)?;

        let access = self
            .jwt
            .generate_access_token(&TokenSubject::from(&user))
            .map_err(issue_error)?;
        self.store
            .save_access_token(
                user.id,
                record.id,
                &hash_token(&access.token),
                access.expires_at,
            )
            .await?;

        Ok(RefreshResponse {
            user,
            access_token: access.token,
        })
    }

    /// Revokes every refresh token of the owner.
    pub async fn logout(&self, owner_id: StoreOwnerId) -> Result<(), AuthError> {
        let revoked = self.store.revoke_refresh_tokens(owner_id).await?;
        info!(owner_id = %owner_id, revoked, "Store owner logged out");
        Ok(())
    }

    /// Decodes an access token, or `None` if it is invalid or expired.
    #[must_use]
    pub fn verify_access_token(&self, token: &str) -> Option<Claims> {
        self.jwt.validate_access_token(token).ok()
    }

    /// Returns the owner's current profile.
    pub async fn profile(&self, owner_id: StoreOwnerId) -> Result<OwnerProfile, AuthError> {
        self.store
            .find_by_id(owner_id)
            .await?
            .ok_or(AuthError::Inactive)
    }
}
