//! Authentication errors.

use thiserror::Error;

use khata_shared::AppError;

use super::password::PasswordError;
use crate::persistence::PersistenceError;

/// Errors that can occur during authentication.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown phone number or wrong password. Deliberately indistinguishable.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Phone number already belongs to an owner.
    #[error("Phone number already registered")]
    PhoneTaken,

    /// Refresh token is revoked, expired in storage, or unknown.
    #[error("Token revoked or invalid")]
    TokenRevoked,

    /// Store named at registration does not exist.
    #[error("Store not found")]
    StoreNotFound,

    /// Owner is missing or deactivated.
    #[error("User inactive")]
    Inactive,

    /// Refresh JWT failed verification, or the flow failed unexpectedly.
    #[error("Invalid refresh token")]
    RefreshFailed,

    /// Token could not be minted.
    #[error("failed to issue token: {0}")]
    TokenIssue(String),

    /// Password hashing failed.
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Storage failure.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials
            | AuthError::TokenRevoked
            | AuthError::Inactive
            | AuthError::RefreshFailed => Self::Unauthorized(err.to_string()),
            AuthError::PhoneTaken => Self::Conflict(err.to_string()),
            AuthError::StoreNotFound => Self::NotFound(err.to_string()),
            AuthError::TokenIssue(_) | AuthError::Password(_) => Self::Internal(err.to_string()),
            AuthError::Persistence(e) => Self::Database(e.message().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_to_app_error() {
        assert_eq!(
            AppError::from(AuthError::InvalidCredentials).status_code(),
            401
        );
        assert_eq!(AppError::from(AuthError::PhoneTaken).status_code(), 409);
        assert_eq!(AppError::from(AuthError::Inactive).status_code(), 401);
        assert_eq!(AppError::from(AuthError::StoreNotFound).status_code(), 404);
        assert_eq!(
            AppError::from(AuthError::Persistence(PersistenceError::new("boom"))).status_code(),
            500
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            AppError::from(AuthError::TokenRevoked).public_message(),
            "Token revoked or invalid"
        );
    }
}
