//! Password hashing with bcrypt.

use thiserror::Error;

/// Work factor for new hashes.
pub const BCRYPT_COST: u32 = 10;

/// Errors that can occur during password operations.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// Failed to hash password.
    #[error("failed to hash password: {0}")]
    HashError(String),

    /// Stored hash is not a valid bcrypt string.
    #[error("invalid password hash format: {0}")]
    InvalidHash(String),
}

/// Hashes a password or PIN at [`BCRYPT_COST`].
///
/// # Example
///
/// ```
/// use khata_core::auth::hash_password;
///
/// let hash = hash_password("4821").unwrap();
/// assert!(hash.starts_with("$2b$10$"));
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    bcrypt::hash(password, BCRYPT_COST).map_err(|e| PasswordError::HashError(e.to_string()))
}

/// Checks a password against a stored `$2a$`, `$2b$`, `$2x$` or `$2y$` hash.
///
/// Returns `Ok(false)` on a mismatch; errors are reserved for malformed hashes.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    bcrypt::verify(password, hash).map_err(|e| PasswordError::InvalidHash(e.to_string()))
}
