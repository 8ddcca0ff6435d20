//! JWT token generation and validation.
//!
//! Access and refresh tokens carry the same claims but are signed with
//! separate secrets, so one kind can never be replayed as the other.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use crate::auth::{Claims, TokenSubject};

/// JWT configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for signing access tokens.
    pub access_secret: String,
    /// Secret key for signing refresh tokens.
    pub refresh_secret: String,
    /// Access token lifetime.
    pub access_token_ttl: Duration,
    /// Refresh token lifetime.
    pub refresh_token_ttl: Duration,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            access_secret: "change-me-access".to_string(),
            refresh_secret: "change-me-refresh".to_string(),
            access_token_ttl: Duration::minutes(15),
            refresh_token_ttl: Duration::days(180),
        }
    }
}

/// Errors that can occur during JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    /// Token encoding failed.
    #[error("failed to encode token: {0}")]
    EncodingError(String),

    /// Token decoding failed.
    #[error("failed to decode token: {0}")]
    DecodingError(String),

    /// Token has expired.
    #[error("token has expired")]
    Expired,
}

/// A signed token together with its expiry.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// The encoded JWT.
    pub token: String,
    /// When the token stops being accepted.
    pub expires_at: DateTime<Utc>,
}

struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl KeyPair {
    fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// JWT service for token operations.
pub struct JwtService {
    access_ttl: Duration,
    refresh_ttl: Duration,
    access_keys: KeyPair,
    refresh_keys: KeyPair,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("access_keys", &"[hidden]")
            .field("refresh_keys", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    /// Creates a new JWT service with the given configuration.
    #[must_use]
    pub fn new(config: JwtConfig) -> Self {
        Self {
            access_ttl: config.access_token_ttl,
            refresh_ttl: config.refresh_token_ttl,
            access_keys: KeyPair::from_secret(&config.access_secret),
            refresh_keys: KeyPair::from_secret(&config.refresh_secret),
        }
    }

    /// Generates an access token for a store owner.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if token generation fails.
    pub fn generate_access_token(&self, subject: &TokenSubject) -> Result<IssuedToken, JwtError> {
        Self::issue(subject, self.access_ttl, &self.access_keys)
    }

    /// Generates a refresh token for a store owner.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if token generation fails.
    pub fn generate_refresh_token(&self, subject: &TokenSubject) -> Result<IssuedToken, JwtError> {
        Self::issue(subject, self.refresh_ttl, &self.refresh_keys)
    }

    /// Validates and decodes an access token.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Expired` if the token has expired, or
    /// `JwtError::DecodingError` if it is malformed or signed with another key.
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, JwtError> {
        Self::validate(token, &self.access_keys)
    }

    /// Validates and decodes a refresh token.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Expired` if the token has expired, or
    /// `JwtError::DecodingError` if it is malformed or signed with another key.
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, JwtError> {
        Self::validate(token, &self.refresh_keys)
    }

    /// Returns the access token lifetime.
    #[must_use]
    pub const fn access_token_ttl(&self) -> Duration {
        self.access_ttl
    }

    /// Returns the refresh token lifetime.
    #[must_use]
    pub const fn refresh_token_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    fn issue(
        subject: &TokenSubject,
        ttl: Duration,
        keys: &KeyPair,
    ) -> Result<IssuedToken, JwtError> {
        let expires_at = Utc::now() + ttl;
        let claims = Claims::new(subject, expires_at);

        let token = encode(&Header::default(), &claims, &keys.encoding)
            .map_err(|e| JwtError::EncodingError(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }

    fn validate(token: &str, keys: &KeyPair) -> Result<Claims, JwtError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        decode::<Claims>(token, &keys.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::DecodingError(e.to_string()),
            })
    }
}
