//! Store-owner authentication.
//!
//! This module provides:
//! - Password hashing with bcrypt
//! - Token digests for storage
//! - Persistence contract (`OwnerStore`)
//! - `AuthService` for register/login/refresh/logout

pub mod error;
mod password;
pub mod service;
pub mod store;
mod token;

#[cfg(test)]
mod testing;

pub use error::AuthError;
pub use password::{BCRYPT_COST, PasswordError, hash_password, verify_password};
pub use service::AuthService;
pub use store::{NewOwner, OwnerCredentials, OwnerStore, RefreshTokenRecord};
pub use token::hash_token;
