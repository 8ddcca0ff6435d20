//! Shared types, errors, and configuration for Khata.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Application-wide error types
//! - JWT claims, token service, and auth payloads
//! - Configuration management

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;


pub use auth::{Claims, OwnerProfile, TokenSubject};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use jwt::{IssuedToken, JwtConfig, JwtError, JwtService};
