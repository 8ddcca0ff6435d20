//! Core business logic for Khata.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Persistence is reached only through the repository traits defined here.
//!
//! # Modules
//!
//! - `ledger` - Credit ledger rules, aggregation, and the credit service
//! - `auth` - Password hashing, token digests, and the auth service
//! - `persistence` - Storage failure type shared by the repository traits

pub mod auth;
pub mod ledger;
pub mod persistence;

pub use persistence::PersistenceError;
