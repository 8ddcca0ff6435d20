//! Request middleware.

pub mod auth;

pub use auth::{AuthOwner, auth_middleware};
