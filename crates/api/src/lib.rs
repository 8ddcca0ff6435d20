//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes for auth, stores, customers, and credits
//! - Authentication middleware (cookie or Bearer token)
//! - Session cookie attribute derivation
//! - Error rendering

pub mod cookies;
pub mod error;
pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::{
    Router,
    http::{
        HeaderValue, Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
};
use sea_orm::DatabaseConnection;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use khata_core::{auth::AuthService, ledger::CreditService};
use khata_db::{CreditRepository, CustomerRepository, StoreOwnerRepository, StoreRepository};
use khata_shared::{JwtService, config::CorsConfig};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service, used for cookie lifetimes.
    pub jwt_service: Arc<JwtService>,
    /// Ledger rules over the credit repository.
    pub credit_service: CreditService<CreditRepository>,
    /// Register, login, refresh, logout.
    pub auth_service: AuthService<StoreOwnerRepository>,
}

impl AppState {
    /// Wires the services over one connection pool.
    #[must_use]
    pub fn new(db: DatabaseConnection, jwt_service: Arc<JwtService>) -> Self {
        let credit_service = CreditService::new(Arc::new(CreditRepository::new(db.clone())));
        let auth_service = AuthService::new(
            Arc::new(StoreOwnerRepository::new(db.clone())),
            Arc::clone(&jwt_service),
        );

        Self {
            db: Arc::new(db),
            jwt_service,
            credit_service,
            auth_service,
        }
    }

    /// Customer repository over the shared pool.
    #[must_use]
    pub fn customers(&self) -> CustomerRepository {
        CustomerRepository::new((*self.db).clone())
    }

    /// Store repository over the shared pool.
    #[must_use]
    pub fn stores(&self) -> StoreRepository {
        StoreRepository::new((*self.db).clone())
    }

    /// Credit repository over the shared pool, for cached balance reads.
    #[must_use]
    pub fn credits(&self) -> CreditRepository {
        CreditRepository::new((*self.db).clone())
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState, cors: &CorsConfig) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors))
        .with_state(state)
}

/// Credentialed CORS. Cookies only flow cross-origin when the origin is
/// echoed back explicitly, so an empty allow-list mirrors the request origin.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::mirror_request()
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
}
