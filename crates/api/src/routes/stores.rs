//! Store routes: creation, lookup, ledger summary, outstanding ranking.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;

use super::require_non_empty;
use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::AuthOwner,
};
use khata_core::ledger::{CreditEntry, RankedCustomer, StoreSummary};
use khata_db::{entities::stores, repositories::CreateStoreInput};
use khata_shared::types::StoreId;

/// Creates the store routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/stores", post(create_store))
        .route("/stores/{store_id}", get(get_store))
        .route("/stores/{store_id}/summary", get(store_summary))
        .route("/stores/{store_id}/outstanding", get(outstanding_balances))
        .route("/stores/{store_id}/credits", get(store_credits))
}

/// Request body for creating a store.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStoreRequest {
    /// Display name.
    pub name: String,
    /// Contact phone number, unique across stores.
    pub phone_number: String,
    /// Street address.
    pub address: Option<String>,
}

/// Query parameters for the outstanding-balance ranking.
#[derive(Debug, Deserialize)]
pub struct OutstandingQuery {
    /// Keep only the top N debtors.
    pub limit: Option<usize>,
}

/// POST /stores - Create a store; it becomes the caller's store if they have none.
async fn create_store(
    State(state): State<AppState>,
    owner: AuthOwner,
    Json(payload): Json<CreateStoreRequest>,
) -> ApiResult<(StatusCode, Json<stores::Model>)> {
    require_non_empty("name", &payload.name)?;
    require_non_empty("phoneNumber", &payload.phone_number)?;

    let store = state
        .stores()
        .create_for_owner(
            owner.owner_id(),
            CreateStoreInput {
                name: payload.name,
                phone_number: payload.phone_number,
                address: payload.address,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(store)))
}

/// GET /stores/{store_id}
async fn get_store(
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
) -> ApiResult<Json<stores::Model>> {
    state
        .stores()
        .find_by_id(store_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Store not found"))
}

/// GET /stores/{store_id}/summary - Totals across all of the store's rows.
async fn store_summary(
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
) -> ApiResult<Json<StoreSummary>> {
    Ok(Json(state.credit_service.store_summary(store_id).await?))
}

/// GET /stores/{store_id}/outstanding - Customers who owe money, highest first.
async fn outstanding_balances(
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
    Query(query): Query<OutstandingQuery>,
) -> ApiResult<Json<Vec<RankedCustomer>>> {
    let ranked = state
        .credit_service
        .outstanding_balances(store_id, query.limit)
        .await?;
    Ok(Json(ranked))
}

/// GET /stores/{store_id}/credits - Every row of the store, newest first.
async fn store_credits(
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
) -> ApiResult<Json<Vec<CreditEntry>>> {
    Ok(Json(state.credit_service.store_credits(store_id).await?))
}
