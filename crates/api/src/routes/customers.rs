//! Customer management routes, plus each customer's ledger views.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use super::{double_option, require_non_empty};
use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::AuthOwner,
};
use khata_core::ledger::{CreditEntry, CustomerSummary};
use khata_db::{
    entities::{customer_balances, customers},
    repositories::{CreateCustomerInput, UpdateCustomerInput},
};
use khata_shared::types::{CustomerId, StoreId};

/// Creates the customer routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/customers", get(list_customers).post(create_customer))
        .route(
            "/customers/{customer_id}",
            get(get_customer)
                .patch(update_customer)
                .delete(delete_customer),
        )
        .route("/customers/{customer_id}/summary", get(customer_summary))
        .route("/customers/{customer_id}/balance", get(customer_balance))
        .route("/customers/{customer_id}/credits", get(customer_credits))
}

/// Request body for creating a customer.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerRequest {
    /// Owning store; defaults to the caller's store.
    pub store_id: Option<StoreId>,
    /// Display name.
    pub name: String,
    /// Phone number, unique within the store.
    pub phone_number: String,
    /// Email address.
    pub email: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// Citizen ID number.
    pub cid_number: Option<String>,
    /// Maximum outstanding balance.
    pub credit_limit: Option<Decimal>,
}

/// Request body for updating a customer. `null` clears a nullable field.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerRequest {
    /// New name.
    pub name: Option<String>,
    /// New phone number.
    pub phone_number: Option<String>,
    /// New or cleared email.
    #[serde(default, deserialize_with = "double_option")]
    pub email: Option<Option<String>>,
    /// New or cleared address.
    #[serde(default, deserialize_with = "double_option")]
    pub address: Option<Option<String>>,
    /// New or cleared citizen ID number.
    #[serde(default, deserialize_with = "double_option")]
    pub cid_number: Option<Option<String>>,
    /// New or cleared credit limit.
    #[serde(default, deserialize_with = "double_option")]
    pub credit_limit: Option<Option<Decimal>>,
    /// Activate or deactivate.
    pub is_active: Option<bool>,
}

impl From<UpdateCustomerRequest> for UpdateCustomerInput {
    fn from(req: UpdateCustomerRequest) -> Self {
        Self {
            name: req.name,
            phone_number: req.phone_number,
            email: req.email,
            address: req.address,
            cid_number: req.cid_number,
            credit_limit: req.credit_limit,
            is_active: req.is_active,
        }
    }
}

/// Query parameters for listing customers.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCustomersQuery {
    /// Store to list; defaults to the caller's store.
    pub store_id: Option<StoreId>,
    /// Only active customers.
    #[serde(default)]
    pub active_only: bool,
}

/// Optional store scope for per-customer ledger views.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreScopeQuery {
    /// Limit to rows recorded by this store.
    pub store_id: Option<StoreId>,
}

/// Resolves the store a request is about: explicit, else the caller's own.
fn resolve_store(explicit: Option<StoreId>, owner: &AuthOwner) -> Result<StoreId, ApiError> {
    explicit
        .or(owner.claims().store_id)
        .ok_or_else(|| ApiError::validation("storeId is required"))
}

/// POST /customers
async fn create_customer(
    State(state): State<AppState>,
    owner: AuthOwner,
    Json(payload): Json<CreateCustomerRequest>,
) -> ApiResult<(StatusCode, Json<customers::Model>)> {
    require_non_empty("name", &payload.name)?;
    require_non_empty("phoneNumber", &payload.phone_number)?;
    let store_id = resolve_store(payload.store_id, &owner)?;

    let customer = state
        .customers()
        .create(CreateCustomerInput {
            store_id,
            name: payload.name,
            phone_number: payload.phone_number,
            email: payload.email,
            address: payload.address,
            cid_number: payload.cid_number,
            credit_limit: payload.credit_limit,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(customer)))
}

/// GET /customers?storeId=&activeOnly=
async fn list_customers(
    State(state): State<AppState>,
    owner: AuthOwner,
    Query(query): Query<ListCustomersQuery>,
) -> ApiResult<Json<Vec<customers::Model>>> {
    let store_id = resolve_store(query.store_id, &owner)?;
    let customers = state
        .customers()
        .list_by_store(store_id, query.active_only)
        .await?;
    Ok(Json(customers))
}

/// GET /customers/{customer_id}
async fn get_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<CustomerId>,
) -> ApiResult<Json<customers::Model>> {
    state
        .customers()
        .find_by_id(customer_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Customer not found"))
}

/// PATCH /customers/{customer_id}
async fn update_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<CustomerId>,
    Json(payload): Json<UpdateCustomerRequest>,
) -> ApiResult<Json<customers::Model>> {
    if let Some(name) = &payload.name {
        require_non_empty("name", name)?;
    }
    if let Some(phone) = &payload.phone_number {
        require_non_empty("phoneNumber", phone)?;
    }

    let customer = state
        .customers()
        .update(customer_id, payload.into())
        .await?;
    Ok(Json(customer))
}

/// DELETE /customers/{customer_id} - Removes the customer and its ledger rows.
async fn delete_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<CustomerId>,
) -> ApiResult<StatusCode> {
    state.customers().delete(customer_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /customers/{customer_id}/summary?storeId=
async fn customer_summary(
    State(state): State<AppState>,
    Path(customer_id): Path<CustomerId>,
    Query(query): Query<StoreScopeQuery>,
) -> ApiResult<Json<CustomerSummary>> {
    let summary = state
        .credit_service
        .customer_summary(customer_id, query.store_id)
        .await?;
    Ok(Json(summary))
}

/// GET /customers/{customer_id}/balance - Cached balance rows, one per store.
async fn customer_balance(
    State(state): State<AppState>,
    Path(customer_id): Path<CustomerId>,
) -> ApiResult<Json<Vec<customer_balances::Model>>> {
    if state.customers().find_by_id(customer_id).await?.is_none() {
        return Err(ApiError::not_found("Customer not found"));
    }
    Ok(Json(state.credits().cached_balances(customer_id).await?))
}

/// GET /customers/{customer_id}/credits?storeId=
async fn customer_credits(
    State(state): State<AppState>,
    Path(customer_id): Path<CustomerId>,
    Query(query): Query<StoreScopeQuery>,
) -> ApiResult<Json<Vec<CreditEntry>>> {
    let credits = state
        .credit_service
        .customer_credits(customer_id, query.store_id)
        .await?;
    Ok(Json(credits))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_update_distinguishes_null_from_absent() {
        let req: UpdateCustomerRequest =
            serde_json::from_str(r#"{"creditLimit": null, "email": "a@b.test"}"#).unwrap();
        assert_eq!(req.credit_limit, Some(None));
        assert_eq!(req.email, Some(Some("a@b.test".to_string())));
        assert_eq!(req.address, None);
        assert_eq!(req.name, None);
    }

    #[test]
    fn test_update_accepts_numeric_limit() {
        let req: UpdateCustomerRequest =
            serde_json::from_str(r#"{"creditLimit": 500, "isActive": false}"#).unwrap();
        assert_eq!(req.credit_limit, Some(Some(dec!(500))));
        assert_eq!(req.is_active, Some(false));
    }
}
