//! Ledger routes: record, list, edit, and delete credit transactions.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use super::double_option;
use crate::{AppState, error::ApiResult, middleware::AuthOwner};
use khata_core::ledger::{
    CreateCreditInput, CreditChanges, CreditDetails, CreditEntry, CreditFilter, TransactionType,
};
use khata_shared::types::{CreditId, CustomerId, StoreId};

const DEFAULT_RECENT_LIMIT: u64 = 10;

/// Creates the credit routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/credits", get(list_credits).post(create_credit))
        .route("/credits/recent", get(recent_credits))
        .route("/credits/range", get(credits_between))
        .route(
            "/credits/{credit_id}",
            get(get_credit).patch(update_credit).delete(delete_credit),
        )
}

/// Request body for recording a transaction.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCreditRequest {
    /// Customer to charge or credit.
    pub customer_id: CustomerId,
    /// Store recording the transaction.
    pub store_id: StoreId,
    /// Positive amount.
    pub amount: Decimal,
    /// `credit_given` or `payment_received`.
    pub transaction_type: TransactionType,
    /// What was bought on credit.
    pub items_description: Option<String>,
    /// Bank journal reference, required for payments.
    pub journal_number: Option<String>,
    /// Business date; defaults to now.
    pub transaction_date: Option<DateTime<Utc>>,
}

/// Request body for editing a transaction. `null` clears a text field.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCreditRequest {
    /// New amount.
    pub amount: Option<Decimal>,
    /// New transaction type.
    pub transaction_type: Option<TransactionType>,
    /// New or cleared items description.
    #[serde(default, deserialize_with = "double_option")]
    pub items_description: Option<Option<String>>,
    /// New or cleared journal number.
    #[serde(default, deserialize_with = "double_option")]
    pub journal_number: Option<Option<String>>,
    /// New business date.
    pub transaction_date: Option<DateTime<Utc>>,
}

impl From<UpdateCreditRequest> for CreditChanges {
    fn from(req: UpdateCreditRequest) -> Self {
        Self {
            amount: req.amount,
            transaction_type: req.transaction_type,
            items_description: req.items_description,
            journal_number: req.journal_number,
            transaction_date: req.transaction_date,
        }
    }
}

/// Query parameters for the recent listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentQuery {
    /// Number of rows, 1 to 100. Defaults to 10.
    pub limit: Option<u64>,
    /// Limit to one store.
    pub store_id: Option<StoreId>,
}

/// Query parameters for the date-range listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeQuery {
    /// Inclusive start.
    pub start_date: DateTime<Utc>,
    /// Inclusive end.
    pub end_date: DateTime<Utc>,
    /// Limit to one store.
    pub store_id: Option<StoreId>,
}

/// POST /credits - Record a transaction on behalf of the caller.
async fn create_credit(
    State(state): State<AppState>,
    owner: AuthOwner,
    Json(payload): Json<CreateCreditRequest>,
) -> ApiResult<(StatusCode, Json<CreditEntry>)> {
    let credit = state
        .credit_service
        .create_credit(CreateCreditInput {
            customer_id: payload.customer_id,
            store_id: payload.store_id,
            amount: payload.amount,
            transaction_type: payload.transaction_type,
            items_description: payload.items_description,
            journal_number: payload.journal_number,
            transaction_date: payload.transaction_date,
            created_by_owner_id: Some(owner.owner_id()),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(credit)))
}

/// GET /credits?customerId=&storeId=&transactionType=&startDate=&endDate=&minAmount=&maxAmount=
async fn list_credits(
    State(state): State<AppState>,
    Query(filter): Query<CreditFilter>,
) -> ApiResult<Json<Vec<CreditEntry>>> {
    Ok(Json(state.credit_service.filter_credits(&filter).await?))
}

/// GET /credits/recent?limit=&storeId=
async fn recent_credits(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> ApiResult<Json<Vec<CreditDetails>>> {
    let credits = state
        .credit_service
        .recent_credits(query.limit.unwrap_or(DEFAULT_RECENT_LIMIT), query.store_id)
        .await?;
    Ok(Json(credits))
}

/// GET /credits/range?startDate=&endDate=&storeId=
async fn credits_between(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> ApiResult<Json<Vec<CreditDetails>>> {
    let credits = state
        .credit_service
        .credits_between(query.start_date, query.end_date, query.store_id)
        .await?;
    Ok(Json(credits))
}

/// GET /credits/{credit_id}
async fn get_credit(
    State(state): State<AppState>,
    Path(credit_id): Path<CreditId>,
) -> ApiResult<Json<CreditEntry>> {
    Ok(Json(state.credit_service.get_credit(credit_id).await?))
}

/// PATCH /credits/{credit_id}
async fn update_credit(
    State(state): State<AppState>,
    Path(credit_id): Path<CreditId>,
    Json(payload): Json<UpdateCreditRequest>,
) -> ApiResult<Json<CreditEntry>> {
    let credit = state
        .credit_service
        .update_credit(credit_id, payload.into())
        .await?;
    Ok(Json(credit))
}

/// DELETE /credits/{credit_id}
async fn delete_credit(
    State(state): State<AppState>,
    Path(credit_id): Path<CreditId>,
) -> ApiResult<StatusCode> {
    state.credit_service.delete_credit(credit_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
