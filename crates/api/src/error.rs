//! Error rendering for handlers.
//!
//! Every handler returns `Result<_, ApiError>`; the body is always
//! `{"error": <code>, "message": <text>}`. Server-side failures are logged and
//! reach the client only as a generic message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde_json::json;
use tracing::error;

use khata_core::{auth::AuthError, ledger::LedgerError};
use khata_db::repositories::{CustomerError, StoreError};
use khata_shared::AppError;

/// Handler error wrapping the application taxonomy.
#[derive(Debug)]
pub struct ApiError(pub AppError);

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// 401 with the given message.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self(AppError::Unauthorized(message.into()))
    }

    /// 404 with the given message.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self(AppError::NotFound(message.into()))
    }

    /// 400 with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self(AppError::Validation(message.into()))
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        Self(err.into())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self(err.into())
    }
}

impl From<CustomerError> for ApiError {
    fn from(err: CustomerError) -> Self {
        Self(match err {
            CustomerError::NotFound | CustomerError::StoreNotFound => {
                AppError::NotFound(err.to_string())
            }
            CustomerError::PhoneTaken => AppError::Conflict(err.to_string()),
            CustomerError::NegativeCreditLimit => AppError::Validation(err.to_string()),
            CustomerError::Database(e) => AppError::Database(e.to_string()),
        })
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self(match err {
            StoreError::PhoneTaken => AppError::Conflict(err.to_string()),
            StoreError::Database(e) => AppError::Database(e.to_string()),
        })
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        Self(AppError::Database(err.to_string()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if self.0.is_internal() {
            error!(error = %self.0, "Request failed");
        }

        (
            status,
            Json(json!({
                "error": self.0.error_code(),
                "message": self.0.public_message(),
            })),
        )
            .into_response()
    }
}
