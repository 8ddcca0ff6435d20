//! Authentication routes: register, login, refresh, logout, current owner.

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::{Value, json};

use super::require_non_empty;
use crate::{
    AppState,
    cookies::{ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE, SessionContext},
    error::{ApiError, ApiResult},
    middleware::AuthOwner,
};
use khata_shared::auth::{
    LoginRequest, LoginResponse, OwnerProfile, RefreshRequest, RefreshResponse, RegisterRequest,
};

/// Public auth routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

/// Auth routes that need an access token.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
}

/// POST /auth/register - Create a store owner account.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<OwnerProfile>)> {
    require_non_empty("name", &payload.name)?;
    require_non_empty("phoneNumber", &payload.phone_number)?;
    require_non_empty("password", &payload.password)?;

    let profile = state.auth_service.register(payload).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// POST /auth/login - Authenticate and set both session cookies.
async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<(CookieJar, Json<LoginResponse>)> {
    require_non_empty("phoneNumber", &payload.phone_number)?;
    require_non_empty("password", &payload.password)?;

    let response = state.auth_service.login(payload).await?;

    let jar = SessionContext::from_headers(&headers).with_session(
        jar,
        (
            response.access_token.clone(),
            state.jwt_service.access_token_ttl(),
        ),
        (
            response.refresh_token.clone(),
            state.jwt_service.refresh_token_ttl(),
        ),
    );
    Ok((jar, Json(response)))
}

/// POST /auth/refresh - Mint a new access token.
///
/// The refresh token comes from the JSON body when present, otherwise from
/// the `refreshToken` cookie.
async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    body: Bytes,
) -> ApiResult<(CookieJar, Json<RefreshResponse>)> {
    let request = if body.is_empty() {
        RefreshRequest::default()
    } else {
        serde_json::from_slice::<RefreshRequest>(&body)
            .map_err(|e| ApiError::validation(format!("Invalid request body: {e}")))?
    };

    let token = request
        .refresh_token
        .filter(|t| !t.is_empty())
        .or_else(|| {
            jar.get(REFRESH_TOKEN_COOKIE)
                .map(|c| c.value().to_string())
                .filter(|t| !t.is_empty())
        })
        .ok_or_else(|| ApiError::unauthorized("Refresh token required"))?;

    let response = state.auth_service.refresh(&token).await?;

    let cookie = SessionContext::from_headers(&headers).token_cookie(
        ACCESS_TOKEN_COOKIE,
        response.access_token.clone(),
        state.jwt_service.access_token_ttl(),
    );
    Ok((jar.add(cookie), Json(response)))
}

/// POST /auth/logout - Revoke every refresh token of the owner and clear cookies.
async fn logout(
    State(state): State<AppState>,
    owner: AuthOwner,
    headers: HeaderMap,
    jar: CookieJar,
) -> ApiResult<(CookieJar, Json<Value>)> {
    state.auth_service.logout(owner.owner_id()).await?;

    let jar = SessionContext::from_headers(&headers).without_session(jar);
    Ok((jar, Json(json!({ "message": "Logged out successfully" }))))
}

/// GET /auth/me - Current owner profile.
async fn me(State(state): State<AppState>, owner: AuthOwner) -> ApiResult<Json<OwnerProfile>> {
    let profile = state.auth_service.profile(owner.owner_id()).await?;
    Ok(Json(profile))
}
