//! Authentication middleware for protected routes.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::{AppState, cookies::ACCESS_TOKEN_COOKIE, error::ApiError};
use khata_shared::{Claims, types::StoreOwnerId};

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

/// Returns the access token of a request: the `accessToken` cookie first,
/// then a Bearer header for non-browser clients.
fn access_token<'a>(jar: &'a CookieJar, request: &'a Request) -> Option<&'a str> {
    jar.get(ACCESS_TOKEN_COOKIE)
        .map(|cookie| cookie.value())
        .filter(|value| !value.is_empty())
        .or_else(|| {
            request
                .headers()
                .get(AUTHORIZATION)
                .and_then(|h| h.to_str().ok())
                .and_then(extract_bearer_token)
        })
}

/// Authentication middleware that validates access tokens.
///
/// Valid claims are stored in request extensions for [`AuthOwner`].
pub async fn auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = access_token(&jar, &request) else {
        return ApiError::unauthorized("Access token required").into_response();
    };

    match state.auth_service.verify_access_token(token) {
        Some(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        None => ApiError::unauthorized("Invalid or expired token").into_response(),
    }
}

/// Extractor for the authenticated store owner.
///
/// ```ignore
/// async fn handler(owner: AuthOwner) -> impl IntoResponse {
///     let owner_id = owner.owner_id();
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthOwner(pub Claims);

impl AuthOwner {
    /// Returns the owner ID from the claims.
    #[must_use]
    pub const fn owner_id(&self) -> StoreOwnerId {
        self.0.owner_id()
    }

    /// Returns the inner claims.
    #[must_use]
    pub const fn claims(&self) -> &Claims {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AuthOwner
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthOwner)
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}
