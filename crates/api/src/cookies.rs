//! Session cookies carrying the access and refresh tokens.
//!
//! Attribute derivation:
//!
//! | cross-origin | https | `SameSite` | `Secure` |
//! |---|---|---|---|
//! | yes | yes | None | yes |
//! | yes | no | Lax | no |
//! | no | yes | Lax | yes |
//! | no | no | Lax | no |
//!
//! Browsers reject `SameSite=None` without `Secure`, so plain-http
//! cross-origin requests fall back to `Lax`.

use axum::http::{
    HeaderMap,
    header::{HOST, ORIGIN},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

/// Name of the cookie holding the access token.
pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";

/// Name of the cookie holding the refresh token.
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Where a request came from, as far as cookie attributes care.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionContext {
    /// The `Origin` header names a different host than the one serving the request.
    pub cross_origin: bool,
    /// The request reached the edge over TLS.
    pub https: bool,
}

impl SessionContext {
    /// Derives the context from request headers.
    ///
    /// A request is cross-origin when its `Origin` authority differs from
    /// `Host`. The scheme comes from `X-Forwarded-Proto`, since TLS terminates
    /// at the proxy in front of the server.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let host = headers.get(HOST).and_then(|h| h.to_str().ok());
        let origin = headers.get(ORIGIN).and_then(|h| h.to_str().ok());

        let cross_origin = match (origin, host) {
            (Some(origin), Some(host)) => origin_authority(origin)
                .is_none_or(|authority| !authority.eq_ignore_ascii_case(host)),
            (Some(_), None) => true,
            (None, _) => false,
        };

        let https = headers
            .get(FORWARDED_PROTO)
            .and_then(|h| h.to_str().ok())
            .and_then(|v| v.split(',').next())
            .is_some_and(|proto| proto.trim().eq_ignore_ascii_case("https"));

        Self {
            cross_origin,
            https,
        }
    }

    /// `None` only for cross-origin requests over https.
    #[must_use]
    pub const fn same_site(self) -> SameSite {
        if self.cross_origin && self.https {
            SameSite::None
        } else {
            SameSite::Lax
        }
    }

    /// Cookies are `Secure` whenever the request is https.
    #[must_use]
    pub const fn secure(self) -> bool {
        self.https
    }

    /// An `HttpOnly` token cookie living for `max_age`.
    #[must_use]
    pub fn token_cookie(
        self,
        name: &'static str,
        value: String,
        max_age: chrono::Duration,
    ) -> Cookie<'static> {
        Cookie::build((name, value))
            .path("/")
            .http_only(true)
            .secure(self.secure())
            .same_site(self.same_site())
            .max_age(time::Duration::seconds(max_age.num_seconds()))
            .build()
    }

    /// A cookie that clears `name`, with the same attributes it was set with.
    #[must_use]
    pub fn removal_cookie(self, name: &'static str) -> Cookie<'static> {
        Cookie::build((name, ""))
            .path("/")
            .http_only(true)
            .secure(self.secure())
            .same_site(self.same_site())
            .max_age(time::Duration::ZERO)
            .build()
    }

    /// Adds both token cookies to the jar.
    #[must_use]
    pub fn with_session(
        self,
        jar: CookieJar,
        access: (String, chrono::Duration),
        refresh: (String, chrono::Duration),
    ) -> CookieJar {
        jar.add(self.token_cookie(ACCESS_TOKEN_COOKIE, access.0, access.1))
            .add(self.token_cookie(REFRESH_TOKEN_COOKIE, refresh.0, refresh.1))
    }

    /// Clears both token cookies.
    #[must_use]
    pub fn without_session(self, jar: CookieJar) -> CookieJar {
        jar.add(self.removal_cookie(ACCESS_TOKEN_COOKIE))
            .add(self.removal_cookie(REFRESH_TOKEN_COOKIE))
    }
}

/// `https://shop.example:8443/path` -> `shop.example:8443`.
fn origin_authority(origin: &str) -> Option<&str> {
    let (_, rest) = origin.split_once("://")?;
    let authority = rest.split('/').next()?;
    (!authority.is_empty()).then_some(authority)
}
