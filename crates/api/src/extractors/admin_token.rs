//! Admin bearer token extractor.
//!
//! The token is placed in request extensions by
//! [`crate::middleware::auth_guard::require_admin_token`]. Handlers outside the
//! guard fall back to reading the cookie directly.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::COOKIE, request::Parts},
    response::Redirect,
};
use persistence::{AdminTokenStore, CookieJarStore, Lifetime};

/// Path unauthenticated admin requests are sent to.
pub const LOGIN_PATH: &str = "/admin/login";

/// Token stored at login, forwarded as a bearer token on admin calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminToken(pub String);

impl AdminToken {
    /// Reads the token from a request's cookies.
    pub fn from_parts(parts: &Parts) -> Option<Self> {
        let header = parts.headers.get(COOKIE).and_then(|v| v.to_str().ok());
        AdminTokenStore::new(CookieJarStore::from_header(header, Lifetime::Durable))
            .get()
            .map(AdminToken)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AdminToken
where
    S: Send + Sync,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(token) = parts.extensions.get::<AdminToken>() {
            return Ok(token.clone());
        }

        Self::from_parts(parts).ok_or_else(|| Redirect::to(LOGIN_PATH))
    }
}
