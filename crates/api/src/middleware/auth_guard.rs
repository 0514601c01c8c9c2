//! Admin auth guard.
//!
//! Admin pages require a stored admin token. Only presence is checked; an
//! expired token is discovered when the backend rejects a call, and the page
//! shows its own error for that.

use axum::{
    body::Body,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::extractors::{AdminToken, LOGIN_PATH};

/// Redirects to the login page when no admin token is stored. Otherwise the
/// token is placed in request extensions for [`AdminToken`].
pub async fn require_admin_token(req: Request<Body>, next: Next) -> Response {
    let (mut parts, body) = req.into_parts();

    let Some(token) = AdminToken::from_parts(&parts) else {
        tracing::debug!(path = %parts.uri.path(), "No admin token, redirecting to login");
        return Redirect::to(LOGIN_PATH).into_response();
    };

    parts.extensions.insert(token);
    next.run(Request::from_parts(parts, body)).await
}
