//! Origin of the page being served, as seen by the browser.

use std::convert::Infallible;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::HOST, request::Parts},
};

use crate::services::PageOrigin;

/// Header set by TLS-terminating proxies.
pub const FORWARDED_PROTO_HEADER: &str = "x-forwarded-proto";

/// Page origin derived from `Host` and `X-Forwarded-Proto`.
///
/// `None` when the request carries no usable `Host` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOrigin(pub Option<PageOrigin>);

impl RequestOrigin {
    pub fn from_parts(parts: &Parts) -> Self {
        let host = parts
            .headers
            .get(HOST)
            .and_then(|h| h.to_str().ok())
            .or_else(|| parts.uri.host())
            .and_then(|h| h.split(':').next())
            .map(str::trim)
            .filter(|h| !h.is_empty());

        let secure = parts
            .headers
            .get(FORWARDED_PROTO_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(|proto| proto.trim().eq_ignore_ascii_case("https"))
            .unwrap_or_else(|| parts.uri.scheme_str() == Some("https"));

        Self(host.map(|host| PageOrigin {
            secure,
            host: host.to_ascii_lowercase(),
        }))
    }

    pub fn as_ref(&self) -> Option<&PageOrigin> {
        self.0.as_ref()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestOrigin
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts))
    }
}
