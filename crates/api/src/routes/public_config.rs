//! Public configuration endpoint.
//!
//! Pages that call the backend from the browser need the API base resolved
//! for their own origin, so an https page is never handed an http base on
//! its own host.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::app::AppState;
use crate::extractors::RequestOrigin;
use crate::services::ApiBase;

/// Public configuration response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PublicConfigResponse {
    /// Base for browser requests. Empty means same-origin relative paths.
    pub api_base: String,
    /// Whether static map images are rendered.
    pub maps_enabled: bool,
}

/// GET /api/public-config
pub async fn get_public_config(
    State(state): State<AppState>,
    origin: RequestOrigin,
) -> Json<PublicConfigResponse> {
    let backend = &state.config.backend;
    let base = ApiBase::resolve(
        Some(backend.base_url.as_str()),
        origin.as_ref(),
        backend.mixed_content_policy,
    );

    Json(PublicConfigResponse {
        api_base: base.as_str().to_string(),
        maps_enabled: state.config.maps.api_key().is_some(),
    })
}
