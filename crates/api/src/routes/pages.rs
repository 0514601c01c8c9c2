//! Home page and the not-found page.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::app::AppState;
use crate::error::AppError;

/// GET /
pub async fn home(State(state): State<AppState>) -> Result<Response, AppError> {
    Ok(state
        .views
        .render("home.html", &json!({ "page_title": "Web Thiệp Mời" }))?
        .into_response())
}

/// Fallback for unknown paths.
pub async fn not_found(State(state): State<AppState>) -> Response {
    render_not_found(&state)
}

/// 404 page, or the plain error page if rendering fails.
pub fn render_not_found(state: &AppState) -> Response {
    match state
        .views
        .render("not_found.html", &json!({ "page_title": "404" }))
    {
        Ok(html) => (StatusCode::NOT_FOUND, html).into_response(),
        Err(e) => e.into_response(),
    }
}
