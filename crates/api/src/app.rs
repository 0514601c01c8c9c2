use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use chrono::FixedOffset;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Config;
use crate::error::AppError;
use crate::middleware::{
    metrics_handler, metrics_middleware, require_admin_token, security_headers_middleware,
    trace_id, SecurityHeaders,
};
use crate::routes::{
    admin_auth, admin_import, admin_invitations, admin_templates, health, invite, pages,
    public_config,
};
use crate::services::{CookieHelper, InvitationBackend};
use crate::views::Views;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub backend: Arc<dyn InvitationBackend>,
    pub views: Arc<Views>,
    pub cookies: CookieHelper,
    /// Zone event times are displayed in.
    pub zone: FixedOffset,
}

pub fn create_app(config: Config, backend: Arc<dyn InvitationBackend>) -> Result<Router, AppError> {
    let zone = config.display_zone().ok_or_else(|| {
        AppError::Internal(format!(
            "Invalid display offset: {}",
            config.display.utc_offset_hours
        ))
    })?;
    let views = Views::new()?;
    let config = Arc::new(config);

    let state = AppState {
        config: config.clone(),
        backend,
        views: Arc::new(views),
        cookies: CookieHelper::new(config.cookies.clone()),
        zone,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Admin console (requires a stored admin token)
    let admin_routes = Router::new()
        .route("/admin", get(admin_auth::admin_index))
        .route("/admin/logout", post(admin_auth::logout))
        // Templates
        .route("/admin/templates", get(admin_templates::list_templates))
        .route(
            "/admin/templates/create",
            get(admin_templates::create_page).post(admin_templates::create_submit),
        )
        .route(
            "/admin/templates/:id/edit",
            get(admin_templates::edit_page).post(admin_templates::edit_submit),
        )
        .route(
            "/admin/templates/:id/delete",
            post(admin_templates::delete_template),
        )
        // Invitations
        .route(
            "/admin/invitations",
            get(admin_invitations::list_invitations),
        )
        .route(
            "/admin/invitations/create",
            get(admin_invitations::create_page).post(admin_invitations::create_submit),
        )
        .route(
            "/admin/invitations/import",
            get(admin_import::import_page)
                .post(admin_import::import_submit)
                .layer(DefaultBodyLimit::max(admin_import::MAX_UPLOAD_BYTES)),
        )
        .route(
            "/admin/invitations/:id/delete",
            post(admin_invitations::delete_invitation),
        )
        .route_layer(middleware::from_fn(require_admin_token));

    // Public pages (no token required)
    let public_routes = Router::new()
        .route("/", get(pages::home))
        .route("/invite/:slug", get(invite::show_invitation))
        .route("/invite/:slug/rsvp", post(invite::submit_rsvp))
        .route(
            "/admin/login",
            get(admin_auth::login_page).post(admin_auth::login),
        )
        .route("/api/public-config", get(public_config::get_public_config))
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    let router = Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .fallback(pages::not_found)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn_with_state(
            SecurityHeaders::from(&config.security),
            security_headers_middleware,
        ))
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(metrics_middleware)) // Prometheus metrics
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id)) // Request ID and logging
        .layer(cors)
        .with_state(state);

    Ok(router)
}
