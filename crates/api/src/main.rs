use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use invitation_portal_api::{app, config, middleware, services};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Load configuration
    let config = config::Config::load()?;

    // Initialize logging
    middleware::logging::init_logging(&config.logging);
    middleware::init_metrics()?;

    info!("Starting Invitation Portal v{}", env!("CARGO_PKG_VERSION"));

    // Server-side calls always use the configured absolute base
    let base = services::ApiBase::resolve(
        Some(config.backend.base_url.as_str()),
        None,
        config.backend.mixed_content_policy,
    );
    info!(backend = %base.as_str(), "Using backend API");
    let backend = Arc::new(services::HttpBackend::new(base)?);

    // Build application
    let app = app::create_app(config.clone(), backend)?;

    // Start server
    let addr = config.socket_addr();
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
