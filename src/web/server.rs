use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Router,
    body::Body,
    extract::DefaultBodyLimit,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::api::{self, AppState};
use super::embedded::Assets;
use crate::config::ServerConfig;
use crate::review::ReviewOrchestrator;

/// Build the full application router: upload API, health check, and the
/// three embedded page assets.
pub fn build_router(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    api::api_router()
        .route("/", get(|| asset("index.html", "text/html; charset=utf-8")))
        .route("/styles.css", get(|| asset("styles.css", "text/css")))
        .route("/index.js", get(|| asset("index.js", "application/javascript")))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn asset(path: &'static str, content_type: &'static str) -> Response {
    match Assets::get(path) {
        Some(content) => (
            [(header::CONTENT_TYPE, content_type)],
            Body::from(content.data.into_owned()),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, format!("{} not embedded", path)).into_response(),
    }
}

/// Start the review server and block until Ctrl+C.
pub async fn start_server(config: ServerConfig, orchestrator: ReviewOrchestrator) -> Result<()> {
    tokio::fs::create_dir_all(&config.staging_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create staging directory {}",
                config.staging_dir.display()
            )
        })?;

    let state = Arc::new(AppState { orchestrator });
    let mut app = build_router(state, config.max_body_bytes());

    if config.dev_mode {
        app = app.layer(CorsLayer::permissive());
    }

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    let local_addr = listener.local_addr()?;
    tracing::info!(%local_addr, "Server listening");
    println!("Review Desk running at http://{}", local_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    println!("Server shut down gracefully.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    println!("\nShutting down...");
}
