//! `review-desk serve`: the web server.

use std::sync::Arc;

use anyhow::Result;
use review_desk::config::DeskConfig;
use review_desk::gemini::GeminiClientFactory;
use review_desk::review::ReviewOrchestrator;
use review_desk::web::server::start_server;

pub async fn cmd_serve(
    mut config: DeskConfig,
    host: Option<String>,
    port: Option<u16>,
    dev: bool,
    open: bool,
) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    config.server.dev_mode |= dev;

    // Spawn browser open before starting the server (which blocks)
    if open {
        let url = format!("http://{}", config.server.bind_addr());
        tokio::spawn(async move {
            tokio::time::sleep(tokio::time::Duration::from_millis(500)).await;
            if let Err(e) = open::that(&url) {
                eprintln!("Failed to open browser: {}", e);
            }
        });
    }

    let factory = Arc::new(GeminiClientFactory::new(config.gemini.clone()));
    let orchestrator = ReviewOrchestrator::new(
        factory,
        config.server.staging_dir.clone(),
        config.gemini.model.clone(),
    );
    tracing::info!(
        model = %orchestrator.model(),
        staging = %config.server.staging_dir.display(),
        "Starting review server"
    );

    start_server(config.server, orchestrator).await
}
