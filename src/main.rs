use std::net::SocketAddr;

use anyhow::Context;
use stat_analyst::{config::Config, routes::create_router, utils::init_logger, AppState};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded: {:?}", config.server);
    info!(llm = ?config.llm, uploads = %config.uploads.dir.display(), "Service settings");

    if config.llm.active_api_key().is_none() {
        warn!("OPENAI_API_KEY is not set; questions will fail until it is configured");
    }

    tokio::fs::create_dir_all(&config.uploads.dir)
        .await
        .with_context(|| format!("Failed to create upload dir {}", config.uploads.dir.display()))?;

    // Create shared state
    let state = AppState::new(config.clone())
        .map_err(|e| anyhow::anyhow!("Failed to initialise application state: {}", e))?;

    let app = create_router(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", config.server.host, config.server.port))?;
    info!("Server listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
