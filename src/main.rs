use anyhow::Context;
use tracing_subscriber::EnvFilter;

use marketplace_api::app::{router, AppState};
use marketplace_api::config::DEV_JWT_SECRET;
use marketplace_api::{config, database, is_production};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("marketplace_api=info,tower_http=info")),
        )
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    config
        .validate()
        .map_err(|msg| anyhow::anyhow!(msg))
        .context("invalid configuration")?;
    tracing::info!("Starting Marketplace API in {:?} mode", config.environment);
    if !is_production!() && config.security.jwt_secret == DEV_JWT_SECRET {
        tracing::warn!("Using the development JWT secret");
    }

    let store = database::connect(&config.store)
        .await
        .context("failed to open document store")?;

    let app = router(AppState::new(store, config.clone()));

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Marketplace API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Marketplace API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
