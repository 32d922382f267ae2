use anyhow::{anyhow, Context};
use tracing::info;
use loja_virtual::app_system::{setup_tracing, CatalogSystem};
use loja_virtual::config::AppConfig;
use loja_virtual::http::{cors_layer, router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    setup_tracing(&config.logging.level);

    info!(bind_addr = %config.server.bind_addr, "Starting catalog service");

    let system = CatalogSystem::new(config.store.buffer_size);
    let app = router(system.service.clone(), cors_layer(&config.cors.allowed_origins));

    let listener = tokio::net::TcpListener::bind(config.server.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind_addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    // the router and its service clones are gone, so the store can drain
    system.shutdown().await.map_err(|e| anyhow!(e))?;

    info!("Application completed successfully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}
