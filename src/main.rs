use anyhow::Context;
use api_server::AppState;
use application::StoreApp;
use config::Config;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str =
    "storefront=info,api_server=debug,application=info,infrastructure=info,tower_http=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    info!("🚀 Starting storefront API server");

    // Load configuration from environment
    let config = Config::from_env(None).context("invalid configuration")?;
    info!("💾 Using database: {}", config.database_path);

    // Schema is created before the listener accepts anything
    let store = Arc::new(StoreApp::new(&config).context("failed to initialize the store")?);

    let bind_address = config.api_address();
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind {}", bind_address))?;

    api_server::serve(listener, AppState::new(store.clone()), shutdown_signal()).await?;

    info!("👋 Server stopped, releasing resources");
    StoreApp::shutdown_shared(store);

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
