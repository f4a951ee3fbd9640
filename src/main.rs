//! Report Hub server
//!
//! Serves the gated report builder on `BIND_ADDR`.

use axum::Router;
use report_hub::catalog::MemoryCatalog;
use report_hub::{AppConfig, router};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!(hub = %config.sso.hub_base_url(), "Starting Report Hub");

    let app = build_app(&config)?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Listening on {}", config.bind_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

#[cfg(feature = "postgrest")]
fn build_app(config: &AppConfig) -> anyhow::Result<Router> {
    use report_hub::catalog::PostgrestCatalog;

    match &config.catalog {
        Some(backend) => {
            tracing::info!(url = %backend.url, "Using hosted catalog");
            Ok(router(config.sso.clone(), PostgrestCatalog::new(backend)?))
        }
        None => Ok(demo_app(config)),
    }
}

#[cfg(not(feature = "postgrest"))]
fn build_app(config: &AppConfig) -> anyhow::Result<Router> {
    if config.catalog.is_some() {
        tracing::warn!("Built without the postgrest feature; ignoring SUPABASE_URL");
    }
    Ok(demo_app(config))
}

fn demo_app(config: &AppConfig) -> Router {
    tracing::warn!("No catalog backend configured, serving sample items from memory");
    router(config.sso.clone(), MemoryCatalog::with_sample_items())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}
