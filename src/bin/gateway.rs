// ============================================================================
// Drama API Gateway Service
// ============================================================================
//
// Single entry point for all client requests. It handles:
// - Aggregating several drama content providers behind /api/*
// - Response caching with route-dependent TTLs
// - Priority-ordered fallback when a provider fails
// - Bearer-gated admin inspection under /admin/*
//
// ============================================================================

use anyhow::Result;
use dracin_gateway::config::{Config, LogFormat};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    let registry = tracing_subscriber::registry().with(EnvFilter::new(config.rust_log.clone()));
    match config.logging.format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    info!("=== Drama API Gateway Starting ===");
    info!("Port: {}", config.port);
    info!("Cache backend: {:?}", config.cache.backend);
    for provider in config.providers.all() {
        info!(
            provider = %provider.id,
            base_url = %provider.base_url,
            enabled = provider.enabled,
            priority = provider.priority,
            "Upstream provider configured"
        );
    }

    if config.providers.enabled_count() == 0 {
        warn!("No upstream providers are enabled. Every /api request will return 503.");
    }
    if config.admin_password.is_none() {
        warn!("ADMIN_PASSWORD is not set. All /admin requests will be rejected.");
    }

    dracin_gateway::run(config).await
}
