use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

pub mod cache;
pub mod config;
pub mod error;
pub mod gateway;
pub mod metrics;
pub mod routes;

use config::Config;
use gateway::GatewayRouter;

/// Bind the configured address and serve until a shutdown signal arrives
pub async fn run(config: Config) -> Result<()> {
    let config = Arc::new(config);

    let addr: SocketAddr = format!("{}:{}", config.bind_address, config.port)
        .parse()
        .context("Failed to parse bind address")?;

    let state = GatewayRouter::create_state(config.clone()).await?;
    let app = routes::create_router(state);

    let listener = TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    tracing::info!("Gateway listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Failed to start server")?;

    tracing::info!("Gateway shut down");
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix
pub async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => {
                        tracing::info!("SIGTERM received, initiating graceful shutdown...");
                    }
                    _ = tokio::signal::ctrl_c() => {
                        tracing::info!("SIGINT received, initiating graceful shutdown...");
                    }
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to register SIGTERM handler, using Ctrl-C only");
                tokio::signal::ctrl_c().await.ok();
            }
        }
    }
    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await.ok();
        tracing::info!("Ctrl-C received, initiating graceful shutdown...");
    }
}
