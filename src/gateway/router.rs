// ============================================================================
// Gateway Router
// ============================================================================
//
// Dispatches every non-preflight request by path prefix:
// - /admin* → admin surface (bearer-token gated)
// - /api*   → aggregation core (cache + provider fallback)
// - /*      → static service description
//
// ============================================================================

use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::{HeaderMap, Uri},
    response::Response,
};
use std::sync::Arc;

use crate::cache::{create_cache_store, CacheStore};
use crate::config::Config;
use crate::error::AppResult;
use crate::gateway::aggregator;
use crate::gateway::service_client::UpstreamClient;
use crate::metrics;
use crate::routes::{admin, info};

/// Gateway router state
///
/// Shared read-only by every request; the cache store is the only
/// component with interior mutability.
pub struct GatewayState {
    pub config: Arc<Config>,
    pub cache: Arc<dyn CacheStore>,
    pub upstream: UpstreamClient,
}

impl GatewayState {
    pub fn new(config: Arc<Config>, cache: Arc<dyn CacheStore>) -> Result<Self> {
        let upstream =
            UpstreamClient::new(&config.upstream).context("Failed to create upstream HTTP client")?;

        Ok(Self {
            config,
            cache,
            upstream,
        })
    }
}

/// Route request to the admin surface, the aggregation core or the info page
pub async fn route_request(
    State(state): State<Arc<GatewayState>>,
    uri: Uri,
    headers: HeaderMap,
) -> AppResult<Response> {
    match uri.path() {
        path if path.starts_with("/admin") => {
            metrics::REQUESTS_TOTAL.with_label_values(&["admin"]).inc();
            admin::handle_admin(&state, &headers, path)
        }
        path if path.starts_with("/api") => {
            metrics::REQUESTS_TOTAL.with_label_values(&["api"]).inc();
            aggregator::handle_api(&state, &uri).await
        }
        _ => {
            metrics::REQUESTS_TOTAL.with_label_values(&["info"]).inc();
            Ok(info::service_info())
        }
    }
}

/// Gateway router builder
pub struct GatewayRouter;

impl GatewayRouter {
    /// Create gateway state, connecting the configured cache store
    pub async fn create_state(config: Arc<Config>) -> Result<Arc<GatewayState>> {
        let cache = create_cache_store(&config.cache)
            .await
            .context("Failed to initialise cache store")?;

        tracing::info!(backend = cache.backend(), "Cache store ready");

        Ok(Arc::new(GatewayState::new(config, cache)?))
    }
}
