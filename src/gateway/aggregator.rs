// ============================================================================
// Aggregation Core
// ============================================================================
//
// Resolves one /api/<route>?<query> request:
//
// 1. cache lookup under api:<route>:<?query>; a hit is served as-is
// 2. on a miss, enabled providers are tried one at a time in
//    (priority, declaration index) order
// 3. the first 2xx body is returned byte-for-byte and written to the cache by a
//    detached task, so the client never waits on cache persistence
// 4. if every provider fails, 503 with the last provider's error
//
// Providers are never fanned out in parallel.
//
// ============================================================================

use axum::{
    body::Body,
    http::{header, StatusCode, Uri},
    response::Response,
};
use bytes::Bytes;
use std::sync::Arc;

use crate::cache::{cache_key, CacheStore, RouteCategory};
use crate::error::{AppError, AppResult};
use crate::gateway::router::GatewayState;
use crate::gateway::service_client::UpstreamError;
use crate::metrics;

pub const X_CACHE: &str = "x-cache";
pub const X_SOURCE: &str = "x-source";

/// Serve one `/api/*` request
pub async fn handle_api(state: &GatewayState, uri: &Uri) -> AppResult<Response> {
    let path = uri.path();
    let route = path.strip_prefix("/api").unwrap_or(path);
    let query = uri.query();
    let search = query.map(|q| format!("?{}", q)).unwrap_or_default();
    let key = cache_key(route, &search);

    match state.cache.get(&key).await {
        Ok(Some(body)) => {
            metrics::CACHE_LOOKUPS_TOTAL.with_label_values(&["hit"]).inc();
            tracing::debug!(cache_key = %key, "Cache hit");
            return json_passthrough(body, "HIT", None);
        }
        Ok(None) => {
            metrics::CACHE_LOOKUPS_TOTAL.with_label_values(&["miss"]).inc();
        }
        Err(e) => {
            metrics::CACHE_LOOKUPS_TOTAL.with_label_values(&["error"]).inc();
            tracing::warn!(
                cache_key = %key,
                backend = state.cache.backend(),
                error = %e,
                "Cache lookup failed, treating as miss"
            );
        }
    }

    let mut last_error: Option<UpstreamError> = None;

    for provider in state.config.providers.attempt_order() {
        match state.upstream.fetch(provider, route, query).await {
            Ok(body) => {
                metrics::UPSTREAM_ATTEMPTS_TOTAL
                    .with_label_values(&[provider.id.as_str(), "success"])
                    .inc();
                tracing::debug!(provider = %provider.id, route = %route, "Served from upstream");

                spawn_cache_write(state.cache.clone(), key, body.clone(), route);
                return json_passthrough(body, "MISS", Some(&provider.id));
            }
            Err(e) => {
                metrics::UPSTREAM_ATTEMPTS_TOTAL
                    .with_label_values(&[provider.id.as_str(), "failure"])
                    .inc();
                tracing::warn!(
                    provider = %provider.id,
                    route = %route,
                    error = %e,
                    "Upstream source failed"
                );
                last_error = Some(e);
            }
        }
    }

    metrics::ALL_SOURCES_FAILED_TOTAL.inc();
    let message = last_error
        .map(|e| e.to_string())
        .unwrap_or_else(|| "Unknown error".to_string());
    Err(AppError::AllSourcesFailed(message))
}

/// Persist a fresh upstream body without holding up the response.
/// Failures are logged and dropped.
fn spawn_cache_write(cache: Arc<dyn CacheStore>, key: String, body: Bytes, route: &str) {
    let category = RouteCategory::from_route(route);
    let ttl = category.ttl();

    tokio::spawn(async move {
        match cache.put(&key, body, ttl).await {
            Ok(()) => tracing::debug!(
                cache_key = %key,
                category = category.as_str(),
                ttl_secs = ttl.as_secs(),
                "Cached upstream response"
            ),
            Err(e) => {
                metrics::CACHE_WRITE_FAILURES_TOTAL.inc();
                tracing::warn!(
                    cache_key = %key,
                    backend = cache.backend(),
                    error = %e,
                    "Background cache write failed"
                );
            }
        }
    });
}

fn json_passthrough(body: Bytes, cache: &'static str, source: Option<&str>) -> AppResult<Response> {
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/json")
        .header(X_CACHE, cache);

    if let Some(source) = source {
        builder = builder.header(X_SOURCE, source);
    }

    Ok(builder.body(Body::from(body))?)
}
