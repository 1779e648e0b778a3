// ============================================================================
// Axum Routes Module
// ============================================================================
//
// Structure:
// - mod.rs: Router assembly and middleware stack
// - admin.rs: Bearer-gated admin surface
// - info.rs: Static service description
// - middleware.rs: Request logging, CORS, panic conversion
//
// All paths go through a single fallback handler that dispatches by prefix
// (see gateway::router), so there is no per-path route table here.
//
// ============================================================================

pub mod admin;
pub mod info;
pub mod middleware;

use axum::Router;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::gateway::{route_request, GatewayState};

/// Create the gateway router
pub fn create_router(state: Arc<GatewayState>) -> Router {
    Router::new()
        .fallback(route_request)
        // Apply middleware (outermost first)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum::middleware::from_fn(middleware::request_logging))
                // CORS sits outside the panic handler so 500s carry it too
                .layer(axum::middleware::from_fn(middleware::cors))
                .layer(CatchPanicLayer::custom(middleware::handle_panic))
                .into_inner(),
        )
        .with_state(state)
}
