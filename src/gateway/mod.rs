// ============================================================================
// API Gateway
// ============================================================================
//
// Single entry point in front of several unreliable drama content
// providers. It handles:
// - Response caching with route-dependent TTLs
// - Priority-ordered fallback across providers
// - Pass-through of upstream JSON without re-serialization
//
// Architecture:
// - Stateless apart from the cache store (can scale horizontally)
// - Provider table is fixed at startup
//
// ============================================================================

pub mod aggregator;
pub mod router;
pub mod service_client;

pub use router::{route_request, GatewayRouter, GatewayState};
pub use service_client::{build_upstream_url, UpstreamClient, UpstreamError};
