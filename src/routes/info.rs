use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

pub const SERVICE_NAME: &str = "Dracin API Gateway";

/// Static description of the service, served for every path outside
/// `/api` and `/admin`
pub fn service_info() -> Response {
    Json(json!({
        "name": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "trending": "/api/trending",
            "latest": "/api/latest",
            "foryou": "/api/foryou",
            "search": "/api/search?query=<query>",
            "detail": "/api/detail?bookId=<bookId>",
            "episodes": "/api/allepisode?bookId=<bookId>",
            "admin": "/admin",
        },
    }))
    .into_response()
}
