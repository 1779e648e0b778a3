// ============================================================================
// Router & CORS Tests
// ============================================================================
//
// Tests for top-level dispatch:
// - OPTIONS short-circuits with CORS headers only
// - CORS headers on every response, errors included
// - Non-/api, non-/admin paths fall through to the info document
//
// ============================================================================

use reqwest::{Method, StatusCode};

use test_utils::{create_client, provider, spawn_app, spawn_upstream};

fn assert_cors_headers(response: &reqwest::Response) {
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-allow-methods"], "GET, POST, OPTIONS");
    assert_eq!(
        headers["access-control-allow-headers"],
        "Content-Type, Authorization"
    );
}

// ============================================================================
// OPTIONS
// ============================================================================

#[tokio::test]
async fn test_options_short_circuits_without_upstream_calls() {
    let upstream = spawn_upstream(StatusCode::OK, "{}").await;
    let app = spawn_app(vec![provider("primary", &upstream.base_url, true, 1)]).await;

    let response = create_client()
        .request(Method::OPTIONS, app.url("/api/trending"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_cors_headers(&response);
    assert!(response.headers().get("x-cache").is_none());
    assert_eq!(response.text().await.unwrap(), "");
    assert_eq!(upstream.hits(), 0);
    assert!(app.cache.is_empty());
}

#[tokio::test]
async fn test_options_on_admin_skips_authentication() {
    let app = spawn_app(vec![]).await;

    let response = create_client()
        .request(Method::OPTIONS, app.url("/admin/stats"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_cors_headers(&response);
    assert_eq!(response.text().await.unwrap(), "");
}

// ============================================================================
// CORS on regular responses
// ============================================================================

#[tokio::test]
async fn test_cors_headers_on_success_and_error_responses() {
    let upstream = spawn_upstream(StatusCode::OK, "[]").await;
    let app = spawn_app(vec![provider("primary", &upstream.base_url, true, 1)]).await;
    let client = create_client();

    let ok = client.get(app.url("/api/latest")).send().await.unwrap();
    assert_eq!(ok.status(), StatusCode::OK);
    assert_cors_headers(&ok);

    let unauthorized = client.get(app.url("/admin/sources")).send().await.unwrap();
    assert_eq!(unauthorized.status(), StatusCode::UNAUTHORIZED);
    assert_cors_headers(&unauthorized);

    let info = client.get(app.url("/")).send().await.unwrap();
    assert_cors_headers(&info);
}

#[tokio::test]
async fn test_cors_headers_on_503() {
    let app = spawn_app(vec![]).await;

    let response = create_client().get(app.url("/api/trending")).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_cors_headers(&response);
}

// ============================================================================
// Info document
// ============================================================================

#[tokio::test]
async fn test_root_returns_service_description() {
    let app = spawn_app(vec![]).await;

    let response = create_client().get(app.url("/")).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "application/json");
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["name"], "Dracin API Gateway");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["endpoints"]["trending"], "/api/trending");
    assert_eq!(body["endpoints"]["search"], "/api/search?query=<query>");
    assert_eq!(body["endpoints"]["episodes"], "/api/allepisode?bookId=<bookId>");
    assert_eq!(body["endpoints"]["admin"], "/admin");
}

#[tokio::test]
async fn test_unknown_paths_fall_through_to_info_document() {
    let upstream = spawn_upstream(StatusCode::OK, "{}").await;
    let app = spawn_app(vec![provider("primary", &upstream.base_url, true, 1)]).await;
    let client = create_client();

    for path in ["/watch/123", "/health", "/favicon.ico"] {
        let response = client.get(app.url(path)).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "path {}", path);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["name"], "Dracin API Gateway", "path {}", path);
    }

    assert_eq!(upstream.hits(), 0);
}
