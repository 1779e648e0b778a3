// ============================================================================
// Admin Surface
// ============================================================================
//
// Read-only operational visibility behind a shared bearer secret.
//
// Endpoints:
// - /admin/sources     - full provider table, disabled providers included
// - /admin/cache/clear - acknowledged no-op, entries expire on their own
// - /admin/stats       - provider counts and current timestamp
// - /admin/metrics     - Prometheus text exposition
//
// Authentication runs before any endpoint logic; unknown admin paths are
// only reported as 404 to authenticated callers.
//
// ============================================================================

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use subtle::ConstantTimeEq;

use crate::error::{AppError, AppResult};
use crate::gateway::GatewayState;
use crate::metrics;

#[derive(Debug, Serialize)]
pub struct AdminStats {
    pub sources: usize,
    pub enabled: usize,
    pub timestamp: String,
}

/// Authenticate, then dispatch on the exact admin path
pub fn handle_admin(state: &GatewayState, headers: &HeaderMap, path: &str) -> AppResult<Response> {
    authorize(headers, state.config.admin_password.as_deref())?;

    match path {
        "/admin/sources" => Ok(Json(&state.config.providers).into_response()),
        "/admin/cache/clear" => {
            tracing::info!("Cache clear requested; entries will expire naturally");
            Ok(Json(json!({
                "success": true,
                "message": "Cache will expire naturally",
            }))
            .into_response())
        }
        "/admin/stats" => Ok(Json(stats(state)).into_response()),
        "/admin/metrics" => {
            let body = metrics::gather_metrics().map_err(|e| AppError::internal(e.to_string()))?;
            Ok((
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
                body,
            )
                .into_response())
        }
        _ => Err(AppError::NotFound),
    }
}

/// Fresh snapshot on every call
pub fn stats(state: &GatewayState) -> AdminStats {
    AdminStats {
        sources: state.config.providers.len(),
        enabled: state.config.providers.enabled_count(),
        timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
    }
}

/// Check `Authorization: Bearer <secret>` against the configured secret.
/// With no secret configured nobody is authorized.
pub fn authorize(headers: &HeaderMap, secret: Option<&str>) -> AppResult<()> {
    let Some(secret) = secret else {
        return Err(AppError::Unauthorized);
    };
    let Some(token) = bearer_token(headers) else {
        return Err(AppError::Unauthorized);
    };

    if bool::from(token.as_bytes().ct_eq(secret.as_bytes())) {
        Ok(())
    } else {
        Err(AppError::Unauthorized)
    }
}

/// Token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(authorization: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(authorization).unwrap(),
        );
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(bearer_token(&headers_with("Bearer s3cret")), Some("s3cret"));
        assert_eq!(bearer_token(&headers_with("Basic s3cret")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn accepts_matching_secret() {
        assert!(authorize(&headers_with("Bearer s3cret"), Some("s3cret")).is_ok());
    }

    #[test]
    fn rejects_wrong_missing_or_prefixed_tokens() {
        let secret = Some("s3cret");
        assert!(matches!(
            authorize(&headers_with("Bearer wrong"), secret),
            Err(AppError::Unauthorized)
        ));
        assert!(matches!(
            authorize(&headers_with("Bearer s3cret2"), secret),
            Err(AppError::Unauthorized)
        ));
        assert!(matches!(
            authorize(&headers_with("s3cret"), secret),
            Err(AppError::Unauthorized)
        ));
        assert!(matches!(
            authorize(&HeaderMap::new(), secret),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn unset_secret_rejects_everyone() {
        assert!(matches!(
            authorize(&headers_with("Bearer "), None),
            Err(AppError::Unauthorized)
        ));
        assert!(matches!(
            authorize(&HeaderMap::new(), None),
            Err(AppError::Unauthorized)
        ));
    }
}
