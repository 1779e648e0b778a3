use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// Errors that terminate a gateway request
///
/// Per-provider failures never show up here: they are recovered inside the
/// fallback loop and only the aggregate failure is surfaced as
/// `AllSourcesFailed`. Everything that is not one of the designed error
/// paths maps to a 500 with the error's message.
#[derive(Error, Debug)]
pub enum AppError {
    // ===== Designed error paths =====
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not Found")]
    NotFound,

    #[error("All API sources failed: {0}")]
    AllSourcesFailed(String),

    // ===== Safety net =====
    #[error("{0}")]
    Http(#[from] axum::http::Error),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::AllSourcesFailed(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code for log correlation
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::NotFound => "NOT_FOUND",
            AppError::AllSourcesFailed(_) => "ALL_SOURCES_FAILED",
            AppError::Http(_) => "HTTP_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Log this error with appropriate level and context
    pub fn log(&self) {
        let status = self.status_code();
        let code = self.error_code();

        if status == StatusCode::SERVICE_UNAVAILABLE {
            tracing::warn!(
                error = %self,
                error_code = %code,
                "Request could not be served by any upstream"
            );
        } else if status.is_server_error() {
            tracing::error!(
                error = %self,
                error_code = %code,
                status = %status.as_u16(),
                "Server error occurred"
            );
        } else if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(error_code = %code, "Admin authentication failed");
        } else {
            tracing::debug!(
                error = %self,
                error_code = %code,
                "Client error occurred"
            );
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        self.log();

        let status = self.status_code();
        let body = match &self {
            AppError::Unauthorized => json!({ "error": "Unauthorized" }),
            AppError::NotFound => json!({ "error": "Not Found" }),
            AppError::AllSourcesFailed(message) => json!({
                "error": "All API sources failed",
                "message": message,
            }),
            other => json!({
                "error": "Internal Server Error",
                "message": other.to_string(),
            }),
        };

        (status, Json(body)).into_response()
    }
}
