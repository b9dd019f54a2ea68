use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use batdeck_core::error::CoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Only the structured endpoints (`/list`) surface errors; the script
/// endpoints keep the best-effort "always 200" contract and log instead.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `batdeck_core`.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => match core {
                CoreError::NotFound { key } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("entry '{key}' not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Config(_) | CoreError::Io { .. } => {
                    tracing::error!(error = %core, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
