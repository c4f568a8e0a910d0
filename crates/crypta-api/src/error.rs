use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("task not found: {0}")]
    TaskNotFound(String),

    #[error("too many concurrent requests (capacity {capacity})")]
    TooManyRequests { capacity: usize },

    #[error("internal error: {0}")]
    Internal(String),

    #[error("core error: {0}")]
    Core(#[from] crypta_core::CoreError),
}

impl From<crypta_model::ModelError> for ApiError {
    fn from(e: crypta_model::ModelError) -> Self {
        ApiError::InvalidRequest(e.to_string())
    }
}

#[cfg(feature = "http")]
impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        use axum::{Json, http::StatusCode};
        use serde_json::json;

        let (status, body) = match &self {
            ApiError::InvalidRequest(msg) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Bad request", "message": msg }),
            ),
            ApiError::TaskNotFound(id) => (
                StatusCode::NOT_FOUND,
                json!({ "error": "Task not found", "taskId": id }),
            ),
            ApiError::TooManyRequests { capacity } => (
                StatusCode::TOO_MANY_REQUESTS,
                json!({
                    "error": "Too many concurrent requests",
                    "message": format!(
                        "Server is currently handling maximum allowed concurrent requests ({capacity}). Please try again later."
                    ),
                }),
            ),
            ApiError::Internal(_) | ApiError::Core(_) => {
                tracing::error!(error = %self, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error", "message": self.to_string() }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
