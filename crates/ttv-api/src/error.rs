//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Task backlog full: {0} tasks already queued")]
    BacklogFull(usize),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Generation error: {0}")]
    Llm(#[from] ttv_llm::LlmError),

    #[error("Media error: {0}")]
    Media(#[from] ttv_media::MediaError),

    #[error("Queue error: {0}")]
    Queue(#[from] ttv_tasks::QueueError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::RateLimited | ApiError::BacklogFull(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_)
            | ApiError::Llm(_)
            | ApiError::Media(_)
            | ApiError::Queue(_)
            | ApiError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ttv_tasks::TaskError> for ApiError {
    fn from(e: ttv_tasks::TaskError) -> Self {
        match e {
            ttv_tasks::TaskError::BacklogFull(n) => ApiError::BacklogFull(n),
            ttv_tasks::TaskError::Config(msg) => ApiError::Internal(msg),
            ttv_tasks::TaskError::Queue(e) => ApiError::Queue(e),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(e: validator::ValidationErrors) -> Self {
        ApiError::Validation(e.to_string())
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Don't expose internal error details in production
        let detail = match &self {
            ApiError::Internal(_)
            | ApiError::Llm(_)
            | ApiError::Media(_)
            | ApiError::Queue(_)
            | ApiError::Io(_) => {
                if std::env::var("ENVIRONMENT").unwrap_or_default() == "production" {
                    "An internal error occurred".to_string()
                } else {
                    self.to_string()
                }
            }
            _ => self.to_string(),
        };

        let body = ErrorResponse { detail };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backlog_full_maps_to_429() {
        let err: ApiError = ttv_tasks::TaskError::BacklogFull(7).into();
        assert_eq!(err.status_code(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn not_found_maps_to_404() {
        assert_eq!(
            ApiError::not_found("no such task").status_code(),
            StatusCode::NOT_FOUND
        );
    }
}
