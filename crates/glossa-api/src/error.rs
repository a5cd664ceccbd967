//! HTTP error mapping for the API surface.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};

use glossa_core::Error;

/// API-level error with an HTTP status code.
#[derive(Debug)]
pub enum ApiError {
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    BadRequest(String),
    QuotaExceeded(String),
    UpstreamFailed(String),
    Internal(Error),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::NotFound(msg) => ApiError::NotFound(msg),
            Error::TranscriptNotFound(id) => {
                ApiError::NotFound(format!("Transcript {} not found", id))
            }
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            Error::Unauthorized(msg) => ApiError::Unauthorized(msg),
            Error::Forbidden(msg) => ApiError::Forbidden(msg),
            Error::QuotaExceeded { .. } => ApiError::QuotaExceeded(err.to_string()),
            Error::Upstream(_) | Error::Parse(_) => ApiError::UpstreamFailed(err.to_string()),
            other => ApiError::Internal(other),
        }
    }
}

impl ApiError {
    /// HTTP status code for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::QuotaExceeded(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::UpstreamFailed(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(self) -> String {
        match self {
            ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::BadRequest(msg)
            | ApiError::QuotaExceeded(msg)
            | ApiError::UpstreamFailed(msg) => msg,
            ApiError::Internal(err) => err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(serde_json::json!({
            "success": false,
            "error": self.message(),
        }));
        (status, body).into_response()
    }
}
