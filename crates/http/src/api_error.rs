//! Typed API error for HTTP handlers.
//!
//! Every failure leaves the server as JSON `{"error": "message"}` with a
//! matching status code.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::error::IngestError;

#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request — malformed or unacceptable body.
    BadRequest(String),
    /// 404 Not Found — unknown path.
    NotFound,
    /// 405 Method Not Allowed — known path, wrong method.
    MethodNotAllowed,
    /// 413 Payload Too Large.
    PayloadTooLarge(String),
    /// 500 Internal Server Error — details logged, not exposed.
    Internal(String),
    /// 503 Service Unavailable — the indexing backend rejected or missed the write.
    ServiceUnavailable(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::NotFound => (StatusCode::NOT_FOUND, "not found".to_owned()),
            Self::MethodNotAllowed => (StatusCode::METHOD_NOT_ALLOWED, "method not allowed".to_owned()),
            Self::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
            Self::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_owned())
            },
            Self::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
        };
        let body = serde_json::json!({"error": message});
        (status, Json(body)).into_response()
    }
}

impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::TooLarge { .. } => Self::PayloadTooLarge(err.to_string()),
            // Backend detail is already logged by the gateway.
            IngestError::Backend(_) => Self::ServiceUnavailable("indexing failed".to_owned()),
            IngestError::EmptyBody
            | IngestError::ReadBody(_)
            | IngestError::TooDeep { .. }
            | IngestError::InvalidJson(_)
            | IngestError::MissingKind => Self::BadRequest(err.to_string()),
        }
    }
}
