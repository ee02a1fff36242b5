//! Gateway rejection reasons.

use axum::http::StatusCode;
use hooks_store_storage::StorageError;
use thiserror::Error;

/// Why a submission was not accepted. Every variant is counted as an error.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("body too large (limit {limit} bytes)")]
    TooLarge { limit: usize },

    #[error("empty body")]
    EmptyBody,

    #[error("failed to read body: {0}")]
    ReadBody(String),

    #[error("JSON nesting exceeds maximum depth of {max_depth}")]
    TooDeep { max_depth: usize },

    #[error("invalid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("missing hook_type")]
    MissingKind,

    #[error("indexing failed: {0}")]
    Backend(#[source] StorageError),
}

impl IngestError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Backend(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::EmptyBody
            | Self::ReadBody(_)
            | Self::TooDeep { .. }
            | Self::InvalidJson(_)
            | Self::MissingKind => StatusCode::BAD_REQUEST,
        }
    }

    /// Whether the caller sent something unacceptable, as opposed to the
    /// backend failing.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        !matches!(self, Self::Backend(_))
    }
}
