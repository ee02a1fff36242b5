//! Typed error enum for the storage layer.
//!
//! Callers can tell an unreachable backend from a rejected write or a failed
//! asynchronous task instead of downcasting opaque boxes.

use thiserror::Error;

/// Storage-layer error covering every expected failure mode of the backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Health check failed or the backend could not be contacted at all.
    #[error("backend at {endpoint} is not healthy: {reason}")]
    Unhealthy { endpoint: String, reason: String },

    /// Transport-level failure (connect, timeout, TLS, body read).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("{context}: HTTP status {code}: {body}")]
    Status { context: String, code: u16, body: String },

    /// An enqueued task reached the `failed` state.
    #[error("{context} task {task_uid} failed: {message}")]
    TaskFailed { context: String, task_uid: u64, message: String },

    /// An enqueued task did not reach a terminal state in time.
    #[error("{context} task {task_uid} did not finish within {waited_secs}s")]
    TaskTimeout { context: String, task_uid: u64, waited_secs: u64 },

    /// Payload could not be serialized or a response could not be decoded.
    #[error("JSON error in {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Client could not be constructed.
    #[error("client initialization failed: {0}")]
    ClientInit(String),
}

impl StorageError {
    /// Whether the error came from the backend being unreachable or unhealthy,
    /// as opposed to the backend rejecting a specific request.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        match self {
            Self::Unhealthy { .. } => true,
            Self::Http(err) => err.is_connect() || err.is_timeout(),
            Self::Status { code, .. } => matches!(code, 502..=504),
            _ => false,
        }
    }
}
