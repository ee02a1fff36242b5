#![allow(clippy::single_call_fn, reason = "HTTP handlers are called once from router")]

pub mod ingest;
pub mod status;

use crate::api_error::ApiError;

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
