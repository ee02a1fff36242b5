//! HTTP ingest server for hooks-store.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(unreachable_pub, reason = "pub items are re-exported")]
#![allow(clippy::missing_docs_in_private_items, reason = "Internal crate")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::min_ident_chars, reason = "Short closure params are idiomatic")]
#![allow(clippy::exhaustive_structs, reason = "HTTP types are stable")]

pub mod api_error;
mod error;
mod gateway;
mod handlers;
mod observer;
mod stats;
#[cfg(test)]
mod tests;
mod validation;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use hooks_store_core::MAX_BODY_LEN;
use tower_http::trace::TraceLayer;

pub use error::IngestError;
pub use gateway::{IngestAccepted, IngestGateway};
pub use observer::{IngestEvent, IngestObserver};
pub use stats::{IngestStats, StatsSnapshot};
pub use validation::check_json_depth;

/// Build the router: `POST /ingest`, `GET /health`, `GET /stats`.
///
/// Wrong methods get a JSON 405 and unknown paths a JSON 404.
pub fn create_router(gateway: Arc<IngestGateway>) -> Router {
    Router::new()
        .route("/ingest", post(handlers::ingest::ingest).fallback(handlers::method_not_allowed))
        .route("/health", get(handlers::status::health).fallback(handlers::method_not_allowed))
        .route("/stats", get(handlers::status::stats).fallback(handlers::method_not_allowed))
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_LEN))
        .layer(TraceLayer::new_for_http())
        .with_state(gateway)
}
