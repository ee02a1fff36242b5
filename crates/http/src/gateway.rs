//! Validation, transform and storage of one submission.
//!
//! Transport-independent: the axum handlers only move bytes in and map the
//! outcome to a status code.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use hooks_store_core::{hook_event_to_document, HookEvent, MAX_BODY_LEN, MAX_JSON_DEPTH};
use hooks_store_storage::EventStore;

use crate::error::IngestError;
use crate::observer::{IngestEvent, IngestObserver};
use crate::stats::{IngestStats, StatsSnapshot};
use crate::validation::check_json_depth;

/// Successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestAccepted {
    pub id: String,
}

/// Shared by every request; all state is atomic.
pub struct IngestGateway {
    store: Arc<dyn EventStore>,
    stats: IngestStats,
    observer: Option<IngestObserver>,
}

impl std::fmt::Debug for IngestGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestGateway")
            .field("stats", &self.stats)
            .field("observer", &self.observer)
            .finish_non_exhaustive()
    }
}

impl IngestGateway {
    #[must_use]
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store, stats: IngestStats::new(), observer: None }
    }

    /// Attach a live feed notified after every successful write.
    #[must_use]
    pub fn with_observer(mut self, observer: IngestObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Validate, transform and store one raw request body.
    ///
    /// Checks run cheapest first: size, emptiness, nesting depth, then the
    /// full decode. Nothing is transformed or written unless all pass.
    pub async fn submit(&self, body: &[u8]) -> Result<IngestAccepted, IngestError> {
        match self.accept(body).await {
            Ok(accepted) => Ok(accepted),
            Err(e) => Err(self.reject(e)),
        }
    }

    /// Count a rejection that happened before the body reached [`Self::submit`]
    /// (for example while the transport was still reading it).
    pub fn reject(&self, err: IngestError) -> IngestError {
        self.stats.record_error();
        if err.is_client_error() {
            tracing::debug!(error = %err, "ingest rejected");
        } else {
            tracing::warn!(error = %err, "ingest failed");
        }
        err
    }

    async fn accept(&self, body: &[u8]) -> Result<IngestAccepted, IngestError> {
        if body.len() > MAX_BODY_LEN {
            return Err(IngestError::TooLarge { limit: MAX_BODY_LEN });
        }
        if body.is_empty() {
            return Err(IngestError::EmptyBody);
        }
        check_json_depth(body, MAX_JSON_DEPTH)?;

        let evt: HookEvent = serde_json::from_slice(body).map_err(IngestError::InvalidJson)?;
        if evt.kind.is_empty() {
            return Err(IngestError::MissingKind);
        }

        let doc = hook_event_to_document(&evt);
        self.store.index(&doc).await.map_err(IngestError::Backend)?;
        self.stats.record_success(Utc::now());
        tracing::debug!(id = %doc.id, hook_type = %doc.kind, "event indexed");

        if let Some(observer) = &self.observer {
            observer.notify(IngestEvent::from_hook_event(&evt, body.len()));
        }

        Ok(IngestAccepted { id: doc.id })
    }

    /// Liveness only; never touches the backend.
    #[must_use]
    pub fn health(&self) -> DateTime<Utc> {
        Utc::now()
    }

    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Live-feed notifications dropped so far; 0 without an observer.
    #[must_use]
    pub fn dropped_notifications(&self) -> u64 {
        self.observer.as_ref().map_or(0, IngestObserver::dropped)
    }
}
