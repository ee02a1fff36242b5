//! Storage port traits
//!
//! The ingest path only needs [`EventStore`]; the migration passes need
//! [`BackfillStore`]. Both are async so the Meilisearch adapter can share one
//! HTTP client between concurrent requests and a running backfill.

use async_trait::async_trait;
use hooks_store_core::{Document, PromptDocument};
use serde_json::{Map, Value};

use crate::error::StorageError;

/// Write side of the pipeline. Implementations must be safe for concurrent use.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Persist one document (and its prompt projection where applicable).
    ///
    /// Returns once the backend has accepted the write, not once it is
    /// searchable. Fails only when the primary write is rejected.
    async fn index(&self, doc: &Document) -> Result<(), StorageError>;

    /// Release held resources. Idempotent.
    async fn close(&self) -> Result<(), StorageError>;
}

/// One page of stored documents as raw JSON objects.
#[derive(Debug, Clone, Default)]
pub struct DocumentPage {
    pub results: Vec<Map<String, Value>>,
    /// Total number of documents in the index when the page was read.
    pub total: usize,
}

/// Read-back and bulk-write operations used by the migration passes.
///
/// Every write method waits for the backend to finish applying the batch, so
/// callers can rely on at most one batch being in flight.
#[async_trait]
pub trait BackfillStore: Send + Sync {
    /// Fetch `limit` primary documents starting at `offset`, restricted to `fields`.
    async fn fetch_documents(
        &self,
        offset: usize,
        limit: usize,
        fields: &[&str],
    ) -> Result<DocumentPage, StorageError>;

    /// Merge partial documents into the primary index by `id`.
    ///
    /// Fields absent from a partial are left untouched on the stored record.
    async fn merge_documents(&self, partials: &[Map<String, Value>]) -> Result<(), StorageError>;

    /// Whether a prompts index is configured.
    fn prompts_enabled(&self) -> bool;

    /// Add or replace prompt documents in the prompts index.
    async fn put_prompt_documents(&self, prompts: &[PromptDocument]) -> Result<(), StorageError>;
}
