//! Backfill passes over already-indexed documents.
//!
//! Each pass pages through the events index in offset order, recomputes
//! derived fields from the stored `data` payload and writes them back as
//! partial merges. A page's write is confirmed before the next page is read.
//! Passes are idempotent, so an interrupted run is resumed by starting over.

use hooks_store_core::json_utils::flatten_string_values;
use hooks_store_core::{extract_fields, is_prompt_kind, PromptDocument};
use serde_json::{Map, Value};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::error::StorageError;
use crate::traits::BackfillStore;

const SOURCE_FIELDS: &[&str] = &["id", "data"];
const PROMPT_FIELDS: &[&str] = &[
    "id",
    "hook_type",
    "timestamp",
    "timestamp_unix",
    "session_id",
    "prompt",
    "cwd",
    "project_dir",
    "permission_mode",
    "has_claude_md",
];

/// A backfill run that stopped early. Always carries the progress made so far.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("{pass} cancelled after {processed} documents")]
    Cancelled { pass: &'static str, processed: usize },

    #[error("{pass} failed at offset {offset} after {processed} documents: {source}")]
    Storage {
        pass: &'static str,
        processed: usize,
        offset: usize,
        #[source]
        source: StorageError,
    },
}

impl MigrationError {
    /// Documents processed before the run stopped.
    #[must_use]
    pub const fn processed(&self) -> usize {
        match self {
            Self::Cancelled { processed, .. } | Self::Storage { processed, .. } => *processed,
        }
    }

    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    Fields,
    DataFlat,
    Prompts,
}

impl Pass {
    const fn name(self) -> &'static str {
        match self {
            Self::Fields => "field backfill",
            Self::DataFlat => "data_flat backfill",
            Self::Prompts => "prompts backfill",
        }
    }

    const fn fields(self) -> &'static [&'static str] {
        match self {
            Self::Fields | Self::DataFlat => SOURCE_FIELDS,
            Self::Prompts => PROMPT_FIELDS,
        }
    }
}

/// Runs backfill passes against a [`BackfillStore`].
pub struct Migrator<'a, S: BackfillStore + ?Sized> {
    store: &'a S,
    batch_size: usize,
    cancel: CancellationToken,
}

impl<'a, S: BackfillStore + ?Sized> Migrator<'a, S> {
    /// A zero `batch_size` is bumped to 1.
    pub fn new(store: &'a S, batch_size: usize, cancel: CancellationToken) -> Self {
        Self { store, batch_size: batch_size.max(1), cancel }
    }

    /// Recompute extracted scalar fields for every stored document.
    ///
    /// Returns the number of documents scanned, including those left untouched
    /// because nothing could be extracted from their payload.
    pub async fn backfill_fields(&self) -> Result<usize, MigrationError> {
        self.run(Pass::Fields).await
    }

    /// Rewrite `data_flat` with values-only flattening for every stored document.
    pub async fn backfill_data_flat(&self) -> Result<usize, MigrationError> {
        self.run(Pass::DataFlat).await
    }

    /// Rebuild the prompts index from prompt documents in the events index.
    ///
    /// Reads the fields written by [`Self::backfill_fields`], so run that first.
    /// Returns the number of prompt documents written; a disabled prompts index
    /// returns 0 without reading anything.
    pub async fn backfill_prompts(&self) -> Result<usize, MigrationError> {
        if !self.store.prompts_enabled() {
            tracing::info!("prompts index disabled, skipping prompts backfill");
            return Ok(0);
        }
        self.run(Pass::Prompts).await
    }

    async fn run(&self, pass: Pass) -> Result<usize, MigrationError> {
        let mut offset = 0usize;
        let mut processed = 0usize;

        loop {
            if self.cancel.is_cancelled() {
                return Err(MigrationError::Cancelled { pass: pass.name(), processed });
            }

            let storage_err = |source| MigrationError::Storage {
                pass: pass.name(),
                processed,
                offset,
                source,
            };

            let page = self
                .store
                .fetch_documents(offset, self.batch_size, pass.fields())
                .await
                .map_err(storage_err)?;
            let fetched = page.results.len();
            if fetched == 0 {
                break;
            }

            let written = match pass {
                Pass::Fields => {
                    self.store.merge_documents(&field_updates(&page.results)).await.map_err(storage_err)?;
                    fetched
                },
                Pass::DataFlat => {
                    self.store.merge_documents(&data_flat_updates(&page.results)).await.map_err(storage_err)?;
                    fetched
                },
                Pass::Prompts => {
                    let prompts = prompt_documents(&page.results);
                    self.store.put_prompt_documents(&prompts).await.map_err(storage_err)?;
                    prompts.len()
                },
            };

            processed = processed.saturating_add(written);
            offset = offset.saturating_add(fetched);
            tracing::info!(
                pass = pass.name(),
                processed,
                scanned = offset,
                total = page.total,
                "backfill progress"
            );

            if fetched < self.batch_size || offset >= page.total {
                break;
            }
        }

        tracing::info!(pass = pass.name(), processed, "backfill complete");
        Ok(processed)
    }
}

fn hit_id(hit: &Map<String, Value>) -> Option<&str> {
    hit.get("id").and_then(Value::as_str)
}

/// Partial updates carrying only freshly extracted fields. Hits without an id
/// or without anything extractable are skipped.
fn field_updates(hits: &[Map<String, Value>]) -> Vec<Map<String, Value>> {
    hits.iter()
        .filter_map(|hit| {
            let id = hit_id(hit)?;
            let fields = extract_fields(hit.get("data").unwrap_or(&Value::Null));
            (!fields.is_empty()).then(|| fields.to_partial(id))
        })
        .collect()
}

fn data_flat_updates(hits: &[Map<String, Value>]) -> Vec<Map<String, Value>> {
    hits.iter()
        .filter_map(|hit| {
            let id = hit_id(hit)?;
            let flat = flatten_string_values(hit.get("data").unwrap_or(&Value::Null));
            let mut partial = Map::new();
            partial.insert("id".to_owned(), Value::from(id));
            partial.insert("data_flat".to_owned(), Value::from(flat));
            Some(partial)
        })
        .collect()
}

fn prompt_documents(hits: &[Map<String, Value>]) -> Vec<PromptDocument> {
    hits.iter()
        .filter(|hit| hit.get("hook_type").and_then(Value::as_str).is_some_and(is_prompt_kind))
        .filter_map(|hit| {
            match serde_json::from_value::<PromptDocument>(Value::Object(hit.clone())) {
                Ok(mut prompt) => {
                    prompt.prompt_length = prompt.prompt.len();
                    Some(prompt)
                },
                Err(e) => {
                    tracing::debug!(id = ?hit_id(hit), error = %e, "skipping malformed prompt document");
                    None
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hit(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn field_updates_skip_empty_and_idless() {
        let hits = vec![
            hit(json!({"id": "a", "data": {"cwd": "/w", "tool_input": {"file_path": "/w/x.rs"}}})),
            hit(json!({"id": "b", "data": {"nothing": "here"}})),
            hit(json!({"data": {"cwd": "/orphan"}})),
            hit(json!({"id": "c"})),
        ];
        let updates = field_updates(&hits);
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0]["id"], "a");
        assert_eq!(updates[0]["file_path"], "/w/x.rs");
        assert!(!updates[0].contains_key("data"));
    }

    #[test]
    fn data_flat_updates_cover_every_id() {
        let hits = vec![
            hit(json!({"id": "a", "data": {"b": "two", "a": "one"}})),
            hit(json!({"id": "b"})),
        ];
        let updates = data_flat_updates(&hits);
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0]["data_flat"], "one two");
        assert_eq!(updates[1]["data_flat"], "");
    }

    #[test]
    fn prompt_documents_filter_kind() {
        let hits = vec![
            hit(json!({"id": "p", "hook_type": "UserPromptSubmit", "prompt": "añadir", "session_id": "s"})),
            hit(json!({"id": "q", "hook_type": "PreToolUse", "prompt": "ignored"})),
            hit(json!({"id": "r"})),
        ];
        let prompts = prompt_documents(&hits);
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].id, "p");
        assert_eq!(prompts[0].prompt_length, 7);
        assert_eq!(prompts[0].session_id, "s");
    }
}
