//! Index settings for the events and prompts indexes.
//!
//! Applied once at startup; Meilisearch merges settings, so reapplying them is
//! harmless. Filterable attributes must be active before a backfill issues
//! filtered reads, which is why each update is awaited.

use serde_json::{json, Value};

const MAX_TOTAL_HITS: u64 = 10_000;
const MAX_VALUES_PER_FACET: u64 = 500;

/// Searchable / filterable / sortable declarations for one index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSettings {
    pub searchable: &'static [&'static str],
    pub filterable: &'static [&'static str],
    pub sortable: &'static [&'static str],
}

impl IndexSettings {
    /// Settings for the primary events index.
    #[must_use]
    pub const fn events() -> Self {
        Self {
            searchable: &["hook_type", "tool_name", "session_id", "prompt", "error_message", "data_flat"],
            filterable: &[
                "hook_type",
                "session_id",
                "tool_name",
                "timestamp_unix",
                "has_claude_md",
                "cost_usd",
                "project_dir",
                "permission_mode",
                "file_path",
                "cwd",
            ],
            sortable: &["timestamp_unix", "cost_usd", "input_tokens", "output_tokens"],
        }
    }

    /// Settings for the prompts index. No `data_flat` noise in search.
    #[must_use]
    pub const fn prompts() -> Self {
        Self {
            searchable: &["prompt", "session_id"],
            filterable: &[
                "session_id",
                "timestamp_unix",
                "project_dir",
                "permission_mode",
                "has_claude_md",
                "cwd",
                "prompt_length",
            ],
            sortable: &["timestamp_unix", "prompt_length"],
        }
    }

    /// One partial settings body per concern, applied and awaited in order.
    #[must_use]
    pub fn updates(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("searchable attributes", json!({ "searchableAttributes": self.searchable })),
            ("filterable attributes", json!({ "filterableAttributes": self.filterable })),
            ("sortable attributes", json!({ "sortableAttributes": self.sortable })),
            ("pagination", json!({ "pagination": { "maxTotalHits": MAX_TOTAL_HITS } })),
            ("faceting", json!({ "faceting": { "maxValuesPerFacet": MAX_VALUES_PER_FACET } })),
        ]
    }
}
