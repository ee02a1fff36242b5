//! Hook event → document transform.
//!
//! Extraction is a pure function of the event payload. The only
//! non-deterministic input is the generated document id.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::constants::{TIMESTAMP_FORMAT, ZERO_TIMESTAMP_UNIX};
use crate::json_utils::{extract_bool, extract_str, first_nonzero_f64, flatten_string_values};
use crate::{Document, HookEvent};

const INPUT_TOKEN_PATHS: &[&[&str]] = &[
    &["input_tokens"],
    &["usage", "input_tokens"],
    &["stop_hook_data", "usage", "input_tokens"],
];
const OUTPUT_TOKEN_PATHS: &[&[&str]] = &[
    &["output_tokens"],
    &["usage", "output_tokens"],
    &["stop_hook_data", "usage", "output_tokens"],
];
const CACHE_READ_TOKEN_PATHS: &[&[&str]] =
    &[&["cache_read_input_tokens"], &["usage", "cache_read_input_tokens"]];
const CACHE_CREATION_TOKEN_PATHS: &[&[&str]] =
    &[&["cache_creation_input_tokens"], &["usage", "cache_creation_input_tokens"]];
const COST_PATHS: &[&[&str]] = &[&["total_cost_usd"], &["stop_hook_data", "total_cost_usd"]];

/// Scalar fields derived from an event payload.
///
/// `None` means no source path matched. Numeric fields treat zero as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedFields {
    pub session_id: Option<String>,
    pub tool_name: Option<String>,
    pub prompt: Option<String>,
    pub file_path: Option<String>,
    pub error_message: Option<String>,
    pub permission_mode: Option<String>,
    pub cwd: Option<String>,
    pub project_dir: Option<String>,
    pub has_claude_md: Option<bool>,
    pub input_tokens: Option<i64>,
    pub output_tokens: Option<i64>,
    pub cache_read_tokens: Option<i64>,
    pub cache_creation_tokens: Option<i64>,
    pub cost_usd: Option<f64>,
}

impl ExtractedFields {
    /// Whether no field was extracted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Copy the extracted values onto `doc`, leaving unmatched fields untouched.
    pub fn apply_to(self, doc: &mut Document) {
        if let Some(v) = self.session_id {
            doc.session_id = v;
        }
        if let Some(v) = self.tool_name {
            doc.tool_name = v;
        }
        if let Some(v) = self.prompt {
            doc.prompt = v;
        }
        if let Some(v) = self.file_path {
            doc.file_path = v;
        }
        if let Some(v) = self.error_message {
            doc.error_message = v;
        }
        if let Some(v) = self.permission_mode {
            doc.permission_mode = v;
        }
        if let Some(v) = self.cwd {
            doc.cwd = v;
        }
        if let Some(v) = self.project_dir {
            doc.project_dir = v;
        }
        if let Some(v) = self.has_claude_md {
            doc.has_claude_md = v;
        }
        if let Some(v) = self.input_tokens {
            doc.input_tokens = v;
        }
        if let Some(v) = self.output_tokens {
            doc.output_tokens = v;
        }
        if let Some(v) = self.cache_read_tokens {
            doc.cache_read_tokens = v;
        }
        if let Some(v) = self.cache_creation_tokens {
            doc.cache_creation_tokens = v;
        }
        if let Some(v) = self.cost_usd {
            doc.cost_usd = v;
        }
    }

    /// Render the extracted values as a partial document keyed by `id`.
    ///
    /// Only matched fields appear, so a merge write with this map never
    /// clobbers anything else on the stored record.
    #[must_use]
    pub fn to_partial(&self, id: &str) -> Map<String, Value> {
        let mut partial = Map::new();
        partial.insert("id".to_owned(), Value::from(id));
        let strings = [
            ("session_id", &self.session_id),
            ("tool_name", &self.tool_name),
            ("prompt", &self.prompt),
            ("file_path", &self.file_path),
            ("error_message", &self.error_message),
            ("permission_mode", &self.permission_mode),
            ("cwd", &self.cwd),
            ("project_dir", &self.project_dir),
        ];
        for (key, value) in strings {
            if let Some(v) = value {
                partial.insert(key.to_owned(), Value::from(v.as_str()));
            }
        }
        if let Some(v) = self.has_claude_md {
            partial.insert("has_claude_md".to_owned(), Value::from(v));
        }
        let counters = [
            ("input_tokens", self.input_tokens),
            ("output_tokens", self.output_tokens),
            ("cache_read_tokens", self.cache_read_tokens),
            ("cache_creation_tokens", self.cache_creation_tokens),
        ];
        for (key, value) in counters {
            if let Some(v) = value {
                partial.insert(key.to_owned(), Value::from(v));
            }
        }
        if let Some(v) = self.cost_usd {
            partial.insert("cost_usd".to_owned(), Value::from(v));
        }
        partial
    }
}

/// Derive every scalar field from an event payload.
///
/// Never fails: a missing or wrong-typed source leaves the field `None`.
#[must_use]
pub fn extract_fields(data: &Value) -> ExtractedFields {
    ExtractedFields {
        session_id: owned_str(data, &["session_id"]),
        tool_name: owned_str(data, &["tool_name"]),
        prompt: owned_str(data, &["prompt"]),
        file_path: owned_str(data, &["tool_input", "file_path"]),
        error_message: owned_str(data, &["error"]),
        permission_mode: owned_str(data, &["permission_mode"]),
        cwd: owned_str(data, &["cwd"]),
        project_dir: owned_str(data, &["_monitor", "project_dir"]),
        has_claude_md: extract_bool(data, &["_monitor", "has_claude_md"]),
        input_tokens: token_count(data, INPUT_TOKEN_PATHS),
        output_tokens: token_count(data, OUTPUT_TOKEN_PATHS),
        cache_read_tokens: token_count(data, CACHE_READ_TOKEN_PATHS),
        cache_creation_tokens: token_count(data, CACHE_CREATION_TOKEN_PATHS),
        cost_usd: first_nonzero_f64(data, COST_PATHS),
    }
}

fn owned_str(data: &Value, path: &[&str]) -> Option<String> {
    extract_str(data, path).map(ToOwned::to_owned)
}

// JSON numbers arrive as f64; counts are truncated toward zero.
#[allow(clippy::cast_possible_truncation, reason = "token counts fit in i64")]
fn token_count(data: &Value, paths: &[&[&str]]) -> Option<i64> {
    first_nonzero_f64(data, paths).map(|n| n as i64)
}

/// Format an instant the way documents store it: UTC with millisecond precision.
#[must_use]
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

fn zero_timestamp() -> DateTime<Utc> {
    DateTime::from_timestamp(ZERO_TIMESTAMP_UNIX, 0).unwrap_or_default()
}

/// Transform a wire event into a search-ready document with a fresh id.
#[must_use]
pub fn hook_event_to_document(evt: &HookEvent) -> Document {
    let ts = evt.timestamp.unwrap_or_else(zero_timestamp);
    let mut doc = Document {
        id: uuid::Uuid::new_v4().to_string(),
        kind: evt.kind.clone(),
        timestamp: format_timestamp(&ts),
        timestamp_unix: ts.timestamp(),
        data_flat: flatten_string_values(&evt.data),
        data: evt.data.clone(),
        ..Document::default()
    };
    extract_fields(&evt.data).apply_to(&mut doc);
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(kind: &str, data: Value) -> HookEvent {
        let ts = DateTime::parse_from_rfc3339("2026-02-25T14:30:00Z").unwrap().with_timezone(&Utc);
        HookEvent::new(kind, data).with_timestamp(ts)
    }

    #[test]
    fn test_basic_fields() {
        let evt = event("PreToolUse", json!({"tool_name": "Write", "session_id": "sess-abc-123"}));
        let doc = hook_event_to_document(&evt);
        assert!(!doc.id.is_empty());
        assert_eq!(doc.kind, "PreToolUse");
        assert_eq!(doc.tool_name, "Write");
        assert_eq!(doc.session_id, "sess-abc-123");
        assert_eq!(doc.timestamp, "2026-02-25T14:30:00.000Z");
        assert_eq!(doc.timestamp_unix, 1_772_029_800);
        assert_eq!(doc.data, evt.data);
    }

    #[test]
    fn test_timestamp_normalized_to_utc() {
        let ts = DateTime::parse_from_rfc3339("2026-02-25T16:30:00.123456+02:00").unwrap();
        let evt = HookEvent::new("Stop", json!({})).with_timestamp(ts.with_timezone(&Utc));
        let doc = hook_event_to_document(&evt);
        assert_eq!(doc.timestamp, "2026-02-25T14:30:00.123Z");
        assert_eq!(doc.timestamp_unix, 1_772_029_800);
    }

    #[test]
    fn test_missing_timestamp_is_zero_instant() {
        let doc = hook_event_to_document(&HookEvent::new("Stop", json!({})));
        assert_eq!(doc.timestamp, "0001-01-01T00:00:00.000Z");
        assert_eq!(doc.timestamp_unix, ZERO_TIMESTAMP_UNIX);
    }

    #[test]
    fn test_deterministic_modulo_id() {
        let evt = event(
            "PostToolUse",
            json!({"tool_name": "Edit", "tool_input": {"file_path": "/a.rs"}, "usage": {"input_tokens": 5}}),
        );
        let first = hook_event_to_document(&evt);
        let second = hook_event_to_document(&evt);
        assert_ne!(first.id, second.id);
        assert_eq!(Document { id: String::new(), ..first }, Document { id: String::new(), ..second });
    }

    #[test]
    fn test_nested_and_monitor_fields() {
        let evt = event(
            "PostToolUseFailure",
            json!({
                "tool_input": {"file_path": "/src/main.rs"},
                "error": "permission denied",
                "permission_mode": "acceptEdits",
                "cwd": "/work",
                "prompt": "refactor",
                "_monitor": {"project_dir": "/work/proj", "has_claude_md": true}
            }),
        );
        let doc = hook_event_to_document(&evt);
        assert_eq!(doc.file_path, "/src/main.rs");
        assert_eq!(doc.error_message, "permission denied");
        assert_eq!(doc.permission_mode, "acceptEdits");
        assert_eq!(doc.cwd, "/work");
        assert_eq!(doc.prompt, "refactor");
        assert_eq!(doc.project_dir, "/work/proj");
        assert!(doc.has_claude_md);
    }

    #[test]
    fn test_non_string_values_ignored() {
        let evt = event(
            "PreToolUse",
            json!({"tool_name": 42, "session_id": ["x"], "_monitor": {"has_claude_md": "yes"}}),
        );
        let doc = hook_event_to_document(&evt);
        assert!(doc.tool_name.is_empty());
        assert!(doc.session_id.is_empty());
        assert!(!doc.has_claude_md);
    }

    #[test]
    fn test_empty_and_null_data() {
        for data in [json!({}), Value::Null] {
            let doc = hook_event_to_document(&event("SessionStart", data.clone()));
            assert_eq!(doc.data_flat, "");
            assert_eq!(doc.data, data);
            assert!(doc.session_id.is_empty());
        }
    }

    #[test]
    fn test_token_metrics_top_level() {
        let doc = hook_event_to_document(&event(
            "Stop",
            json!({
                "input_tokens": 1500,
                "output_tokens": 500,
                "cache_read_input_tokens": 300,
                "cache_creation_input_tokens": 100,
                "total_cost_usd": 0.05,
                "usage": {"input_tokens": 9999}
            }),
        ));
        assert_eq!(doc.input_tokens, 1500);
        assert_eq!(doc.output_tokens, 500);
        assert_eq!(doc.cache_read_tokens, 300);
        assert_eq!(doc.cache_creation_tokens, 100);
        assert!((doc.cost_usd - 0.05).abs() < f64::EPSILON);
    }

    #[test]
    fn test_token_metrics_nested_usage() {
        let doc = hook_event_to_document(&event(
            "Stop",
            json!({"usage": {"input_tokens": 2000, "output_tokens": 800}, "total_cost_usd": 0.01}),
        ));
        assert_eq!(doc.input_tokens, 2000);
        assert_eq!(doc.output_tokens, 800);
        assert!((doc.cost_usd - 0.01).abs() < f64::EPSILON);
    }

    #[test]
    fn test_token_metrics_stop_hook_data() {
        let doc = hook_event_to_document(&event(
            "Stop",
            json!({"stop_hook_data": {"total_cost_usd": 0.25, "usage": {"input_tokens": 7, "output_tokens": 3}}}),
        ));
        assert_eq!(doc.input_tokens, 7);
        assert_eq!(doc.output_tokens, 3);
        assert!((doc.cost_usd - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_token_metrics_zero_falls_through() {
        let doc = hook_event_to_document(&event(
            "Stop",
            json!({"input_tokens": 0, "usage": {"input_tokens": 42}}),
        ));
        assert_eq!(doc.input_tokens, 42);
    }

    #[test]
    fn test_token_metrics_missing() {
        let fields = extract_fields(&json!({"tool_name": "Read"}));
        assert_eq!(fields.input_tokens, None);
        assert_eq!(fields.cost_usd, None);
        let doc = hook_event_to_document(&event("PreToolUse", json!({"tool_name": "Read"})));
        assert_eq!(doc.input_tokens, 0);
        assert_eq!(doc.cost_usd, 0.0);
    }

    #[test]
    fn test_data_flat_excludes_keys() {
        let data = json!({
            "tool_name": "Bash",
            "tool_input": {"command": "ls -la", "description": "list files"},
            "session_id": "s1"
        });
        let doc = hook_event_to_document(&event("PreToolUse", data));
        let tokens: Vec<&str> = doc.data_flat.split(' ').collect();
        for key in ["tool_name", "tool_input", "command", "description", "session_id"] {
            assert!(!tokens.contains(&key), "key {key} leaked into data_flat");
        }
        for value in ["Bash", "ls -la", "list files", "s1"] {
            assert!(doc.data_flat.contains(value), "value {value} missing");
        }
    }

    #[test]
    fn test_partial_contains_only_matches() {
        let fields = extract_fields(&json!({"cwd": "/w", "_monitor": {"has_claude_md": false}}));
        let partial = fields.to_partial("abc");
        assert_eq!(partial.len(), 3);
        assert_eq!(partial["id"], "abc");
        assert_eq!(partial["cwd"], "/w");
        assert_eq!(partial["has_claude_md"], false);
        assert!(extract_fields(&json!({"unrelated": 1})).is_empty());
    }
}
