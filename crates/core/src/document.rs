//! Indexed document shapes.
//!
//! Field names are the Meilisearch attribute names; searchable, filterable and
//! sortable settings in the storage crate refer to them verbatim.

use serde::{Deserialize, Serialize};

/// Search-ready representation of one hook event.
///
/// Optional scalars are omitted from the JSON when empty or zero so they do not
/// show up as meaningless facet values. `data` is the original payload and is
/// never rewritten after creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    #[serde(rename = "hook_type")]
    pub kind: String,
    pub timestamp: String,
    pub timestamp_unix: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub session_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tool_name: String,
    #[serde(default)]
    pub has_claude_md: bool,
    #[serde(default, skip_serializing_if = "is_zero_i64")]
    pub input_tokens: i64,
    #[serde(default, skip_serializing_if = "is_zero_i64")]
    pub output_tokens: i64,
    #[serde(default, skip_serializing_if = "is_zero_i64")]
    pub cache_read_tokens: i64,
    #[serde(default, skip_serializing_if = "is_zero_i64")]
    pub cache_creation_tokens: i64,
    #[serde(default, skip_serializing_if = "is_zero_f64")]
    pub cost_usd: f64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub prompt: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub file_path: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error_message: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub project_dir: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub permission_mode: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cwd: String,
    #[serde(default)]
    pub data_flat: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl Document {
    /// Whether this document records a user-submitted prompt.
    #[must_use]
    pub fn is_prompt(&self) -> bool {
        crate::is_prompt_kind(&self.kind)
    }

    /// Project this document into the prompts index shape.
    ///
    /// Uses the fields already extracted on this document; `data` is not read.
    #[must_use]
    pub fn to_prompt_document(&self) -> PromptDocument {
        PromptDocument {
            id: self.id.clone(),
            kind: self.kind.clone(),
            timestamp: self.timestamp.clone(),
            timestamp_unix: self.timestamp_unix,
            session_id: self.session_id.clone(),
            prompt: self.prompt.clone(),
            prompt_length: self.prompt.len(),
            cwd: self.cwd.clone(),
            project_dir: self.project_dir.clone(),
            permission_mode: self.permission_mode.clone(),
            has_claude_md: self.has_claude_md,
        }
    }
}

/// Prompt-only projection stored in the dedicated prompts index.
///
/// Shares its `id` with the originating [`Document`]. Disposable: it can be
/// rebuilt from the primary index at any time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptDocument {
    pub id: String,
    #[serde(rename = "hook_type")]
    pub kind: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub timestamp_unix: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub session_id: String,
    #[serde(default)]
    pub prompt: String,
    /// Length of `prompt` in UTF-8 bytes.
    #[serde(default)]
    pub prompt_length: usize,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cwd: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub project_dir: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub permission_mode: String,
    #[serde(default)]
    pub has_claude_md: bool,
}

const fn is_zero_i64(n: &i64) -> bool {
    *n == 0
}

fn is_zero_f64(n: &f64) -> bool {
    *n == 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Document {
        Document {
            id: "doc-1".to_owned(),
            kind: "UserPromptSubmit".to_owned(),
            timestamp: "2026-02-25T14:30:00.000Z".to_owned(),
            timestamp_unix: 1_772_029_800,
            session_id: "sess-1".to_owned(),
            prompt: "héllo".to_owned(),
            cwd: "/work".to_owned(),
            has_claude_md: true,
            data: json!({"prompt": "héllo"}),
            ..Document::default()
        }
    }

    #[test]
    fn test_omits_empty_optionals() {
        let doc = Document { id: "x".to_owned(), kind: "Stop".to_owned(), ..Document::default() };
        let v = serde_json::to_value(&doc).unwrap();
        let obj = v.as_object().unwrap();
        assert_eq!(obj["hook_type"], "Stop");
        assert!(obj.contains_key("has_claude_md"));
        assert!(obj.contains_key("data_flat"));
        assert!(obj.contains_key("data"));
        for absent in [
            "session_id",
            "tool_name",
            "input_tokens",
            "output_tokens",
            "cache_read_tokens",
            "cache_creation_tokens",
            "cost_usd",
            "prompt",
            "file_path",
            "error_message",
            "project_dir",
            "permission_mode",
            "cwd",
        ] {
            assert!(!obj.contains_key(absent), "{absent} should be omitted");
        }
    }

    #[test]
    fn test_prompt_projection() {
        let doc = sample();
        let prompt = doc.to_prompt_document();
        assert_eq!(prompt.id, doc.id);
        assert_eq!(prompt.kind, "UserPromptSubmit");
        assert_eq!(prompt.prompt, "héllo");
        assert_eq!(prompt.prompt_length, 6);
        assert_eq!(prompt.cwd, "/work");
        assert!(prompt.has_claude_md);
        assert!(doc.is_prompt());
    }

    #[test]
    fn test_prompt_document_from_hit() {
        let hit = json!({
            "id": "p-1",
            "hook_type": "UserPromptSubmit",
            "timestamp_unix": 10,
            "prompt": "fix the tests"
        });
        let prompt: PromptDocument = serde_json::from_value(hit).unwrap();
        assert_eq!(prompt.id, "p-1");
        assert_eq!(prompt.prompt, "fix the tests");
        assert!(prompt.session_id.is_empty());
    }
}
