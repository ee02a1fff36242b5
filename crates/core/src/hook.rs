//! Hook event wire format
//!
//! The contract between the agent monitor and hooks-store is this JSON shape,
//! not any shared Rust type: `{"kind": "...", "timestamp": "...", "data": {...}}`.
//! Older monitors send `hook_type` instead of `kind`; both are accepted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::PROMPT_HOOK_TYPE;

/// One lifecycle event as received from the monitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookEvent {
    /// Event kind, e.g. `PreToolUse` or `UserPromptSubmit`.
    #[serde(alias = "hook_type", default)]
    pub kind: String,
    /// Instant the monitor observed the event. Absent means the zero instant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Untyped payload, preserved verbatim in the indexed document.
    #[serde(default)]
    pub data: serde_json::Value,
}

impl HookEvent {
    pub fn new(kind: impl Into<String>, data: serde_json::Value) -> Self {
        Self { kind: kind.into(), timestamp: None, data }
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Whether this event carries a user-submitted prompt.
    #[must_use]
    pub fn is_prompt(&self) -> bool {
        is_prompt_kind(&self.kind)
    }
}

/// Whether `kind` denotes a user-submitted prompt.
#[must_use]
pub fn is_prompt_kind(kind: &str) -> bool {
    kind == PROMPT_HOOK_TYPE
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_kind_field() {
        let evt: HookEvent = serde_json::from_str(
            r#"{"kind":"PreToolUse","timestamp":"2026-02-25T14:30:00Z","data":{"tool_name":"Write"}}"#,
        )
        .unwrap();
        assert_eq!(evt.kind, "PreToolUse");
        assert_eq!(evt.timestamp.unwrap().timestamp(), 1_772_029_800);
        assert_eq!(evt.data["tool_name"], "Write");
    }

    #[test]
    fn accepts_legacy_hook_type() {
        let evt: HookEvent =
            serde_json::from_str(r#"{"hook_type":"Stop","data":{}}"#).unwrap();
        assert_eq!(evt.kind, "Stop");
        assert!(evt.timestamp.is_none());
    }

    #[test]
    fn missing_fields_default() {
        let evt: HookEvent = serde_json::from_str("{}").unwrap();
        assert!(evt.kind.is_empty());
        assert!(evt.data.is_null());
    }

    #[test]
    fn prompt_kind() {
        assert!(HookEvent::new("UserPromptSubmit", json!({})).is_prompt());
        assert!(!HookEvent::new("PreToolUse", json!({})).is_prompt());
    }
}
