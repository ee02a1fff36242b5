//! Shared constants for hooks-store.
//!
//! Centralizes limits and names used by the gateway, the store and the
//! migration passes.

/// Maximum accepted request body, in bytes (1 MiB, matches the monitor's limit).
pub const MAX_BODY_LEN: usize = 1 << 20;

/// Maximum JSON nesting depth accepted by the ingest gateway.
pub const MAX_JSON_DEPTH: usize = 100;

/// Hook kind that carries a user-submitted prompt.
pub const PROMPT_HOOK_TYPE: &str = "UserPromptSubmit";

/// Primary key of every index managed by hooks-store.
pub const PRIMARY_KEY: &str = "id";

/// Default primary index name.
pub const DEFAULT_EVENTS_INDEX: &str = "hook-events";

/// Default prompts index name.
pub const DEFAULT_PROMPTS_INDEX: &str = "hook-prompts";

/// Default page size for migration passes.
pub const DEFAULT_MIGRATION_BATCH_SIZE: usize = 1000;

/// Textual timestamp layout stored in documents (UTC, millisecond precision).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Epoch seconds of `0001-01-01T00:00:00Z`, used when an event carries no timestamp.
pub const ZERO_TIMESTAMP_UNIX: i64 = -62_135_596_800;

/// Default buffer of the live ingest feed before notifications are dropped.
pub const DEFAULT_OBSERVER_CAPACITY: usize = 256;
