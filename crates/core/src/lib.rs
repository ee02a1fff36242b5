//! Core types for hooks-store
//!
//! Wire event model, indexed document shapes, and the transform rules that
//! turn one into the other. Shared by the storage, HTTP and CLI crates.

pub mod constants;
mod document;
mod env_config;
mod hook;
pub mod json_utils;
mod transform;

pub use constants::*;
pub use document::{Document, PromptDocument};
pub use env_config::env_parse_with_default;
pub use hook::{is_prompt_kind, HookEvent};
pub use transform::{
    extract_fields, format_timestamp, hook_event_to_document, ExtractedFields,
};
