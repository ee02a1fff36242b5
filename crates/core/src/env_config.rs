//! Tuning knobs read from the environment.
//!
//! Values that are unset fall back silently; values that are set but do not
//! parse fall back with a warning so a typo never goes unnoticed.

use std::fmt::Display;
use std::str::FromStr;

/// Parse an environment variable, falling back to `default`.
///
/// Empty values count as unset.
pub fn env_parse_with_default<T: FromStr + Display>(var: &str, default: T) -> T {
    let Ok(raw) = std::env::var(var) else {
        return default;
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return default;
    }
    match raw.parse() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!(
                var,
                value = %raw,
                default = %default,
                "invalid env var value, using default"
            );
            default
        },
    }
}
