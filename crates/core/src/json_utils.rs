//! Typed lookups into untyped JSON trees.
//!
//! Every accessor returns `None` on a missing key or a type mismatch instead
//! of failing, which is what the first-match-wins extraction rules rely on.

use serde_json::{Map, Value};

/// Walk `path` through nested objects starting at `value`.
///
/// An empty path returns `value` itself.
#[must_use]
pub fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, key| current.as_object()?.get(*key))
}

/// String at `path`, if present and a string.
#[must_use]
pub fn extract_str<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    lookup(value, path)?.as_str()
}

/// Boolean at `path`, if present and a boolean.
#[must_use]
pub fn extract_bool(value: &Value, path: &[&str]) -> Option<bool> {
    lookup(value, path)?.as_bool()
}

/// Number at `path` as `f64`, if present and numeric.
#[must_use]
pub fn extract_f64(value: &Value, path: &[&str]) -> Option<f64> {
    lookup(value, path)?.as_f64()
}

/// Object at `path`, if present and an object.
#[must_use]
pub fn extract_object<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Map<String, Value>> {
    lookup(value, path)?.as_object()
}

/// First non-zero number found along `paths`, tried in order.
///
/// A zero is indistinguishable from an absent value here: a `0` at an earlier
/// path lets a later path win.
#[must_use]
pub fn first_nonzero_f64(value: &Value, paths: &[&[&str]]) -> Option<f64> {
    paths
        .iter()
        .filter_map(|path| extract_f64(value, path))
        .find(|n| *n != 0.0)
}

/// Concatenate every non-empty string leaf of `value`, separated by spaces.
///
/// Object keys never contribute. Object values are visited in key order so
/// the output does not depend on map insertion order. Numbers, booleans and
/// nulls are skipped.
#[must_use]
pub fn flatten_string_values(value: &Value) -> String {
    let mut parts = Vec::new();
    collect_strings(value, &mut parts);
    parts.join(" ")
}

fn collect_strings<'a>(value: &'a Value, out: &mut Vec<&'a str>) {
    match value {
        Value::String(s) if !s.is_empty() => out.push(s),
        Value::Array(items) => {
            for item in items {
                collect_strings(item, out);
            }
        },
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort_unstable();
            for key in keys {
                if let Some(child) = map.get(key) {
                    collect_strings(child, out);
                }
            }
        },
        _ => {},
    }
}
