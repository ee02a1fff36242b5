//! Lexical pre-scan of request bodies.
//!
//! Runs before any full decode so a hostile payload of deeply nested
//! brackets is rejected without building a value tree for it.

use crate::error::IngestError;

/// Reject `body` if its bracket nesting exceeds `max_depth`.
///
/// Brackets inside string literals (including escaped quotes) are ignored.
/// Malformed JSON is not reported here; the decoder handles that.
pub fn check_json_depth(body: &[u8], max_depth: usize) -> Result<(), IngestError> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for &byte in body {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                if depth > max_depth {
                    return Err(IngestError::TooDeep { max_depth });
                }
            },
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {},
        }
    }
    Ok(())
}
