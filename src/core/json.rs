//! JSON auto-decode step
//!
//! Form submissions often carry whole objects or arrays as JSON text, sometimes
//! with their quotes backslash-escaped by the transport. When the
//! [`Flag::ExpectJson`](crate::core::flags::Flag::ExpectJson) flag is active the
//! engine passes every value through [`maybe_decode_json`] before filtering it.

use serde_json::Value;
use std::borrow::Cow;

/// Replace a JSON-encoded string by the structure it encodes
///
/// Only object and array documents are considered: the trimmed text must start
/// with `{` or `[` and end with `}` or `]`. If the text does not parse as is,
/// a second attempt is made after removing backslash escapes. Anything that
/// still fails to parse is returned unchanged.
pub fn maybe_decode_json(value: &Value) -> Cow<'_, Value> {
    let Value::String(text) = value else {
        return Cow::Borrowed(value);
    };

    match decode_document(text) {
        Some(decoded) => {
            tracing::debug!(len = text.len(), "decoded JSON-encoded string");
            Cow::Owned(decoded)
        }
        None => Cow::Borrowed(value),
    }
}

fn decode_document(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if !looks_like_document(trimmed) {
        return None;
    }

    if let Ok(decoded) = serde_json::from_str::<Value>(trimmed) {
        return Some(decoded);
    }

    let unescaped = strip_slashes(trimmed);
    if unescaped == trimmed {
        return None;
    }
    serde_json::from_str::<Value>(&unescaped).ok()
}

fn looks_like_document(text: &str) -> bool {
    text.len() >= 2
        && (text.starts_with('{') || text.starts_with('['))
        && (text.ends_with('}') || text.ends_with(']'))
}

/// Remove one level of backslash escaping (`\"` → `"`, `\\` → `\`)
pub(crate) fn strip_slashes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}
