//! Redaction of secrets from JSON payloads for diagnostic logging.
//!
//! Payloads such as webhook configs and custom settings blobs have no fixed
//! shape, so redaction works on key names at any depth rather than on known
//! field paths. Any key matching [`is_sensitive_key`] has its value replaced
//! with [`REDACTION_MARKER`], whatever the value's type.
//!
//! Output of [`redact_json`] is clipped to a byte budget and is meant for
//! humans only; clipped output is not valid JSON. Payloads nested deeper than
//! [`MAX_DEPTH`] are never serialized; only their size is reported, with a
//! clipped marker.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

/// Replacement written in place of every sensitive value.
pub const REDACTION_MARKER: &str = "[REDACTED]";

/// Deepest nesting of objects and arrays that is echoed at all.
///
/// Matches the recursion limit of `serde_json`'s parser.
pub const MAX_DEPTH: usize = 128;

/// Key names that carry credentials. Matched case-insensitively as substrings,
/// so `X-Api-Key`, `webhookToken` and `smtp_password` all qualify.
static SENSITIVE_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(password|passwd|passphrase|secret|token|authorization|api[_-]?key|private[_-]?key|credential|cookie)",
    )
    .unwrap_or_else(|e| panic!("sensitive key pattern is invalid: {e}"))
});

/// Returns true if values under this key must never be logged.
pub fn is_sensitive_key(key: &str) -> bool {
    SENSITIVE_KEY.is_match(key)
}

/// Scrubs a parsed JSON value in place.
///
/// Walks the tree with an explicit stack, so arbitrarily deep input cannot
/// overflow the call stack. Primitives outside of sensitive keys are left
/// untouched.
pub fn redact(value: &mut Value) {
    let mut pending: Vec<&mut Value> = vec![value];

    while let Some(current) = pending.pop() {
        match current {
            Value::Object(map) => {
                for (key, child) in map.iter_mut() {
                    if is_sensitive_key(key) {
                        *child = Value::String(REDACTION_MARKER.to_string());
                    } else if child.is_object() || child.is_array() {
                        pending.push(child);
                    }
                }
            }
            Value::Array(items) => {
                pending.extend(items.iter_mut().filter(|v| v.is_object() || v.is_array()));
            }
            _ => {}
        }
    }
}

/// Redacts a copy of `value` and serializes it, clipped to `max_bytes`.
///
/// Trees deeper than [`MAX_DEPTH`] are replaced by a clipped marker without
/// being copied or serialized.
pub fn redact_value(value: &Value, max_bytes: usize) -> String {
    if exceeds_depth(value) {
        return format!("<JSON nested deeper than {MAX_DEPTH} levels, contents clipped>");
    }

    let mut copy = value.clone();
    redact(&mut copy);
    let text = serde_json::to_string(&copy).unwrap_or_else(|_| "<unserializable>".to_string());
    clip(text, max_bytes)
}

/// Parses a raw body, redacts it, and serializes it clipped to `max_bytes`.
///
/// Bodies that are not JSON are never echoed, since nothing can be said about
/// where secrets sit inside them; only their size is reported.
pub fn redact_json(raw: &[u8], max_bytes: usize) -> String {
    if raw.is_empty() {
        return String::new();
    }

    match serde_json::from_slice::<Value>(raw) {
        Ok(value) => redact_value(&value, max_bytes),
        Err(_) if nesting_exceeds(raw, MAX_DEPTH) => format!(
            "<{len} bytes of JSON nested deeper than {MAX_DEPTH} levels, {len} bytes clipped>",
            len = raw.len()
        ),
        Err(_) => format!("<{} bytes of non-JSON content>", raw.len()),
    }
}

/// Returns true if a parsed tree nests deeper than [`MAX_DEPTH`].
fn exceeds_depth(value: &Value) -> bool {
    let mut pending: Vec<(&Value, usize)> = vec![(value, 0)];

    while let Some((current, depth)) = pending.pop() {
        match current {
            Value::Object(_) | Value::Array(_) if depth >= MAX_DEPTH => return true,
            Value::Object(map) => pending.extend(map.values().map(|child| (child, depth + 1))),
            Value::Array(items) => pending.extend(items.iter().map(|child| (child, depth + 1))),
            _ => {}
        }
    }
    false
}

/// Scans raw bytes for object or array nesting deeper than `limit`.
///
/// Brackets inside string literals are skipped. Nothing else is validated.
fn nesting_exceeds(raw: &[u8], limit: usize) -> bool {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for &byte in raw {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                if depth > limit {
                    return true;
                }
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    false
}

/// Truncates on a char boundary and appends a clipped-bytes marker.
fn clip(mut text: String, max_bytes: usize) -> String {
    if text.len() <= max_bytes {
        return text;
    }

    let mut cut = max_bytes;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }

    let clipped = text.len() - cut;
    text.truncate(cut);
    text.push_str(&format!("... <{clipped} bytes clipped>"));
    text
}

// ============================================================================
// Tests
// ============================================================================
