//! Rendering of command results.
//!
//! `--format json` prints the API shapes (camelCase) on one line so the
//! output can be piped into `jq`; `--format pretty` goes through [`pretty`].

pub mod pretty;

use serde::Serialize;

/// Compact JSON for `value`. A value that cannot be serialized renders as an
/// `{"error": ...}` object instead of an empty line.
pub fn format_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }).to_string())
}
