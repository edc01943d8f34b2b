//! JSON output formatting

use serde::Serialize;

/// Format any report as pretty JSON with a trailing newline
pub fn format<T: Serialize>(value: &T) -> String {
    let mut output = serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!(r#"{{"error": "Failed to serialize output: {}"}}"#, e));
    output.push('\n');
    output
}
