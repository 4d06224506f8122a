//! Response normalization.
//!
//! The BotPenguin API answers some operations with a single object and others
//! (notably contact import) with an array. Dispatch output is always a flat
//! sequence of records, so responses are expanded here before being tagged
//! with their source item index.

use serde_json::Value;

/// Expand a parsed response into an ordered sequence of records.
///
/// An array yields its elements in the order the remote service returned
/// them; anything else becomes a single-element sequence. Record contents
/// pass through unchanged, including absent or unexpected fields.
///
/// # Examples
///
/// ```
/// use botpenguin_sdk::dispatch::normalize::expand;
/// use serde_json::json;
///
/// assert_eq!(expand(json!({"ok": true})), vec![json!({"ok": true})]);
/// assert_eq!(
///     expand(json!([{"id": 1}, {"id": 2}])),
///     vec![json!({"id": 1}), json!({"id": 2})],
/// );
/// ```
pub fn expand(response: Value) -> Vec<Value> {
    match response {
        Value::Array(entries) => entries,
        other => vec![other],
    }
}

#[cfg(test)]
#[path = "normalize_tests.rs"]
mod tests;
