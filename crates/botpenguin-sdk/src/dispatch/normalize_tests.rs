//! Tests for response normalization.

use super::*;
use serde_json::json;

/// Verify a lone object wraps into a single-element sequence.
#[test]
fn test_expand_single_object() {
    let records = expand(json!({"id": "u1"}));
    assert_eq!(records, vec![json!({"id": "u1"})]);
}

/// Verify arrays expand to their elements in remote order.
#[test]
fn test_expand_array() {
    let records = expand(json!([{"id": 1}, {"id": 2}, {"id": 3}]));
    assert_eq!(records.len(), 3);
    assert_eq!(records[0], json!({"id": 1}));
    assert_eq!(records[2], json!({"id": 3}));
}

/// Verify an empty array yields no records.
#[test]
fn test_expand_empty_array() {
    assert!(expand(json!([])).is_empty());
}

/// Verify non-object scalars pass through unchanged.
#[test]
fn test_expand_scalar_passthrough() {
    assert_eq!(expand(json!("ok")), vec![json!("ok")]);
    assert_eq!(expand(serde_json::Value::Null), vec![serde_json::Value::Null]);
}

/// Verify missing fields inside records are not touched.
#[test]
fn test_expand_preserves_contents() {
    let records = expand(json!([{"partial": true}]));
    assert_eq!(records[0], json!({"partial": true}));
    assert!(records[0].get("missing").is_none());
}
