//! Event collection resolver
//!
//! Log exports have no fixed schema; this module locates the array of
//! event-like records inside an unknown root value. The cascade is
//! deliberately permissive — a single matching sampled element accepts an
//! array — to tolerate unknown export formats at the cost of possible
//! false positives on ambiguous documents.

use serde_json::Value;

/// Wrapper keys checked on the root object, in order
const WRAPPER_KEYS: [&str; 5] = ["events", "logs", "records", "entries", "items"];

/// Nested containers checked when no top-level wrapper matches
const NESTED_CONTAINERS: [&str; 2] = ["data", "payload"];
const NESTED_KEYS: [&str; 2] = ["events", "logs"];

/// Keys whose presence marks an object as event-like during the fallback scan
const EVENT_MARKER_KEYS: [&str; 5] = ["timestamp", "topic", "message", "event", "data"];

/// How many elements of a candidate array the fallback scan samples
const SCAN_SAMPLE_LEN: usize = 20;

/// Locate the event collection inside the parsed root value.
///
/// Resolution order, first match wins:
/// 1. the root itself is an array;
/// 2. an array under a known wrapper key;
/// 3. an array under `events`/`logs` inside a `data`/`payload` object;
/// 4. any root-level array where a sampled element looks event-like;
/// 5. otherwise an empty slice.
pub fn resolve_event_collection(root: &Value) -> &[Value] {
    if let Value::Array(items) = root {
        return items;
    }
    let Some(obj) = root.as_object() else {
        return &[];
    };

    for key in WRAPPER_KEYS {
        if let Some(Value::Array(items)) = obj.get(key) {
            return items;
        }
    }

    for container in NESTED_CONTAINERS {
        if let Some(Value::Object(nested)) = obj.get(container) {
            for key in NESTED_KEYS {
                if let Some(Value::Array(items)) = nested.get(key) {
                    return items;
                }
            }
        }
    }

    // Last resort: scan the root's own values in enumeration order and take
    // the first array that holds at least one event-like object.
    for candidate in obj.values() {
        if let Value::Array(items) = candidate {
            if items.iter().take(SCAN_SAMPLE_LEN).any(looks_like_event) {
                return items;
            }
        }
    }

    &[]
}

fn looks_like_event(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|obj| EVENT_MARKER_KEYS.iter().any(|key| obj.contains_key(*key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_root_array_used_directly() {
        let root = json!([{"message": "a"}, {"message": "b"}]);
        assert_eq!(resolve_event_collection(&root).len(), 2);
    }

    #[test]
    fn test_wrapper_key_order() {
        // "events" outranks "logs" even when both exist
        let root = json!({"logs": [{"message": "l"}], "events": [{"message": "e"}]});
        let found = resolve_event_collection(&root);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["message"], "e");
    }

    #[test]
    fn test_nested_under_data() {
        let root = json!({"data": {"events": [{"message": "x"}]}});
        assert_eq!(resolve_event_collection(&root).len(), 1);
    }

    #[test]
    fn test_nested_under_payload_logs() {
        let root = json!({"payload": {"logs": [{"topic": "t"}]}});
        assert_eq!(resolve_event_collection(&root).len(), 1);
    }

    #[test]
    fn test_fallback_scan_accepts_event_like_array() {
        let root = json!({
            "labels": ["a", "b"],
            "rows": [{"timestamp": 1, "detail": "d"}]
        });
        let found = resolve_event_collection(&root);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["detail"], "d");
    }

    #[test]
    fn test_fallback_scan_rejects_scalar_arrays() {
        let root = json!({"labels": ["a", "b"], "count": 2});
        assert!(resolve_event_collection(&root).is_empty());
    }

    #[test]
    fn test_single_sampled_match_is_enough() {
        // Permissive by design: one event-like element accepts the array
        let root = json!({"mixed": [1, "x", {"event": "login"}]});
        assert_eq!(resolve_event_collection(&root).len(), 3);
    }

    #[test]
    fn test_scalar_root_yields_empty() {
        assert!(resolve_event_collection(&json!(42)).is_empty());
        assert!(resolve_event_collection(&json!("text")).is_empty());
    }
}
