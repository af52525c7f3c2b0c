//! Scalar coercion helpers
//!
//! Every resolution site in the engine works through these "first match
//! wins" combinators instead of nested conditionals.

use serde_json::Value;

/// Convert a JSON value to an inline display string.
///
/// Strings pass through, numbers and booleans are stringified; null,
/// arrays, and objects yield an empty string and must be special-cased by
/// callers that care about them.
pub fn to_inline_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// First candidate whose inline coercion is non-empty, else empty string.
///
/// This is the single tie-break rule used throughout the normalizer.
pub fn first_inline(candidates: &[Option<&Value>]) -> String {
    candidates
        .iter()
        .copied()
        .flatten()
        .map(to_inline_string)
        .find(|s| !s.is_empty())
        .unwrap_or_default()
}

/// First candidate that is present and not JSON null, independent of
/// whether it coerces to a non-empty string.
pub fn first_defined<'a>(candidates: &[Option<&'a Value>]) -> Option<&'a Value> {
    candidates.iter().copied().flatten().find(|v| !v.is_null())
}

/// Serialize a value to JSON. Indent 0 produces the compact single-line
/// form, anything else the pretty form.
///
/// `serde_json::Value` trees cannot actually fail to serialize, but the
/// fallback keeps this total.
pub fn to_json_string(value: &Value, indent: usize) -> String {
    let rendered = if indent == 0 {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    rendered.unwrap_or_else(|_| format!("{value:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_inline_scalars() {
        assert_eq!(to_inline_string(&json!("abc")), "abc");
        assert_eq!(to_inline_string(&json!(42)), "42");
        assert_eq!(to_inline_string(&json!(2.5)), "2.5");
        assert_eq!(to_inline_string(&json!(true)), "true");
    }

    #[test]
    fn test_inline_composites_are_empty() {
        assert_eq!(to_inline_string(&Value::Null), "");
        assert_eq!(to_inline_string(&json!([1, 2])), "");
        assert_eq!(to_inline_string(&json!({"a": 1})), "");
    }

    #[test]
    fn test_first_inline_skips_empty_candidates() {
        let null = Value::Null;
        let empty = json!("");
        let hit = json!("found");
        assert_eq!(
            first_inline(&[None, Some(&null), Some(&empty), Some(&hit)]),
            "found"
        );
        assert_eq!(first_inline(&[None, Some(&null)]), "");
    }

    #[test]
    fn test_first_defined_accepts_empty_string() {
        // Definedness is independent of emptiness
        let empty = json!("");
        let later = json!("later");
        let found = first_defined(&[Some(&Value::Null), Some(&empty), Some(&later)]);
        assert_eq!(found, Some(&empty));
    }

    #[test]
    fn test_json_string_forms() {
        let value = json!({"a": 1});
        assert_eq!(to_json_string(&value, 0), r#"{"a":1}"#);
        assert!(to_json_string(&value, 2).contains("\n"));
    }
}
