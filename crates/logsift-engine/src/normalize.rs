//! Event normalizer
//!
//! Converts one raw event record into a canonical `NormalizedEvent`:
//! id/uid assignment, timestamp canonicalization, level inference,
//! field resolution, and search-index construction.

use std::sync::LazyLock;

use chrono::{DateTime, SecondsFormat};
use regex::Regex;
use serde_json::Value;

use logsift_types::{LevelTone, NormalizedEvent};

use crate::value::{first_defined, first_inline, to_inline_string, to_json_string};

/// Numeric timestamps at or below this value are treated as Unix seconds,
/// larger ones as already-milliseconds. Kept verbatim for compatibility
/// with existing exports.
const EPOCH_SECONDS_MAX: f64 = 99_999_999_999.0;

/// Compact-JSON contribution to the search index is capped to bound
/// per-event memory on very large payloads. Terms beyond the cap are
/// not findable; accepted trade-off.
const SEARCHABLE_JSON_CAP: usize = 1800;

/// At most this many `data` keys go into a synthesized message
const MESSAGE_KEY_PREVIEW: usize = 6;

/// How many raw events application inference samples
const APPLICATION_SAMPLE_LEN: usize = 100;

static CUSTOM_LEVEL_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9_-]{2,20}$").expect("static pattern"));

/// Normalize one raw event at position `index` in the resolved collection.
pub fn normalize_event(raw: &Value, index: usize) -> NormalizedEvent {
    let data = raw.get("data");
    let meta = raw.get("metaData");

    let mut id = first_inline(&[
        raw.get("id"),
        raw.get("eventId"),
        raw.get("uuid"),
        data.and_then(|d| d.get("id")),
    ]);
    if id.is_empty() {
        id = (index + 1).to_string();
    }
    let uid = format!("{index}-{id}");

    let timestamp = canonicalize_timestamp(first_defined(&[
        raw.get("timestamp"),
        raw.get("time"),
        raw.get("created"),
        raw.get("dateTime"),
        data.and_then(|d| d.get("timestamp")),
        data.and_then(|d| d.get("time")),
    ]));

    let level = resolve_level(raw, data, meta);
    let tone = LevelTone::for_level(&level);

    let mut application = first_inline(&[
        raw.get("applicationName"),
        raw.get("application"),
        raw.get("channel"),
        raw.get("source"),
        data.and_then(|d| d.get("source")),
        data.and_then(|d| d.get("application")),
        data.and_then(|d| d.get("provider")),
    ]);
    if application.is_empty() {
        application = "unknown".to_string();
    }

    let mut context = first_inline(&[
        raw.get("context"),
        raw.get("topic"),
        raw.get("eventType"),
        data.and_then(|d| d.get("type")),
        data.and_then(|d| d.get("eventName")),
        data.and_then(|d| d.get("topic")),
        data.and_then(|d| d.get("event")),
    ]);
    if context.is_empty() {
        context = "none".to_string();
    }

    let message = resolve_message(raw, data);

    let raw_json = to_json_string(raw, 2);
    let compact_json = to_json_string(raw, 0);

    let line_title = format!("{timestamp} | {level} | {application} | {context} | {message}");
    let mut searchable =
        String::with_capacity(id.len() + line_title.len() + SEARCHABLE_JSON_CAP);
    searchable.push_str(&id);
    searchable.push_str(&line_title);
    searchable.push_str(truncate_chars(&compact_json, SEARCHABLE_JSON_CAP));
    let searchable = searchable.to_lowercase();

    NormalizedEvent {
        id,
        uid,
        timestamp,
        level,
        tone,
        application,
        context,
        message,
        raw_json,
        compact_json,
        searchable,
    }
}

/// Canonicalize a resolved timestamp candidate.
///
/// Numeric epochs become ISO-8601 (seconds vs milliseconds decided by
/// [`EPOCH_SECONDS_MAX`]); other values that coerce to non-empty text are
/// used verbatim; everything else renders as `"-"`.
pub fn canonicalize_timestamp(candidate: Option<&Value>) -> String {
    let Some(value) = candidate else {
        return "-".to_string();
    };
    if let Some(n) = value.as_f64() {
        let millis = if n <= EPOCH_SECONDS_MAX { n * 1000.0 } else { n };
        return match DateTime::from_timestamp_millis(millis as i64) {
            Some(dt) => dt.to_rfc3339_opts(SecondsFormat::Millis, true),
            None => to_inline_string(value),
        };
    }
    let inline = to_inline_string(value);
    if inline.is_empty() {
        "-".to_string()
    } else {
        inline
    }
}

fn resolve_level(raw: &Value, data: Option<&Value>, meta: Option<&Value>) -> String {
    let candidates = [
        meta.and_then(|m| m.get("level")),
        raw.get("level"),
        raw.get("severity"),
        data.and_then(|d| d.get("level")),
        data.and_then(|d| d.get("severity")),
        data.and_then(|d| d.get("notificationType")),
        raw.get("channel"),
    ];
    for candidate in candidates.into_iter().flatten() {
        let text = to_inline_string(candidate);
        if text.is_empty() {
            continue;
        }
        // A candidate that fails normalization is rejected, not terminal;
        // the scan continues with the next one.
        if let Some(level) = normalize_level(&text) {
            return level;
        }
    }
    "UNKNOWN".to_string()
}

/// Map free-form level text onto the canonical vocabulary, or pass a
/// plausible custom token through uppercased. Returns `None` when the text
/// is not usable as a level at all.
pub fn normalize_level(text: &str) -> Option<String> {
    let upper = text.to_uppercase();
    if upper.contains("CRITICAL") || upper.contains("FATAL") {
        Some("CRITICAL".to_string())
    } else if upper.contains("ERROR") || upper == "ERR" {
        Some("ERROR".to_string())
    } else if upper.contains("WARN") {
        Some("WARNING".to_string())
    } else if upper.contains("DEBUG") {
        Some("DEBUG".to_string())
    } else if upper.contains("TRACE") {
        Some("TRACE".to_string())
    } else if upper.contains("INFO") || upper == "LOG" {
        Some("INFO".to_string())
    } else if CUSTOM_LEVEL_TOKEN.is_match(&upper) {
        Some(upper)
    } else {
        None
    }
}

fn resolve_message(raw: &Value, data: Option<&Value>) -> String {
    let resolved = first_inline(&[
        data.and_then(|d| d.get("message")),
        raw.get("message"),
        data.and_then(|d| d.get("detail")),
        data.and_then(|d| d.get("reason")),
        data.and_then(|d| d.get("type")),
        data.and_then(|d| d.get("eventName")),
        data.and_then(|d| d.get("event")),
        raw.get("topic"),
        raw.get("type"),
        data.and_then(|d| d.get("code")),
        raw.get("code"),
    ]);
    if !resolved.is_empty() {
        return resolved;
    }
    if let Some(obj) = data.and_then(Value::as_object) {
        if !obj.is_empty() {
            let keys: Vec<&str> = obj
                .keys()
                .take(MESSAGE_KEY_PREVIEW)
                .map(String::as_str)
                .collect();
            return format!("Data keys: {}", keys.join(", "));
        }
    }
    "No short message available".to_string()
}

/// Infer the document-wide application name by sampling the first
/// [`APPLICATION_SAMPLE_LEN`] raw events for an application-style field.
pub fn infer_application(raw_events: &[Value]) -> String {
    for raw in raw_events.iter().take(APPLICATION_SAMPLE_LEN) {
        let data = raw.get("data");
        let candidate = first_inline(&[
            raw.get("applicationName"),
            raw.get("application"),
            raw.get("channel"),
            raw.get("source"),
            data.and_then(|d| d.get("source")),
            data.and_then(|d| d.get("application")),
            data.and_then(|d| d.get("provider")),
        ]);
        if !candidate.is_empty() {
            return candidate;
        }
    }
    "unknown".to_string()
}

/// Truncate on a char boundary without allocating
fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_seconds_epoch_becomes_iso() {
        let event = normalize_event(
            &json!({"id": "1", "level": "ERR", "timestamp": 1_700_000_000i64, "message": "x"}),
            0,
        );
        assert_eq!(event.timestamp, "2023-11-14T22:13:20.000Z");
        assert_eq!(event.level, "ERROR");
        assert_eq!(event.tone, LevelTone::Error);
    }

    #[test]
    fn test_millis_epoch_stays_millis() {
        let ts = canonicalize_timestamp(Some(&json!(1_700_000_000_000i64)));
        assert_eq!(ts, "2023-11-14T22:13:20.000Z");
    }

    #[test]
    fn test_string_timestamp_verbatim() {
        let ts = canonicalize_timestamp(Some(&json!("yesterday at noon")));
        assert_eq!(ts, "yesterday at noon");
    }

    #[test]
    fn test_missing_timestamp_is_dash() {
        assert_eq!(canonicalize_timestamp(None), "-");
        let event = normalize_event(&json!({"message": "x"}), 0);
        assert_eq!(event.timestamp, "-");
    }

    #[test]
    fn test_positional_id_fallback_and_uid() {
        let event = normalize_event(&json!({"message": "x"}), 4);
        assert_eq!(event.id, "5");
        assert_eq!(event.uid, "4-5");
    }

    #[test]
    fn test_nested_data_id() {
        let event = normalize_event(&json!({"data": {"id": "abc"}}), 0);
        assert_eq!(event.id, "abc");
        assert_eq!(event.uid, "0-abc");
    }

    #[test]
    fn test_level_vocabulary() {
        assert_eq!(normalize_level("fatal error"), Some("CRITICAL".into()));
        assert_eq!(normalize_level("err"), Some("ERROR".into()));
        assert_eq!(normalize_level("warning"), Some("WARNING".into()));
        assert_eq!(normalize_level("log"), Some("INFO".into()));
        assert_eq!(normalize_level("Information"), Some("INFO".into()));
    }

    #[test]
    fn test_custom_level_passthrough() {
        assert_eq!(normalize_level("audit"), Some("AUDIT".into()));
        assert_eq!(normalize_level("x"), None); // too short
        assert_eq!(normalize_level("has spaces"), None);
    }

    #[test]
    fn test_rejected_candidate_continues_scan() {
        // "channel" text is unusable, scan falls through to data.severity
        let event = normalize_event(
            &json!({"level": "!!", "data": {"severity": "warn"}}),
            0,
        );
        assert_eq!(event.level, "WARNING");
    }

    #[test]
    fn test_unknown_level_default() {
        let event = normalize_event(&json!({"message": "x"}), 0);
        assert_eq!(event.level, "UNKNOWN");
        assert_eq!(event.tone, LevelTone::Neutral);
    }

    #[test]
    fn test_field_defaults() {
        let event = normalize_event(&json!({}), 0);
        assert_eq!(event.application, "unknown");
        assert_eq!(event.context, "none");
        assert_eq!(event.message, "No short message available");
    }

    #[test]
    fn test_message_synthesis_from_data_keys() {
        let event = normalize_event(
            &json!({"data": {"a": [1], "b": {}, "c": [2], "d": [3], "e": [4], "f": [5], "g": [6]}}),
            0,
        );
        assert_eq!(event.message, "Data keys: a, b, c, d, e, f");
    }

    #[test]
    fn test_raw_json_round_trip() {
        let raw = json!({"id": "1", "data": {"nested": [1, 2, {"k": null}]}});
        let event = normalize_event(&raw, 0);
        let reparsed: serde_json::Value = serde_json::from_str(&event.raw_json).unwrap();
        assert_eq!(reparsed, raw);
    }

    #[test]
    fn test_searchable_is_lowercase_and_capped() {
        let big: String = "Z".repeat(5000);
        let event = normalize_event(&json!({"id": "AA", "message": "HELLO", "blob": big}), 0);
        assert!(event.searchable.contains("hello"));
        assert!(event.searchable.contains("aa"));
        assert_eq!(event.searchable, event.searchable.to_lowercase());
        // id + line title + capped compact json
        assert!(event.searchable.len() < 2000 + event.line_title().len());
    }

    #[test]
    fn test_infer_application_samples() {
        let events = vec![json!({"message": "no app"}), json!({"source": "crm"})];
        assert_eq!(infer_application(&events), "crm");
        assert_eq!(infer_application(&[]), "unknown");
    }
}
