//! Shared types for logsift
//!
//! This crate contains the data model produced by the normalization engine
//! and consumed by the presentation layer.

use std::cell::OnceCell;

use ratatui::style::Color;
use serde_json::Value;

/// Hard cap on rendered raw-JSON length for metadata inspection.
/// Pathological payloads (multi-megabyte embedded blobs) would otherwise
/// stall rendering.
pub const RAW_JSON_RENDER_CAP: usize = 120_000;

const TRUNCATION_SUFFIX: &str = "\n… [output truncated]";

// ============================================================================
// Level Tone
// ============================================================================

/// Coarse severity category derived from an event's normalized level.
///
/// The level itself stays a free-form string because exports may carry
/// custom level tokens; the tone is the closed vocabulary the UI colors by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum LevelTone {
    Error,
    Warning,
    Info,
    Debug,
    Trace,
    #[default]
    Neutral,
}

impl LevelTone {
    /// Derive the tone from a normalized level string by substring test.
    ///
    /// Works for custom passthrough levels too: a level like `APP_ERROR`
    /// still gets the error tone.
    pub fn for_level(level: &str) -> Self {
        let upper = level.to_uppercase();
        if upper.contains("ERROR") || upper.contains("CRITICAL") || upper.contains("FATAL") {
            Self::Error
        } else if upper.contains("WARN") {
            Self::Warning
        } else if upper.contains("DEBUG") {
            Self::Debug
        } else if upper.contains("TRACE") {
            Self::Trace
        } else if upper.contains("INFO") {
            Self::Info
        } else {
            Self::Neutral
        }
    }

    /// Get display color for this tone
    pub fn color(&self) -> Color {
        match self {
            Self::Error => Color::Red,
            Self::Warning => Color::Yellow,
            Self::Info => Color::Green,
            Self::Debug => Color::Cyan,
            Self::Trace => Color::DarkGray,
            Self::Neutral => Color::White,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
            Self::Neutral => "neutral",
        }
    }
}

// ============================================================================
// Normalized Event
// ============================================================================

/// The canonical, display/filter-ready form of one raw event record.
///
/// Built once per raw event and never mutated; every field is derived from
/// the raw record and its position in the resolved collection.
#[derive(Clone, Debug)]
pub struct NormalizedEvent {
    /// Resolved identifier; positional fallback when the record carries none.
    /// Not guaranteed unique across malformed input.
    pub id: String,

    /// `"<index>-<id>"`; unique within one loaded document by construction.
    /// The only stable handle for UI expansion state.
    pub uid: String,

    /// Verbatim string timestamp, ISO-8601 derived from a numeric epoch,
    /// or `"-"` when unresolved.
    pub timestamp: String,

    /// Canonical level vocabulary, a custom passthrough token, or `UNKNOWN`.
    pub level: String,

    /// Presentation category derived from `level`.
    pub tone: LevelTone,

    /// Originating application, `unknown` when unresolved.
    pub application: String,

    /// Event context/topic, `none` when unresolved.
    pub context: String,

    /// One-line human-readable summary, resolved or synthesized.
    pub message: String,

    /// Pretty-printed serialization of the raw record (indent 2).
    pub raw_json: String,

    /// Single-line serialization of the raw record.
    pub compact_json: String,

    /// Lowercase text blob for free-text search.
    pub searchable: String,
}

/// Shared handle to an immutable normalized event.
///
/// Events are built once per load and handed around by reference count so
/// refiltering never clones row data.
pub type ArcEvent = std::sync::Arc<NormalizedEvent>;

impl NormalizedEvent {
    /// One-line display form: `timestamp | level | application | context | message`
    pub fn line_title(&self) -> String {
        format!(
            "{} | {} | {} | {} | {}",
            self.timestamp, self.level, self.application, self.context, self.message
        )
    }
}

// ============================================================================
// Metadata Model
// ============================================================================

/// A single label/value pair inside a pretty metadata block
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fact {
    pub label: String,
    pub value: String,
}

impl Fact {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Generic summary of one metadata key not claimed by a pretty block
#[derive(Clone, Debug)]
pub struct MetaEntry {
    pub key: String,

    /// Summarized inline rendering of the value
    pub value: String,

    /// The original metadata value, kept for on-demand inspection
    pub raw_value: Value,

    raw_json: OnceCell<String>,
}

impl MetaEntry {
    pub fn new(key: String, value: String, raw_value: Value) -> Self {
        Self {
            key,
            value,
            raw_value,
            raw_json: OnceCell::new(),
        }
    }

    /// Pretty-printed raw value, rendered lazily on first access and cached.
    pub fn raw_json(&self) -> &str {
        self.raw_json
            .get_or_init(|| render_raw_json(&self.raw_value))
    }
}

/// Structured, hand-curated summary of one recognized metadata substructure
#[derive(Clone, Debug)]
pub struct PrettyMetaBlock {
    /// The metadata key this block claims
    pub key: String,

    pub title: String,
    pub subtitle: String,

    /// Ordered label/value pairs
    pub facts: Vec<Fact>,

    /// Ordered free-form highlight lines
    pub highlights: Vec<String>,

    /// The original metadata value, kept for on-demand inspection
    pub raw_value: Value,

    raw_json: OnceCell<String>,
}

impl PrettyMetaBlock {
    pub fn new(
        key: impl Into<String>,
        title: impl Into<String>,
        subtitle: impl Into<String>,
        facts: Vec<Fact>,
        highlights: Vec<String>,
        raw_value: Value,
    ) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            subtitle: subtitle.into(),
            facts,
            highlights,
            raw_value,
            raw_json: OnceCell::new(),
        }
    }

    /// Pretty-printed raw value, rendered lazily on first access and cached.
    pub fn raw_json(&self) -> &str {
        self.raw_json
            .get_or_init(|| render_raw_json(&self.raw_value))
    }
}

/// Serialize a metadata value for inspection, hard-capped at
/// [`RAW_JSON_RENDER_CAP`] characters with an explicit truncation suffix.
fn render_raw_json(value: &Value) -> String {
    let rendered =
        serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    match rendered.char_indices().nth(RAW_JSON_RENDER_CAP) {
        Some((byte_idx, _)) => {
            let mut capped = rendered[..byte_idx].to_string();
            capped.push_str(TRUNCATION_SUFFIX);
            capped
        }
        None => rendered,
    }
}

// ============================================================================
// Load Errors
// ============================================================================

/// Recoverable failures when ingesting a log export.
///
/// Both variants surface as a single user-facing message and reset all
/// derived state; internal resolution heuristics never fail the load.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("the selected file is empty")]
    EmptyInput,

    #[error("the file does not contain valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tone_for_canonical_levels() {
        assert_eq!(LevelTone::for_level("ERROR"), LevelTone::Error);
        assert_eq!(LevelTone::for_level("CRITICAL"), LevelTone::Error);
        assert_eq!(LevelTone::for_level("WARNING"), LevelTone::Warning);
        assert_eq!(LevelTone::for_level("INFO"), LevelTone::Info);
        assert_eq!(LevelTone::for_level("DEBUG"), LevelTone::Debug);
        assert_eq!(LevelTone::for_level("TRACE"), LevelTone::Trace);
        assert_eq!(LevelTone::for_level("UNKNOWN"), LevelTone::Neutral);
    }

    #[test]
    fn test_tone_for_custom_levels() {
        // Passthrough tokens still get a best-effort tone
        assert_eq!(LevelTone::for_level("APP_ERROR"), LevelTone::Error);
        assert_eq!(LevelTone::for_level("WARN_LOW"), LevelTone::Warning);
        assert_eq!(LevelTone::for_level("AUDIT"), LevelTone::Neutral);
    }

    #[test]
    fn test_meta_entry_raw_json_is_cached() {
        let entry = MetaEntry::new(
            "session".to_string(),
            "Object(1 keys): id".to_string(),
            json!({"id": 7}),
        );
        let first = entry.raw_json().as_ptr();
        let second = entry.raw_json().as_ptr();
        assert_eq!(first, second);
        assert!(entry.raw_json().contains("\"id\": 7"));
    }

    #[test]
    fn test_raw_json_render_cap() {
        let huge: String = "x".repeat(RAW_JSON_RENDER_CAP + 500);
        let entry = MetaEntry::new("blob".to_string(), String::new(), json!(huge));
        let rendered = entry.raw_json();
        assert!(rendered.len() < RAW_JSON_RENDER_CAP + TRUNCATION_SUFFIX.len() + 8);
        assert!(rendered.ends_with(TRUNCATION_SUFFIX));
    }

    #[test]
    fn test_line_title_layout() {
        let event = NormalizedEvent {
            id: "1".into(),
            uid: "0-1".into(),
            timestamp: "2024-01-01T00:00:00Z".into(),
            level: "INFO".into(),
            tone: LevelTone::Info,
            application: "gateway".into(),
            context: "auth".into(),
            message: "started".into(),
            raw_json: String::new(),
            compact_json: String::new(),
            searchable: String::new(),
        };
        assert_eq!(
            event.line_title(),
            "2024-01-01T00:00:00Z | INFO | gateway | auth | started"
        );
    }
}
