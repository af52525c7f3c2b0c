//! The per-document aggregate
//!
//! All derived state for one loaded export lives in a single owned value
//! that is built whole or not at all: a failed load returns an error and
//! leaves the caller with nothing partial to show.

use serde_json::Value;
use tracing::debug;

use logsift_types::{ArcEvent, LevelTone, LoadError, MetaEntry, PrettyMetaBlock};

use crate::catalog::OptionCatalogs;
use crate::filter::{self, FilterState};
use crate::meta::{build_meta_model, resolve_meta_root};
use crate::normalize::{infer_application, normalize_event};
use crate::resolve::resolve_event_collection;

/// Event counts per tone bucket for the loaded document
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LevelCounts {
    pub total: usize,
    pub error: usize,
    pub warning: usize,
    pub info: usize,
    pub debug: usize,
    pub trace: usize,
    pub neutral: usize,
}

impl LevelCounts {
    fn from_events(events: &[ArcEvent]) -> Self {
        let mut counts = Self::default();
        for event in events {
            counts.total += 1;
            match event.tone {
                LevelTone::Error => counts.error += 1,
                LevelTone::Warning => counts.warning += 1,
                LevelTone::Info => counts.info += 1,
                LevelTone::Debug => counts.debug += 1,
                LevelTone::Trace => counts.trace += 1,
                LevelTone::Neutral => counts.neutral += 1,
            }
        }
        counts
    }
}

/// Everything derived from one loaded export: the normalized events, the
/// current filtered view, the filter option catalogs, and the metadata
/// view-model. Replaced atomically by the next load.
pub struct Document {
    file_name: String,
    application: String,
    events: Vec<ArcEvent>,
    filtered: Vec<ArcEvent>,
    catalogs: OptionCatalogs,
    level_counts: LevelCounts,
    meta_blocks: Vec<PrettyMetaBlock>,
    meta_entries: Vec<MetaEntry>,
    filter: FilterState,
}

impl Document {
    /// Ingest one export. `text` is the full file content; `file_name` is
    /// only carried for display.
    pub fn load(file_name: &str, text: &str) -> Result<Self, LoadError> {
        if text.trim().is_empty() {
            return Err(LoadError::EmptyInput);
        }
        let root: Value = serde_json::from_str(text)?;

        let raw_events = resolve_event_collection(&root);
        let events: Vec<ArcEvent> = raw_events
            .iter()
            .enumerate()
            .map(|(index, raw)| ArcEvent::new(normalize_event(raw, index)))
            .collect();
        let application = infer_application(raw_events);

        let (meta_blocks, meta_entries) = match resolve_meta_root(&root) {
            Some(meta) => build_meta_model(meta),
            None => (Vec::new(), Vec::new()),
        };

        let catalogs = OptionCatalogs::from_events(&events);
        let level_counts = LevelCounts::from_events(&events);

        debug!(
            file = file_name,
            events = events.len(),
            meta_blocks = meta_blocks.len(),
            meta_entries = meta_entries.len(),
            "document loaded"
        );

        let filtered = events.clone();
        Ok(Self {
            file_name: file_name.to_string(),
            application,
            events,
            filtered,
            catalogs,
            level_counts,
            meta_blocks,
            meta_entries,
            filter: FilterState::default(),
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Application name inferred from the events when the document itself
    /// names none
    pub fn application(&self) -> &str {
        &self.application
    }

    /// Full normalized set, in collection order
    pub fn events(&self) -> &[ArcEvent] {
        &self.events
    }

    /// Currently visible subset, in collection order
    pub fn filtered(&self) -> &[ArcEvent] {
        &self.filtered
    }

    pub fn catalogs(&self) -> &OptionCatalogs {
        &self.catalogs
    }

    pub fn level_counts(&self) -> LevelCounts {
        self.level_counts
    }

    pub fn meta_blocks(&self) -> &[PrettyMetaBlock] {
        &self.meta_blocks
    }

    pub fn meta_entries(&self) -> &[MetaEntry] {
        &self.meta_entries
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    // Every mutation below recomputes the visible subset in full; there is
    // no incremental path.

    pub fn set_search_text(&mut self, text: &str) {
        self.filter.set_search_text(text);
        self.refilter();
    }

    pub fn toggle_level(&mut self, level: &str) {
        self.filter.toggle_level(level);
        self.refilter();
    }

    pub fn toggle_application(&mut self, application: &str) {
        self.filter.toggle_application(application);
        self.refilter();
    }

    pub fn toggle_context(&mut self, context: &str) {
        self.filter.toggle_context(context);
        self.refilter();
    }

    pub fn clear_filters(&mut self) {
        self.filter.clear();
        self.refilter();
    }

    fn refilter(&mut self) {
        self.filtered = filter::apply(&self.events, &self.filter);
    }
}
