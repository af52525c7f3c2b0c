//! Filter engine
//!
//! Holds the current filter state and recomputes the visible subset of
//! normalized events on every change. Recomputation is total and
//! synchronous; correctness over throughput is the contract here.

use std::collections::HashSet;

use logsift_types::{ArcEvent, NormalizedEvent};

/// Free-text term plus three independently-selected value sets.
///
/// Each component is vacuously true when empty, so a default state matches
/// every event.
#[derive(Clone, Debug, Default)]
pub struct FilterState {
    search_term: String,
    selected_levels: HashSet<String>,
    selected_applications: HashSet<String>,
    selected_contexts: HashSet<String>,
}

impl FilterState {
    /// Set the free-text term. Stored trimmed and case-folded so matching
    /// against the precomputed searchable index is a plain substring test.
    pub fn set_search_text(&mut self, text: &str) {
        self.search_term = text.trim().to_lowercase();
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Add or remove one level selection
    pub fn toggle_level(&mut self, level: &str) {
        toggle(&mut self.selected_levels, level);
    }

    /// Add or remove one application selection
    pub fn toggle_application(&mut self, application: &str) {
        toggle(&mut self.selected_applications, application);
    }

    /// Add or remove one context selection
    pub fn toggle_context(&mut self, context: &str) {
        toggle(&mut self.selected_contexts, context);
    }

    pub fn selected_levels(&self) -> &HashSet<String> {
        &self.selected_levels
    }

    pub fn selected_applications(&self) -> &HashSet<String> {
        &self.selected_applications
    }

    pub fn selected_contexts(&self) -> &HashSet<String> {
        &self.selected_contexts
    }

    /// Reset all four components simultaneously
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether any component constrains the view
    pub fn is_active(&self) -> bool {
        !self.search_term.is_empty()
            || !self.selected_levels.is_empty()
            || !self.selected_applications.is_empty()
            || !self.selected_contexts.is_empty()
    }

    /// Conjunction of the four predicates, each vacuously true when its
    /// component is empty.
    pub fn matches(&self, event: &NormalizedEvent) -> bool {
        (self.search_term.is_empty() || event.searchable.contains(&self.search_term))
            && (self.selected_levels.is_empty() || self.selected_levels.contains(&event.level))
            && (self.selected_applications.is_empty()
                || self.selected_applications.contains(&event.application))
            && (self.selected_contexts.is_empty()
                || self.selected_contexts.contains(&event.context))
    }
}

fn toggle(set: &mut HashSet<String>, value: &str) {
    if !set.remove(value) {
        set.insert(value.to_string());
    }
}

/// Evaluate the filter over the full normalized set, preserving order.
pub fn apply(events: &[ArcEvent], state: &FilterState) -> Vec<ArcEvent> {
    events
        .iter()
        .filter(|event| state.matches(event))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use logsift_types::LevelTone;

    fn event(level: &str, application: &str, context: &str, searchable: &str) -> ArcEvent {
        Arc::new(NormalizedEvent {
            id: "1".into(),
            uid: "0-1".into(),
            timestamp: "-".into(),
            level: level.into(),
            tone: LevelTone::for_level(level),
            application: application.into(),
            context: context.into(),
            message: String::new(),
            raw_json: String::new(),
            compact_json: String::new(),
            searchable: searchable.into(),
        })
    }

    fn fixture() -> Vec<ArcEvent> {
        vec![
            event("ERROR", "gateway", "auth", "gateway auth failed"),
            event("INFO", "gateway", "billing", "gateway invoice sent"),
            event("ERROR", "worker", "auth", "worker auth retry"),
        ]
    }

    #[test]
    fn test_default_state_matches_everything() {
        let events = fixture();
        let state = FilterState::default();
        let visible = apply(&events, &state);
        assert_eq!(visible.len(), events.len());
        // Order preserved
        assert_eq!(visible[0].application, "gateway");
        assert_eq!(visible[2].application, "worker");
    }

    #[test]
    fn test_level_selection_ignores_other_dimensions() {
        let events = fixture();
        let mut state = FilterState::default();
        state.toggle_level("ERROR");
        let visible = apply(&events, &state);
        assert_eq!(visible.len(), 2);
        assert!(visible.iter().all(|e| e.level == "ERROR"));
    }

    #[test]
    fn test_conjunction_of_predicates() {
        let events = fixture();
        let mut state = FilterState::default();
        state.toggle_level("ERROR");
        state.toggle_application("gateway");
        state.set_search_text("AUTH");
        let visible = apply(&events, &state);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].context, "auth");
    }

    #[test]
    fn test_search_term_is_folded() {
        let events = fixture();
        let mut state = FilterState::default();
        state.set_search_text("  INVOICE  ");
        assert_eq!(state.search_term(), "invoice");
        assert_eq!(apply(&events, &state).len(), 1);
    }

    #[test]
    fn test_toggle_removes_on_second_call() {
        let mut state = FilterState::default();
        state.toggle_context("auth");
        assert!(state.is_active());
        state.toggle_context("auth");
        assert!(!state.is_active());
    }

    #[test]
    fn test_clear_resets_all_components() {
        let events = fixture();
        let mut state = FilterState::default();
        state.set_search_text("auth");
        state.toggle_level("ERROR");
        state.toggle_application("worker");
        state.toggle_context("auth");
        state.clear();
        assert!(!state.is_active());
        assert_eq!(state.search_term(), "");
        assert_eq!(apply(&events, &state).len(), events.len());
    }

    #[test]
    fn test_filtered_never_exceeds_input() {
        let events = fixture();
        let mut state = FilterState::default();
        state.set_search_text("no such term anywhere");
        assert!(apply(&events, &state).len() <= events.len());
        assert!(apply(&events, &state).is_empty());
    }
}
