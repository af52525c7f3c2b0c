use std::path::PathBuf;

use tracing::debug;

use logsift_engine::{ArcEvent, Document, LoadError};

use super::action::Action;

/// Rows jumped by page up/down
const PAGE_JUMP: usize = 15;

/// Screen enumeration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Events,
    Metadata,
}

/// Which filter dimension a picker overlay edits
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickerKind {
    Levels,
    Applications,
    Contexts,
}

impl PickerKind {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Levels => "Levels",
            Self::Applications => "Applications",
            Self::Contexts => "Contexts",
        }
    }
}

/// Transient state of an open picker overlay
#[derive(Clone, Debug)]
pub struct PickerState {
    pub kind: PickerKind,
    pub selection: usize,
    pub scroll: usize,
}

impl PickerState {
    pub fn new(kind: PickerKind) -> Self {
        Self {
            kind,
            selection: 0,
            scroll: 0,
        }
    }
}

/// Application state: the engine's document plus UI transients.
///
/// Transients are reset whenever a document is (re)installed, so a failed
/// load never shows stale rows next to its error message.
pub struct AppState {
    /// Path the shell loads from (and reloads on request)
    pub file_path: PathBuf,

    /// The loaded document, absent after a failed load
    pub document: Option<Document>,

    /// User-facing load error, mutually exclusive with a document
    pub error_message: Option<String>,

    pub screen: Screen,
    pub help_visible: bool,
    pub should_quit: bool,
    pub reload_requested: bool,

    // Event screen
    pub selection: usize,
    pub scroll: usize,
    /// Expanded event, keyed by uid so it survives refiltering
    pub expanded_uid: Option<String>,

    // Search input
    pub search_active: bool,
    pub search_input: String,

    // Picker overlay
    pub picker: Option<PickerState>,

    // Metadata screen
    pub meta_selection: usize,
    pub meta_scroll: usize,
    pub meta_expanded: bool,
}

impl AppState {
    pub fn new(file_path: PathBuf) -> Self {
        Self {
            file_path,
            document: None,
            error_message: None,
            screen: Screen::Events,
            help_visible: false,
            should_quit: false,
            reload_requested: false,
            selection: 0,
            scroll: 0,
            expanded_uid: None,
            search_active: false,
            search_input: String::new(),
            picker: None,
            meta_selection: 0,
            meta_scroll: 0,
            meta_expanded: false,
        }
    }

    /// Install a load outcome, replacing all prior state either way.
    pub fn install(&mut self, outcome: Result<Document, LoadError>) {
        self.reset_transients();
        match outcome {
            Ok(document) => {
                self.document = Some(document);
                self.error_message = None;
            }
            Err(err) => {
                self.document = None;
                self.error_message = Some(err.to_string());
            }
        }
    }

    /// Install a shell-side failure (e.g. the file could not be read)
    pub fn install_error(&mut self, message: String) {
        self.reset_transients();
        self.document = None;
        self.error_message = Some(message);
    }

    fn reset_transients(&mut self) {
        self.selection = 0;
        self.scroll = 0;
        self.expanded_uid = None;
        self.search_active = false;
        self.search_input = String::new();
        self.picker = None;
        self.meta_selection = 0;
        self.meta_scroll = 0;
        self.meta_expanded = false;
    }

    /// Number of rows on the current screen
    pub fn row_count(&self) -> usize {
        let Some(doc) = &self.document else { return 0 };
        match self.screen {
            Screen::Events => doc.filtered().len(),
            Screen::Metadata => doc.meta_blocks().len() + doc.meta_entries().len(),
        }
    }

    /// The event under the cursor, if any
    pub fn selected_event(&self) -> Option<&ArcEvent> {
        self.document.as_ref()?.filtered().get(self.selection)
    }

    /// The expanded event, if it is still visible
    pub fn expanded_event(&self) -> Option<&ArcEvent> {
        let uid = self.expanded_uid.as_deref()?;
        self.document
            .as_ref()?
            .filtered()
            .iter()
            .find(|e| e.uid == uid)
    }

    /// Values and current selections for an open picker
    pub fn picker_items(&self) -> Vec<(String, bool)> {
        let (Some(doc), Some(picker)) = (&self.document, &self.picker) else {
            return Vec::new();
        };
        let (values, selected) = match picker.kind {
            PickerKind::Levels => (
                &doc.catalogs().levels,
                doc.filter().selected_levels(),
            ),
            PickerKind::Applications => (
                &doc.catalogs().applications,
                doc.filter().selected_applications(),
            ),
            PickerKind::Contexts => (
                &doc.catalogs().contexts,
                doc.filter().selected_contexts(),
            ),
        };
        values
            .iter()
            .map(|value| (value.clone(), selected.contains(value)))
            .collect()
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::ToggleHelp => self.help_visible = !self.help_visible,
            Action::SwitchScreen(screen) => self.screen = screen,

            Action::SelectionUp => self.move_selection(-1),
            Action::SelectionDown => self.move_selection(1),
            Action::PageUp => self.move_selection(-(PAGE_JUMP as isize)),
            Action::PageDown => self.move_selection(PAGE_JUMP as isize),
            Action::SelectionTop => self.set_selection(0),
            Action::SelectionBottom => {
                self.set_selection(self.row_count().saturating_sub(1));
            }
            Action::ToggleExpand => self.toggle_expand(),

            Action::OpenSearch => {
                self.search_active = true;
                if let Some(doc) = &self.document {
                    self.search_input = doc.filter().search_term().to_string();
                }
            }
            Action::CloseSearch | Action::AcceptSearch => self.search_active = false,
            Action::SearchInput(c) => {
                self.search_input.push(c);
                self.apply_search();
            }
            Action::SearchBackspace => {
                self.search_input.pop();
                self.apply_search();
            }

            Action::OpenPicker(kind) => {
                if self.document.is_some() {
                    self.picker = Some(PickerState::new(kind));
                }
            }
            Action::ClosePicker => self.picker = None,
            Action::PickerUp => self.move_picker(-1),
            Action::PickerDown => self.move_picker(1),
            Action::PickerToggle => self.toggle_picker_value(),

            Action::ClearFilters => {
                self.search_input.clear();
                if let Some(doc) = &mut self.document {
                    doc.clear_filters();
                }
                self.clamp_selection();
            }
            Action::Reload => self.reload_requested = true,
            Action::DismissError => self.error_message = None,
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let current = match self.screen {
            Screen::Events => self.selection,
            Screen::Metadata => self.meta_selection,
        };
        self.set_selection(current.saturating_add_signed(delta));
    }

    fn set_selection(&mut self, target: usize) {
        match self.screen {
            Screen::Events => self.selection = target,
            Screen::Metadata => self.meta_selection = target,
        }
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let max = self.row_count().saturating_sub(1);
        self.selection = self.selection.min(max);
        self.meta_selection = self.meta_selection.min(max);
    }

    fn toggle_expand(&mut self) {
        match self.screen {
            Screen::Events => {
                let selected_uid = self.selected_event().map(|e| e.uid.clone());
                self.expanded_uid = match (selected_uid, self.expanded_uid.take()) {
                    (Some(sel), Some(open)) if sel == open => None,
                    (sel, _) => sel,
                };
            }
            Screen::Metadata => self.meta_expanded = !self.meta_expanded,
        }
    }

    fn apply_search(&mut self) {
        if let Some(doc) = &mut self.document {
            doc.set_search_text(&self.search_input);
            debug!(term = %self.search_input, visible = doc.filtered().len(), "search updated");
        }
        self.clamp_selection();
    }

    fn move_picker(&mut self, delta: isize) {
        let count = self.picker_items().len();
        if let Some(picker) = &mut self.picker {
            let target = picker.selection.saturating_add_signed(delta);
            picker.selection = target.min(count.saturating_sub(1));
        }
    }

    fn toggle_picker_value(&mut self) {
        let items = self.picker_items();
        let Some(picker) = &self.picker else { return };
        let Some((value, _)) = items.get(picker.selection) else {
            return;
        };
        let kind = picker.kind;
        let value = value.clone();
        if let Some(doc) = &mut self.document {
            match kind {
                PickerKind::Levels => doc.toggle_level(&value),
                PickerKind::Applications => doc.toggle_application(&value),
                PickerKind::Contexts => doc.toggle_context(&value),
            }
        }
        self.clamp_selection();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logsift_engine::Document;

    fn loaded_state() -> AppState {
        let text = r#"{"events": [
            {"id": "1", "level": "error", "source": "api", "message": "boom"},
            {"id": "2", "level": "info", "source": "api", "message": "fine"},
            {"id": "3", "level": "error", "source": "worker", "message": "boom again"}
        ]}"#;
        let mut state = AppState::new(PathBuf::from("fixture.json"));
        state.install(Document::load("fixture.json", text));
        state
    }

    #[test]
    fn test_install_error_resets_view() {
        let mut state = loaded_state();
        state.selection = 2;
        state.expanded_uid = Some("0-1".to_string());
        state.install(Document::load("bad.json", "not json"));
        assert!(state.document.is_none());
        assert!(state.error_message.is_some());
        assert_eq!(state.selection, 0);
        assert!(state.expanded_uid.is_none());
        assert_eq!(state.row_count(), 0);
    }

    #[test]
    fn test_selection_clamped_by_search() {
        let mut state = loaded_state();
        state.apply(Action::SelectionBottom);
        assert_eq!(state.selection, 2);
        state.apply(Action::OpenSearch);
        for c in "fine".chars() {
            state.apply(Action::SearchInput(c));
        }
        assert_eq!(state.row_count(), 1);
        assert_eq!(state.selection, 0);
    }

    #[test]
    fn test_expand_keyed_by_uid_survives_refilter() {
        let mut state = loaded_state();
        state.apply(Action::ToggleExpand);
        let uid = state.expanded_uid.clone().unwrap();
        state.apply(Action::OpenSearch);
        for c in "boom".chars() {
            state.apply(Action::SearchInput(c));
        }
        // Both "boom" events remain; the expanded one is still resolvable
        assert_eq!(state.expanded_event().unwrap().uid, uid);
    }

    #[test]
    fn test_picker_toggle_filters_document() {
        let mut state = loaded_state();
        state.apply(Action::OpenPicker(PickerKind::Levels));
        // Catalog is sorted: ERROR before INFO
        assert_eq!(state.picker_items()[0].0, "ERROR");
        state.apply(Action::PickerToggle);
        assert!(state.picker_items()[0].1);
        assert_eq!(state.row_count(), 2);
        state.apply(Action::ClosePicker);
        state.apply(Action::ClearFilters);
        assert_eq!(state.row_count(), 3);
    }

    #[test]
    fn test_reload_flag_round_trip() {
        let mut state = loaded_state();
        state.apply(Action::Reload);
        assert!(state.reload_requested);
    }
}
