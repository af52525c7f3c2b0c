use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::state::{AppState, PickerKind, Screen};

/// All possible actions in the application (command pattern)
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Quit,
    ToggleHelp,
    SwitchScreen(Screen),

    // List navigation
    SelectionUp,
    SelectionDown,
    PageUp,
    PageDown,
    SelectionTop,
    SelectionBottom,
    ToggleExpand,

    // Free-text search
    OpenSearch,
    CloseSearch,
    AcceptSearch,
    SearchInput(char),
    SearchBackspace,

    // Filter pickers
    OpenPicker(PickerKind),
    ClosePicker,
    PickerUp,
    PickerDown,
    PickerToggle,

    ClearFilters,
    Reload,
    DismissError,
}

/// Translate a key press into an action for the current mode.
///
/// Modal surfaces (help, picker, search input) capture keys first; the
/// remaining bindings apply to whichever screen is active.
pub fn map_key(state: &AppState, key: KeyEvent) -> Option<Action> {
    if state.help_visible {
        return match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            _ => Some(Action::ToggleHelp),
        };
    }

    if state.picker.is_some() {
        return match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Some(Action::ClosePicker),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::PickerUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::PickerDown),
            KeyCode::Char(' ') | KeyCode::Enter => Some(Action::PickerToggle),
            _ => None,
        };
    }

    if state.search_active {
        return match key.code {
            KeyCode::Esc => Some(Action::CloseSearch),
            KeyCode::Enter => Some(Action::AcceptSearch),
            KeyCode::Backspace => Some(Action::SearchBackspace),
            KeyCode::Char(c) => Some(Action::SearchInput(c)),
            _ => None,
        };
    }

    if state.error_message.is_some() && key.code == KeyCode::Esc {
        return Some(Action::DismissError);
    }

    match key.code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('?') => Some(Action::ToggleHelp),
        KeyCode::Char('m') => Some(Action::SwitchScreen(match state.screen {
            Screen::Events => Screen::Metadata,
            Screen::Metadata => Screen::Events,
        })),

        KeyCode::Up | KeyCode::Char('k') => Some(Action::SelectionUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::SelectionDown),
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Action::PageUp)
        }
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Action::PageDown)
        }
        KeyCode::PageUp => Some(Action::PageUp),
        KeyCode::PageDown => Some(Action::PageDown),
        KeyCode::Char('g') | KeyCode::Home => Some(Action::SelectionTop),
        KeyCode::Char('G') | KeyCode::End => Some(Action::SelectionBottom),
        KeyCode::Enter => Some(Action::ToggleExpand),

        KeyCode::Char('/') => Some(Action::OpenSearch),
        KeyCode::Char('l') => Some(Action::OpenPicker(PickerKind::Levels)),
        KeyCode::Char('a') => Some(Action::OpenPicker(PickerKind::Applications)),
        KeyCode::Char('x') => Some(Action::OpenPicker(PickerKind::Contexts)),
        KeyCode::Char('c') => Some(Action::ClearFilters),
        KeyCode::Char('r') => Some(Action::Reload),
        _ => None,
    }
}
