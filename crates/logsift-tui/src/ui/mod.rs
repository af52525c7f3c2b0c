//! Rendering

pub mod components;
pub mod screens;
mod theme;

pub use theme::Theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::app::{AppState, Screen};
use components::{HelpOverlay, PickerOverlay, StatusBar};
use screens::{EventsScreen, MetadataScreen};

/// Draw one frame
pub fn render(frame: &mut Frame, state: &mut AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, chunks[0], state);

    if state.document.is_some() {
        match state.screen {
            Screen::Events => EventsScreen::render(frame, chunks[1], state),
            Screen::Metadata => MetadataScreen::render(frame, chunks[1], state),
        }
        render_status_bar(frame, chunks[2], state);
    } else {
        render_empty_body(frame, chunks[1], state);
        frame.render_widget(
            StatusBar::new().hints(vec![("r", "Reload"), ("q", "Quit")]),
            chunks[2],
        );
    }

    if state.picker.is_some() {
        PickerOverlay::render(frame, state);
    }
    if state.help_visible {
        HelpOverlay::render(frame);
    }
}

fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut spans = vec![Span::styled("logsift", Theme::title())];
    if let Some(doc) = &state.document {
        let counts = doc.level_counts();
        spans.extend([
            Span::styled(" │ ", Theme::text_dim()),
            Span::styled(doc.file_name().to_string(), Theme::text()),
            Span::styled(" │ ", Theme::text_dim()),
            Span::styled(doc.application().to_string(), Theme::text_highlight()),
            Span::styled(" │ ", Theme::text_dim()),
            Span::styled(format!("{} events", counts.total), Theme::text()),
        ]);
        if counts.error > 0 {
            spans.push(Span::styled(" │ ", Theme::text_dim()));
            spans.push(Span::styled(
                format!("{} errors", counts.error),
                Theme::error(),
            ));
        }
        if counts.warning > 0 {
            spans.push(Span::styled(" │ ", Theme::text_dim()));
            spans.push(Span::styled(
                format!("{} warnings", counts.warning),
                Theme::text_highlight(),
            ));
        }
    } else {
        spans.push(Span::styled(" │ ", Theme::text_dim()));
        spans.push(Span::styled(
            state.file_path.display().to_string(),
            Theme::text_dim(),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border()),
    );
    frame.render_widget(header, area);
}

fn render_empty_body(frame: &mut Frame, area: Rect, state: &AppState) {
    let lines = match &state.error_message {
        Some(message) => vec![
            Line::from(""),
            Line::from(Span::styled(format!("  ✗ {message}"), Theme::error())),
            Line::from(""),
            Line::from(Span::styled(
                "  press r to reload the file, q to quit",
                Theme::text_dim(),
            )),
        ],
        None => vec![
            Line::from(""),
            Line::from(Span::styled("  no file loaded", Theme::text_dim())),
        ],
    };
    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border()),
    );
    frame.render_widget(widget, area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(doc) = &state.document else { return };
    let hints: Vec<(&str, &str)> = match state.screen {
        Screen::Events => vec![
            ("/", "search"),
            ("l/a/x", "pickers"),
            ("c", "clear"),
            ("enter", "expand"),
            ("m", "metadata"),
            ("?", "help"),
        ],
        Screen::Metadata => vec![
            ("enter", "raw json"),
            ("m", "events"),
            ("?", "help"),
        ],
    };

    let right = if doc.filter().is_active() {
        format!(
            "{}/{} visible · filters on",
            doc.filtered().len(),
            doc.events().len()
        )
    } else {
        format!("{} events", doc.events().len())
    };

    frame.render_widget(StatusBar::new().hints(hints).right(right), area);
}
