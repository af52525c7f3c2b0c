use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthChar;

use crate::app::AppState;
use crate::ui::Theme;

const TIMESTAMP_COL: usize = 24;
const LEVEL_COL: usize = 9;
const APPLICATION_COL: usize = 14;
const CONTEXT_COL: usize = 14;

/// Normalized event list with optional search bar and raw-JSON pane
pub struct EventsScreen;

impl EventsScreen {
    pub fn render(frame: &mut Frame, area: Rect, state: &mut AppState) {
        let Some(doc) = &state.document else { return };
        let show_search = state.search_active || !doc.filter().search_term().is_empty();
        let show_expanded = state.expanded_event().is_some();

        let mut constraints = Vec::new();
        if show_search {
            constraints.push(Constraint::Length(3));
        }
        constraints.push(Constraint::Min(3));
        if show_expanded {
            constraints.push(Constraint::Percentage(50));
        }
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        let mut idx = 0;
        let search_chunk = if show_search {
            idx += 1;
            Some(chunks[0])
        } else {
            None
        };
        let list_chunk = chunks[idx];
        let expanded_chunk = if show_expanded { Some(chunks[idx + 1]) } else { None };

        // Scroll bookkeeping happens before rendering borrows the document
        let viewport = (list_chunk.height as usize).saturating_sub(2);
        if viewport > 0 {
            if state.selection >= state.scroll + viewport {
                state.scroll = state.selection + 1 - viewport;
            }
            if state.selection < state.scroll {
                state.scroll = state.selection;
            }
        }

        if let Some(chunk) = search_chunk {
            Self::render_search_bar(frame, chunk, state);
        }
        Self::render_list(frame, list_chunk, state, viewport);
        if let Some(chunk) = expanded_chunk {
            Self::render_expanded(frame, chunk, state);
        }
    }

    fn render_search_bar(frame: &mut Frame, area: Rect, state: &AppState) {
        let (prompt, style) = if state.search_active {
            ("search> ", Theme::text_highlight())
        } else {
            ("search: ", Theme::text_dim())
        };
        let line = Line::from(vec![
            Span::styled(prompt, style),
            Span::styled(state.search_input.clone(), Theme::text()),
            Span::styled(
                if state.search_active { "▌" } else { "" },
                Theme::text_highlight(),
            ),
        ]);
        let border = if state.search_active {
            Theme::border_focused()
        } else {
            Theme::border()
        };
        let widget = Paragraph::new(line)
            .block(Block::default().borders(Borders::ALL).border_style(border));
        frame.render_widget(widget, area);
    }

    fn render_list(frame: &mut Frame, area: Rect, state: &AppState, viewport: usize) {
        let Some(doc) = &state.document else { return };
        let events = doc.filtered();

        let mut lines = Vec::new();
        if events.is_empty() {
            let note = if doc.events().is_empty() {
                "no events found in this file"
            } else {
                "no events match the current filters"
            };
            lines.push(Line::from(Span::styled(
                format!("  {note}"),
                Theme::text_dim(),
            )));
        }
        for (row, event) in events
            .iter()
            .enumerate()
            .skip(state.scroll)
            .take(viewport.max(1))
        {
            let selected = row == state.selection;
            let marker = if state.expanded_uid.as_deref() == Some(event.uid.as_str()) {
                "▾"
            } else {
                " "
            };
            let level_style = if selected {
                Theme::list_item_selected()
            } else {
                ratatui::style::Style::default().fg(event.tone.color())
            };
            let text_style = if selected {
                Theme::list_item_selected()
            } else {
                Theme::text()
            };
            let dim_style = if selected {
                Theme::list_item_selected()
            } else {
                Theme::text_dim()
            };
            lines.push(Line::from(vec![
                Span::styled(format!("{marker} "), dim_style),
                Span::styled(fit(&event.timestamp, TIMESTAMP_COL), dim_style),
                Span::styled(fit(&event.level, LEVEL_COL), level_style),
                Span::styled(fit(&event.application, APPLICATION_COL), text_style),
                Span::styled(fit(&event.context, CONTEXT_COL), dim_style),
                Span::styled(event.message.clone(), text_style),
            ]));
        }

        let title = format!(" Events {}/{} ", events.len(), doc.events().len());
        let widget = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border())
                .title(Span::styled(title, Theme::title())),
        );
        frame.render_widget(widget, area);
    }

    fn render_expanded(frame: &mut Frame, area: Rect, state: &AppState) {
        let Some(event) = state.expanded_event() else { return };
        let title = format!(" {} ", event.line_title());
        let widget = Paragraph::new(event.raw_json.as_str())
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Theme::border_focused())
                    .title(Span::styled(
                        fit(&title, area.width as usize),
                        Theme::title(),
                    )),
            );
        frame.render_widget(widget, area);
    }
}

/// Pad or truncate to an exact display width, leaving one trailing space
fn fit(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0usize;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width.saturating_sub(1) {
            break;
        }
        out.push(ch);
        used += w;
    }
    while used < width {
        out.push(' ');
        used += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_pads_and_truncates() {
        assert_eq!(fit("ab", 5), "ab   ");
        assert_eq!(fit("abcdefgh", 5), "abcd ");
        assert_eq!(fit("", 3), "   ");
    }
}
