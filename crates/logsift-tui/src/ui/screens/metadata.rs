use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use logsift_engine::{Document, MetaEntry, PrettyMetaBlock};

use crate::app::AppState;
use crate::ui::Theme;

/// One selectable row on the metadata screen
enum MetaRow<'a> {
    Block(&'a PrettyMetaBlock),
    Entry(&'a MetaEntry),
}

fn meta_rows(doc: &Document) -> Vec<MetaRow<'_>> {
    doc.meta_blocks()
        .iter()
        .map(MetaRow::Block)
        .chain(doc.meta_entries().iter().map(MetaRow::Entry))
        .collect()
}

/// Metadata screen: pretty blocks first, then generic entries, with a
/// detail pane for the selected row
pub struct MetadataScreen;

impl MetadataScreen {
    pub fn render(frame: &mut Frame, area: Rect, state: &mut AppState) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Percentage(55)])
            .split(area);

        // Scroll bookkeeping before rendering borrows the document
        let viewport = (chunks[0].height as usize).saturating_sub(2);
        if viewport > 0 {
            if state.meta_selection >= state.meta_scroll + viewport {
                state.meta_scroll = state.meta_selection + 1 - viewport;
            }
            if state.meta_selection < state.meta_scroll {
                state.meta_scroll = state.meta_selection;
            }
        }

        Self::render_list(frame, chunks[0], state, viewport);
        Self::render_detail(frame, chunks[1], state);
    }

    fn render_list(frame: &mut Frame, area: Rect, state: &AppState, viewport: usize) {
        let Some(doc) = &state.document else { return };
        let rows = meta_rows(doc);

        let mut lines = Vec::new();
        if rows.is_empty() {
            lines.push(Line::from(Span::styled(
                "  no metadata in this file",
                Theme::text_dim(),
            )));
        }
        for (idx, row) in rows
            .iter()
            .enumerate()
            .skip(state.meta_scroll)
            .take(viewport.max(1))
        {
            let selected = idx == state.meta_selection;
            let (key_style, value_style) = if selected {
                (Theme::list_item_selected(), Theme::list_item_selected())
            } else {
                (Theme::text_highlight(), Theme::text())
            };
            let line = match row {
                MetaRow::Block(block) => Line::from(vec![
                    Span::styled(format!(" ◆ {:<14}", block.key), key_style),
                    Span::styled(format!("{} — {}", block.title, block.subtitle), value_style),
                ]),
                MetaRow::Entry(entry) => Line::from(vec![
                    Span::styled(format!("   {:<14}", entry.key), key_style),
                    Span::styled(entry.value.clone(), value_style),
                ]),
            };
            lines.push(line);
        }

        let widget = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border())
                .title(Span::styled(" Metadata ", Theme::title())),
        );
        frame.render_widget(widget, area);
    }

    fn render_detail(frame: &mut Frame, area: Rect, state: &AppState) {
        let Some(doc) = &state.document else { return };
        let rows = meta_rows(doc);
        let Some(row) = rows.get(state.meta_selection) else {
            let widget = Paragraph::new("").block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Theme::border()),
            );
            frame.render_widget(widget, area);
            return;
        };

        let (title, lines) = if state.meta_expanded {
            // Raw JSON is rendered lazily by the entry itself and cached
            let raw = match row {
                MetaRow::Block(block) => block.raw_json(),
                MetaRow::Entry(entry) => entry.raw_json(),
            };
            let lines: Vec<Line> = raw.lines().map(Line::from).collect();
            (" Raw JSON (enter to collapse) ".to_string(), lines)
        } else {
            match row {
                MetaRow::Block(block) => {
                    let mut lines = Vec::new();
                    for fact in &block.facts {
                        lines.push(Line::from(vec![
                            Span::styled(format!("  {:<22}", fact.label), Theme::text_dim()),
                            Span::styled(fact.value.clone(), Theme::text()),
                        ]));
                    }
                    if !block.highlights.is_empty() {
                        lines.push(Line::from(""));
                        for highlight in &block.highlights {
                            lines.push(Line::from(Span::styled(
                                format!("  • {highlight}"),
                                Theme::text_highlight(),
                            )));
                        }
                    }
                    (format!(" {} — {} ", block.title, block.subtitle), lines)
                }
                MetaRow::Entry(entry) => {
                    let lines = vec![Line::from(Span::styled(
                        format!("  {}", entry.value),
                        Theme::text(),
                    ))];
                    (format!(" {} ", entry.key), lines)
                }
            }
        };

        let widget = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border_focused())
                .title(Span::styled(title, Theme::title())),
        );
        frame.render_widget(widget, area);
    }
}
