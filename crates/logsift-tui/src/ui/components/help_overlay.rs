use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

/// Help overlay showing keybindings
pub struct HelpOverlay;

impl HelpOverlay {
    pub fn render(frame: &mut Frame) {
        let area = frame.area();

        let popup_width = 46.min(area.width.saturating_sub(4));
        let popup_height = 21.min(area.height.saturating_sub(4));
        let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
        let y = area.y + (area.height.saturating_sub(popup_height)) / 2;
        let popup_area = Rect::new(x, y, popup_width, popup_height);

        frame.render_widget(Clear, popup_area);

        let help_text = vec![
            Line::from(Span::styled(
                "Keybindings",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled("Navigation", Style::default().fg(Color::Yellow))),
            Self::key_line("j/↓", "Next row"),
            Self::key_line("k/↑", "Previous row"),
            Self::key_line("Ctrl+d", "Page down"),
            Self::key_line("Ctrl+u", "Page up"),
            Self::key_line("g/G", "First / last row"),
            Self::key_line("Enter", "Expand raw JSON"),
            Self::key_line("m", "Events / metadata"),
            Line::from(""),
            Line::from(Span::styled("Filters", Style::default().fg(Color::Yellow))),
            Self::key_line("/", "Free-text search"),
            Self::key_line("l", "Level picker"),
            Self::key_line("a", "Application picker"),
            Self::key_line("x", "Context picker"),
            Self::key_line("c", "Clear all filters"),
            Line::from(""),
            Self::key_line("r", "Reload file"),
            Self::key_line("?", "Toggle this help"),
            Self::key_line("q", "Quit"),
        ];

        let help_widget = Paragraph::new(help_text).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(Span::styled(
                    " Help ",
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )),
        );

        frame.render_widget(help_widget, popup_area);
    }

    fn key_line<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
        Line::from(vec![
            Span::styled(format!("  {key:>8}"), Style::default().fg(Color::Green)),
            Span::raw(format!("  {desc}")),
        ])
    }
}
