use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::AppState;
use crate::ui::Theme;

/// Filter picker overlay: one filter dimension's distinct values with
/// toggle marks
pub struct PickerOverlay;

impl PickerOverlay {
    pub fn render(frame: &mut Frame, state: &mut AppState) {
        let Some(picker) = &state.picker else { return };
        let items = state.picker_items();
        let title = picker.kind.title();

        let area = frame.area();
        let popup_width = 44.min(area.width.saturating_sub(4));
        let popup_height = 20.min(area.height.saturating_sub(4));
        let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
        let y = area.y + (area.height.saturating_sub(popup_height)) / 2;
        let popup_area = Rect::new(x, y, popup_width, popup_height);

        frame.render_widget(Clear, popup_area);

        // Keep the selection inside the viewport
        let viewport = (popup_height as usize).saturating_sub(3);
        let selection = picker.selection;
        let mut scroll = picker.scroll;
        if viewport > 0 {
            if selection >= scroll + viewport {
                scroll = selection + 1 - viewport;
            }
            if selection < scroll {
                scroll = selection;
            }
        }
        if let Some(picker) = &mut state.picker {
            picker.scroll = scroll;
        }

        let mut lines = Vec::new();
        if items.is_empty() {
            lines.push(Line::from(Span::styled("  (no values)", Theme::text_dim())));
        }
        for (offset, (value, selected)) in
            items.iter().enumerate().skip(scroll).take(viewport.max(1))
        {
            let mark = if *selected { "[x]" } else { "[ ]" };
            let style = if offset == selection {
                Theme::list_item_selected()
            } else if *selected {
                Theme::text_highlight()
            } else {
                Theme::text()
            };
            lines.push(Line::from(Span::styled(
                format!(" {mark} {value}"),
                style,
            )));
        }
        lines.push(Line::from(Span::styled(
            " space toggle · esc close",
            Theme::text_dim(),
        )));

        let widget = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border_focused())
                .title(Span::styled(format!(" {title} "), Theme::title())),
        );
        frame.render_widget(widget, popup_area);
    }
}
