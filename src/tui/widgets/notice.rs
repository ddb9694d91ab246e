//! Full-screen notice shown when plots cannot be laid out.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph, Wrap};

use crate::tui::style::Styles;

/// Renders `text` centered vertically, wrapped to the area.
pub fn render_notice(frame: &mut Frame, area: Rect, text: &str) {
    frame.render_widget(Clear, area);

    let top = area.height.saturating_sub(1) / 2;
    let inner = Rect::new(area.x, area.y + top, area.width, area.height - top);
    let paragraph = Paragraph::new(Line::from(Span::styled(text, Styles::notice())))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, inner);
}
