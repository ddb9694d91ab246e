//! Header widget showing the tracked entity.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::render::HeaderPanel;
use crate::tui::style::Styles;

/// Renders the header block.
pub fn render_header(frame: &mut Frame, area: Rect, header: &HeaderPanel) {
    let mut block = Block::default()
        .title(Span::styled(header.title.as_str(), Styles::title()))
        .borders(Borders::ALL)
        .border_style(Styles::header_border());
    if let Some(updated) = &header.updated {
        block = block.title(Line::from(Span::styled(updated.as_str(), Styles::title())).right_aligned());
    }

    let lines: Vec<Line> = header
        .lines
        .iter()
        .map(|l| Line::from(Span::styled(l.as_str(), Styles::default())))
        .collect();
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
