//! Line plot widget for one metric series.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType};

use crate::tui::render::PlotPanel;
use crate::tui::style::Styles;

/// Renders a bordered braille line chart. X labels are hidden.
pub fn render_plot(frame: &mut Frame, area: Rect, plot: &PlotPanel) {
    let dataset = Dataset::default()
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Styles::metric(plot.metric))
        .data(&plot.points);

    let chart = Chart::new(vec![dataset])
        .block(
            Block::default()
                .title(Span::styled(plot.title.as_str(), Styles::title()))
                .borders(Borders::ALL),
        )
        .x_axis(
            Axis::default()
                .style(Styles::axis())
                .bounds([0.0, plot.x_max]),
        )
        .y_axis(
            Axis::default()
                .style(Styles::axis())
                .bounds([0.0, plot.y_max])
                .labels(plot.y_labels.iter().map(|l| Span::from(l.as_str()))),
        );
    frame.render_widget(chart, area);
}
