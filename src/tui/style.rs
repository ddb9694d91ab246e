//! Color scheme and styles.

use ratatui::style::{Color, Modifier, Style};

use crate::series::Metric;

/// Dashboard color palette.
pub struct Theme;

impl Theme {
    pub const FG: Color = Color::White;
    pub const TITLE: Color = Color::Cyan;
    pub const HEADER_BORDER: Color = Color::Yellow;
    pub const AXIS: Color = Color::White;
    pub const NOTICE: Color = Color::Red;

    // Metrics colors
    pub const CPU_COLOR: Color = Color::Green;
    pub const MEM_COLOR: Color = Color::Yellow;
}

/// Pre-defined styles.
pub struct Styles;

impl Styles {
    /// Default text style.
    pub fn default() -> Style {
        Style::default().fg(Theme::FG)
    }

    /// Block title style.
    pub fn title() -> Style {
        Style::default().fg(Theme::TITLE)
    }

    /// Header border style.
    pub fn header_border() -> Style {
        Style::default().fg(Theme::HEADER_BORDER)
    }

    /// Chart axis style.
    pub fn axis() -> Style {
        Style::default().fg(Theme::AXIS)
    }

    /// Plot line style for a metric.
    pub fn metric(metric: Metric) -> Style {
        match metric {
            Metric::Cpu => Style::default().fg(Theme::CPU_COLOR),
            Metric::Memory => Style::default().fg(Theme::MEM_COLOR),
        }
    }

    /// Warning text style.
    pub fn notice() -> Style {
        Style::default()
            .fg(Theme::NOTICE)
            .add_modifier(Modifier::BOLD)
    }
}
