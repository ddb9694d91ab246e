//! TUI widgets for the dashboard.

mod header;
mod notice;
mod plot;

pub use header::render_header;
pub use notice::render_notice;
pub use plot::render_plot;
