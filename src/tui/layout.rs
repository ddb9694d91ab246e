//! Layout planning: header panel plus one CPU/memory band per entity.
//!
//! The plan is a pure function of its inputs. Rectangles may extend past a
//! tiny terminal; the renderer clips them to the frame.

use ratatui::layout::Rect;

use crate::config::{MIN_SERIES_CAPACITY, PLOT_MARGIN};
use crate::entity::TrackedEntity;

/// How bands share the space below the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// One band takes the full remaining height.
    Single,
    /// The remaining height is split evenly between bands.
    Stacked,
}

impl DisplayMode {
    /// Nodes and single selected containers fill the screen; pods with
    /// several selected containers stack.
    pub fn for_entity(entity: &TrackedEntity) -> Self {
        if entity.band_count() > 1 {
            DisplayMode::Stacked
        } else {
            DisplayMode::Single
        }
    }
}

/// CPU (left) and memory (right) plot areas for one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotBand {
    pub cpu: Rect,
    pub memory: Rect,
}

/// Full screen geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardLayout {
    pub header: Rect,
    pub bands: Vec<PlotBand>,
}

/// Samples kept per series for a terminal `width`.
///
/// Returns `None` when the terminal is too narrow to hold
/// [`MIN_SERIES_CAPACITY`] samples.
pub fn series_capacity(width: u16) -> Option<usize> {
    let capacity = i32::from(width / 2) - i32::from(PLOT_MARGIN);
    usize::try_from(capacity)
        .ok()
        .filter(|c| *c >= MIN_SERIES_CAPACITY)
}

/// Narrowest terminal that yields a usable series capacity.
pub fn min_width() -> u16 {
    (PLOT_MARGIN + MIN_SERIES_CAPACITY as u16) * 2
}

/// Computes panel rectangles.
pub fn plan(
    width: u16,
    height: u16,
    header_height: u16,
    band_count: usize,
    mode: DisplayMode,
) -> DashboardLayout {
    let header = Rect::new(0, 0, width, header_height);
    let remaining = height.saturating_sub(header_height);
    let band_height = match mode {
        DisplayMode::Single => remaining,
        DisplayMode::Stacked => {
            let count = u16::try_from(band_count.max(1)).unwrap_or(u16::MAX);
            remaining / count
        }
    };

    let left = width / 2;
    let right = width - left;
    let bands = (0..band_count)
        .map(|i| {
            let offset = u16::try_from(i).unwrap_or(u16::MAX);
            let y = header_height.saturating_add(offset.saturating_mul(band_height));
            PlotBand {
                cpu: Rect::new(0, y, left, band_height),
                memory: Rect::new(left, y, right, band_height),
            }
        })
        .collect();

    DashboardLayout { header, bands }
}
