//! Render composition.
//!
//! [`compose`] turns the current screen into an ordered list of panels
//! (header first, then CPU and memory per band). [`draw`] renders the whole
//! list in one frame; nothing is drawn incrementally.

use chrono::{DateTime, Local};
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::entity::{ContainerDescriptor, NodeDescriptor, TrackedEntity};
use crate::fmt::NumberFormat;
use crate::series::{Metric, SampleSeries};

use super::layout;
use super::state::{BandSeries, Generation, Screen};
use super::widgets::{render_header, render_notice, render_plot};

const QUIT_HINT: &str = " Press q to quit";

/// One drawable rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub area: Rect,
    pub content: PanelContent,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelContent {
    Header(HeaderPanel),
    Plot(PlotPanel),
    Notice(String),
}

/// Entity identity block.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderPanel {
    pub title: String,
    pub lines: Vec<String>,
    /// Wall time of the last successful poll.
    pub updated: Option<String>,
}

/// Line plot of one series.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotPanel {
    pub title: String,
    pub metric: Metric,
    /// `(index, value)` pairs, oldest first.
    pub points: Vec<(f64, f64)>,
    /// Upper x bound (capacity - 1).
    pub x_max: f64,
    /// Upper y bound; the lower bound is 0.
    pub y_max: f64,
    /// Bottom, middle and top y-axis labels.
    pub y_labels: [String; 3],
}

/// Builds the panel list for the current screen.
pub fn compose(
    entity: &TrackedEntity,
    screen: &Screen,
    format: &NumberFormat,
    updated: Option<DateTime<Local>>,
) -> Vec<Panel> {
    match screen {
        Screen::Ready(generation) => compose_generation(entity, generation, format, updated),
        Screen::TooNarrow { width, height } => vec![Panel {
            area: Rect::new(0, 0, *width, *height),
            content: PanelContent::Notice(format!(
                "Terminal too small: {} columns, need at least {}",
                width,
                layout::min_width()
            )),
        }],
    }
}

fn compose_generation(
    entity: &TrackedEntity,
    generation: &Generation,
    format: &NumberFormat,
    updated: Option<DateTime<Local>>,
) -> Vec<Panel> {
    let mut panels = Vec::with_capacity(1 + generation.series.len() * 2);
    let mut header = header(entity);
    header.updated = updated.map(|t| format!(" Updated {} ", t.format("%H:%M:%S")));
    panels.push(Panel {
        area: generation.layout.header,
        content: PanelContent::Header(header),
    });

    for (index, (band, series)) in generation
        .layout
        .bands
        .iter()
        .zip(&generation.series)
        .enumerate()
    {
        let (cpu_title, memory_title) = titles(entity, index, series, format);
        let memory_precision = match entity {
            TrackedEntity::Node(_) => 1,
            TrackedEntity::Pod(_) => 0,
        };
        panels.push(Panel {
            area: band.cpu,
            content: PanelContent::Plot(plot(cpu_title, Metric::Cpu, &series.cpu, 2, format)),
        });
        panels.push(Panel {
            area: band.memory,
            content: PanelContent::Plot(plot(
                memory_title,
                Metric::Memory,
                &series.memory,
                memory_precision,
                format,
            )),
        });
    }
    panels
}

fn header(entity: &TrackedEntity) -> HeaderPanel {
    match entity {
        TrackedEntity::Node(node) => HeaderPanel {
            title: " Node ".to_string(),
            lines: vec![
                format!(
                    " {} / {} / {} ",
                    node.name, node.kubelet_version, node.os_image
                ),
                QUIT_HINT.to_string(),
            ],
            updated: None,
        },
        TrackedEntity::Pod(pod) => HeaderPanel {
            title: " Namespace / Pod ".to_string(),
            lines: vec![
                format!(" {} / {}", pod.namespace, pod.name),
                QUIT_HINT.to_string(),
            ],
            updated: None,
        },
    }
}

fn titles(
    entity: &TrackedEntity,
    index: usize,
    series: &BandSeries,
    format: &NumberFormat,
) -> (String, String) {
    match entity {
        TrackedEntity::Node(node) => node_titles(node, series, format),
        TrackedEntity::Pod(pod) => match pod.containers.get(index) {
            Some(container) => container_titles(container, series, format),
            None => (String::new(), String::new()),
        },
    }
}

fn milli(format: &NumberFormat, cores: f64) -> String {
    format.format_unit(cores * 1000.0, 0, "m")
}

fn node_titles(
    node: &NodeDescriptor,
    series: &BandSeries,
    format: &NumberFormat,
) -> (String, String) {
    let cpu = format!(
        " {} CPU (Cap: {}m / All: {}m / Curr: {} / Max: {}) ",
        node.name,
        node.cpu_capacity_millis(),
        node.cpu_allocatable_millis(),
        milli(format, series.cpu.latest()),
        milli(format, series.cpu.running_max()),
    );
    let memory = format!(
        " {} Memory (Cap: {}Gi / All: {}Gi / Curr: {} / Max: {}) ",
        node.name,
        node.memory_capacity_giga(),
        node.memory_allocatable_giga(),
        format.format_unit(series.memory.latest(), 1, "Gi"),
        format.format_unit(series.memory.running_max(), 1, "Gi"),
    );
    (cpu, memory)
}

fn container_titles(
    container: &ContainerDescriptor,
    series: &BandSeries,
    format: &NumberFormat,
) -> (String, String) {
    let cpu = format!(
        " {} CPU (Req: {} / Lim: {} / Curr: {} / Max: {}) ",
        container.name,
        container.cpu_request,
        container.cpu_limit,
        milli(format, series.cpu.latest()),
        milli(format, series.cpu.running_max()),
    );
    let memory = format!(
        " {} Memory (Req: {} / Lim: {} / Curr: {} / Max: {}) ",
        container.name,
        container.memory_request,
        container.memory_limit,
        format.format_unit(series.memory.latest(), 0, "Mi"),
        format.format_unit(series.memory.running_max(), 0, "Mi"),
    );
    (cpu, memory)
}

fn plot(
    title: String,
    metric: Metric,
    series: &SampleSeries,
    precision: usize,
    format: &NumberFormat,
) -> PlotPanel {
    let snapshot = series.snapshot();
    let points: Vec<(f64, f64)> = snapshot
        .iter()
        .enumerate()
        .map(|(i, v)| (i as f64, v))
        .collect();

    let window_max = snapshot
        .iter()
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    let y_max = if window_max > 0.0 { window_max } else { 1.0 };

    PlotPanel {
        title,
        metric,
        points,
        x_max: snapshot.len().saturating_sub(1).max(1) as f64,
        y_max,
        y_labels: [
            format.format(0.0, precision),
            format.format(y_max / 2.0, precision),
            format.format(y_max, precision),
        ],
    }
}

/// Draws every panel, clipped to the frame.
pub fn draw(frame: &mut Frame, panels: &[Panel]) {
    let screen = frame.area();
    for panel in panels {
        let area = panel.area.intersection(screen);
        if area.is_empty() {
            continue;
        }
        match &panel.content {
            PanelContent::Header(header) => render_header(frame, area, header),
            PanelContent::Plot(plot) => render_plot(frame, area, plot),
            PanelContent::Notice(text) => render_notice(frame, area, text),
        }
    }
}
