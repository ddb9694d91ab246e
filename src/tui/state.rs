//! Dashboard state: one generation of layout plus series.
//!
//! A generation is built from the terminal size and the tracked entity. A
//! resize replaces it wholesale, so history and maxima start over.

use crate::config::DashboardConfig;
use crate::entity::TrackedEntity;
use crate::poller::Sample;
use crate::series::SampleSeries;

use super::layout::{self, DashboardLayout, DisplayMode};

/// CPU and memory series for one band.
#[derive(Debug, Clone, PartialEq)]
pub struct BandSeries {
    pub cpu: SampleSeries,
    pub memory: SampleSeries,
}

impl BandSeries {
    fn new(capacity: usize) -> Self {
        Self {
            cpu: SampleSeries::new(capacity),
            memory: SampleSeries::new(capacity),
        }
    }
}

/// Layout and series sized for one terminal geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    pub layout: DashboardLayout,
    /// One entry per band, in band order.
    pub series: Vec<BandSeries>,
    pub capacity: usize,
}

impl Generation {
    /// Pushes one sample per band. Extra samples are ignored and missing
    /// ones leave their band untouched.
    pub fn record(&mut self, samples: &[Sample]) {
        for (band, sample) in self.series.iter_mut().zip(samples) {
            band.cpu.push(sample.cpu);
            band.memory.push(sample.memory);
        }
    }
}

/// What the dashboard can show at the current size.
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Ready(Generation),
    /// Too narrow for a single sample; a notice is shown instead of plots.
    TooNarrow { width: u16, height: u16 },
}

impl Screen {
    /// Builds a fresh generation for `width` x `height`.
    pub fn build(entity: &TrackedEntity, config: &DashboardConfig, width: u16, height: u16) -> Self {
        let Some(capacity) = layout::series_capacity(width) else {
            return Screen::TooNarrow { width, height };
        };
        let band_count = entity.band_count();
        let layout = layout::plan(
            width,
            height,
            config.header_height,
            band_count,
            DisplayMode::for_entity(entity),
        );
        let series = (0..band_count).map(|_| BandSeries::new(capacity)).collect();
        Screen::Ready(Generation {
            layout,
            series,
            capacity,
        })
    }

    pub fn generation(&self) -> Option<&Generation> {
        match self {
            Screen::Ready(generation) => Some(generation),
            Screen::TooNarrow { .. } => None,
        }
    }

    pub fn generation_mut(&mut self) -> Option<&mut Generation> {
        match self {
            Screen::Ready(generation) => Some(generation),
            Screen::TooNarrow { .. } => None,
        }
    }
}
