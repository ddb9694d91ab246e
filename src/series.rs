//! Fixed-capacity rolling sample buffers.
//!
//! One [`SampleSeries`] exists per (entity, metric) pair. The buffer never
//! changes length after allocation: every push drops the oldest sample and
//! appends the newest one.

use std::collections::VecDeque;

/// Metric plotted by a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Cpu,
    Memory,
}

/// Rolling buffer of samples plus the running maximum.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSeries {
    buffer: VecDeque<f64>,
    running_max: f64,
}

/// Read-only view of a series for rendering.
#[derive(Debug, Clone, Copy)]
pub struct SeriesSnapshot<'a> {
    /// Samples, oldest first. Split in two because the buffer is a ring.
    pub values: (&'a [f64], &'a [f64]),
    /// Largest sample pushed since allocation.
    pub max: f64,
}

impl SeriesSnapshot<'_> {
    /// Iterates samples oldest first.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.0.iter().chain(self.values.1.iter()).copied()
    }

    /// Number of samples in the view.
    pub fn len(&self) -> usize {
        self.values.0.len() + self.values.1.len()
    }

    /// Returns `true` for a zero-capacity series.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SampleSeries {
    /// Allocates a zero-filled series of `capacity` samples with a zero maximum.
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: std::iter::repeat_n(0.0, capacity).collect(),
            running_max: 0.0,
        }
    }

    /// Appends `value`, dropping the oldest sample.
    ///
    /// Values are accepted verbatim; NaN never raises the maximum.
    pub fn push(&mut self, value: f64) {
        if value > self.running_max {
            self.running_max = value;
        }
        if self.buffer.is_empty() {
            return;
        }
        self.buffer.pop_front();
        self.buffer.push_back(value);
    }

    /// Returns the current samples and running maximum.
    pub fn snapshot(&self) -> SeriesSnapshot<'_> {
        SeriesSnapshot {
            values: self.buffer.as_slices(),
            max: self.running_max,
        }
    }

    /// Number of retained samples.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Largest value pushed since allocation.
    pub fn running_max(&self) -> f64 {
        self.running_max
    }

    /// Most recently pushed sample, or 0 for a fresh series.
    pub fn latest(&self) -> f64 {
        self.buffer.back().copied().unwrap_or(0.0)
    }
}
