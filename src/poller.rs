//! Metrics polling and unit conversion.
//!
//! Raw API usage is converted into display units:
//! - CPU: milli-cores to cores (`/ 1000`)
//! - Node memory: mega-scaled bytes to Gi (`scaled_value(Mega) / 1024`)
//! - Container memory: bytes to Mi (integer `bytes / (1024 * 1024)`)
//!
//! Node and container memory deliberately use different units, so plots read
//! in Gi for nodes and Mi for containers.

use std::collections::BTreeMap;

use tracing::trace;

use crate::entity::TrackedEntity;
use crate::source::{MetricsSource, RawUsage, SourceError};

const BYTES_PER_MEGA: i64 = 1_000_000;
const BYTES_PER_MI: i64 = 1024 * 1024;

/// One sample per metric, in display units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Sample {
    /// Cores.
    pub cpu: f64,
    /// Gi for nodes, Mi for containers.
    pub memory: f64,
}

/// Result of one poll.
#[derive(Debug, Clone, PartialEq)]
pub enum Reading {
    Node(Sample),
    /// Every container reported by the metrics API, keyed by name.
    Pod(BTreeMap<String, Sample>),
}

impl Reading {
    /// Samples for the entity's bands, in band order.
    ///
    /// Containers absent from a pod reading count as zero for this tick.
    pub fn band_samples(&self, entity: &TrackedEntity) -> Vec<Sample> {
        match self {
            Reading::Node(sample) => vec![*sample],
            Reading::Pod(samples) => entity
                .band_names()
                .into_iter()
                .map(|name| samples.get(name).copied().unwrap_or_default())
                .collect(),
        }
    }
}

/// Converts milli-cores to cores.
pub fn cpu_cores(millis: i64) -> f64 {
    millis as f64 / 1000.0
}

/// Converts node memory bytes to Gi via the mega scale, rounding the mega value up.
pub fn node_memory_gi(bytes: i64) -> f64 {
    let mega = bytes / BYTES_PER_MEGA + i64::from(bytes % BYTES_PER_MEGA > 0);
    mega as f64 / 1024.0
}

/// Converts container memory bytes to whole Mi.
pub fn container_memory_mi(bytes: i64) -> f64 {
    (bytes / BYTES_PER_MI) as f64
}

fn node_sample(usage: RawUsage) -> Sample {
    Sample {
        cpu: cpu_cores(usage.cpu_millis),
        memory: node_memory_gi(usage.memory_bytes),
    }
}

fn container_sample(usage: RawUsage) -> Sample {
    Sample {
        cpu: cpu_cores(usage.cpu_millis),
        memory: container_memory_mi(usage.memory_bytes),
    }
}

/// Fetches current usage for `entity`.
///
/// Pods are fetched with one call covering all containers; filtering down to
/// the selected containers happens in [`Reading::band_samples`].
pub fn poll<S: MetricsSource + ?Sized>(
    source: &S,
    entity: &TrackedEntity,
) -> Result<Reading, SourceError> {
    let reading = match entity {
        TrackedEntity::Node(node) => Reading::Node(node_sample(source.node_usage(&node.name)?)),
        TrackedEntity::Pod(pod) => Reading::Pod(
            source
                .pod_usage(&pod.namespace, &pod.name)?
                .into_iter()
                .map(|(name, usage)| (name, container_sample(usage)))
                .collect(),
        ),
    };
    trace!(entity = %entity.describe(), ?reading, "polled");
    Ok(reading)
}
