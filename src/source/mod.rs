//! Source abstraction for cluster data.
//!
//! The dashboard talks to the cluster through two traits so it can run
//! against the real API server or a scripted mock:
//! - [`DescriptorSource`]: one-shot lookup of static node/pod specs
//! - [`MetricsSource`]: point lookup of current usage
//!
//! `KubeSource` implements both against the Kubernetes API and the
//! `metrics.k8s.io` aggregation layer.

mod cluster;
pub mod mock;

pub use cluster::{ConnectOptions, KubeSource};

use std::collections::BTreeMap;

use thiserror::Error;

use crate::entity::{NodeDescriptor, PodDescriptor};
use crate::quantity::QuantityError;

/// Errors returned by cluster sources.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The requested object does not exist.
    #[error("{kind} \"{name}\" not found")]
    NotFound { kind: &'static str, name: String },
    /// The API server rejected or failed the request.
    #[error("API request failed: {0}")]
    Api(String),
    /// The response could not be decoded.
    #[error("failed to decode {kind}: {message}")]
    Decode { kind: &'static str, message: String },
    /// A resource quantity in the response was malformed.
    #[error(transparent)]
    Quantity(#[from] QuantityError),
    /// The client could not be constructed.
    #[error("failed to create cluster client: {0}")]
    Client(String),
}

/// Raw usage as reported by the metrics API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawUsage {
    /// CPU usage in milli-cores.
    pub cpu_millis: i64,
    /// Memory usage in bytes.
    pub memory_bytes: i64,
}

/// Usage for every container of a pod, keyed by container name.
pub type PodUsage = BTreeMap<String, RawUsage>;

/// Current usage lookups.
pub trait MetricsSource {
    /// Returns the current usage of a node.
    fn node_usage(&self, name: &str) -> Result<RawUsage, SourceError>;

    /// Returns the current usage of every container in a pod.
    fn pod_usage(&self, namespace: &str, name: &str) -> Result<PodUsage, SourceError>;
}

/// Static spec lookups.
pub trait DescriptorSource {
    /// Fetches a node's versions and capacity.
    fn node(&self, name: &str) -> Result<NodeDescriptor, SourceError>;

    /// Fetches a pod's declared containers with their requests and limits.
    fn pod(&self, namespace: &str, name: &str) -> Result<PodDescriptor, SourceError>;

    /// Namespace used when none is given on the command line.
    fn default_namespace(&self) -> &str {
        "default"
    }
}
