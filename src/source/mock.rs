//! Scripted in-memory source for tests.
//!
//! `MockSource` serves fixed descriptors and replays a queue of usage
//! readings, one per call, so tests can script sequences including failed
//! fetches. An exhausted queue behaves like an unreachable metrics API.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};

use crate::entity::{NodeDescriptor, PodDescriptor};

use super::{DescriptorSource, MetricsSource, PodUsage, RawUsage, SourceError};

/// In-memory cluster source with scripted usage readings.
#[derive(Debug, Default)]
pub struct MockSource {
    nodes: HashMap<String, NodeDescriptor>,
    pods: HashMap<(String, String), PodDescriptor>,
    /// `None` entries are failed fetches.
    node_script: RefCell<VecDeque<Option<RawUsage>>>,
    pod_script: RefCell<VecDeque<Option<PodUsage>>>,
    metrics_calls: Cell<usize>,
    descriptor_calls: Cell<usize>,
}

impl MockSource {
    /// Creates an empty mock source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a node descriptor.
    pub fn with_node(mut self, node: NodeDescriptor) -> Self {
        self.nodes.insert(node.name.clone(), node);
        self
    }

    /// Registers a pod descriptor.
    pub fn with_pod(mut self, pod: PodDescriptor) -> Self {
        self.pods
            .insert((pod.namespace.clone(), pod.name.clone()), pod);
        self
    }

    /// Queues a successful node reading.
    pub fn push_node_usage(&self, usage: RawUsage) {
        self.node_script.borrow_mut().push_back(Some(usage));
    }

    /// Queues a successful pod reading.
    pub fn push_pod_usage(&self, usage: PodUsage) {
        self.pod_script.borrow_mut().push_back(Some(usage));
    }

    /// Queues a failed fetch for the next node or pod reading.
    pub fn push_failure(&self) {
        self.node_script.borrow_mut().push_back(None);
        self.pod_script.borrow_mut().push_back(None);
    }

    /// Number of usage lookups served so far.
    pub fn metrics_calls(&self) -> usize {
        self.metrics_calls.get()
    }

    /// Number of node or pod spec lookups served so far.
    pub fn descriptor_calls(&self) -> usize {
        self.descriptor_calls.get()
    }

    fn next<T>(&self, script: &RefCell<VecDeque<Option<T>>>) -> Result<T, SourceError> {
        self.metrics_calls.set(self.metrics_calls.get() + 1);
        match script.borrow_mut().pop_front() {
            Some(Some(value)) => Ok(value),
            Some(None) => Err(SourceError::Api("scripted failure".to_string())),
            None => Err(SourceError::Api("metrics API unavailable".to_string())),
        }
    }
}

impl MetricsSource for MockSource {
    fn node_usage(&self, name: &str) -> Result<RawUsage, SourceError> {
        if !self.nodes.contains_key(name) {
            return Err(SourceError::NotFound {
                kind: "NodeMetrics",
                name: name.to_string(),
            });
        }
        self.next(&self.node_script)
    }

    fn pod_usage(&self, namespace: &str, name: &str) -> Result<PodUsage, SourceError> {
        if !self.pods.contains_key(&(namespace.to_string(), name.to_string())) {
            return Err(SourceError::NotFound {
                kind: "PodMetrics",
                name: format!("{namespace}/{name}"),
            });
        }
        self.next(&self.pod_script)
    }
}

impl DescriptorSource for MockSource {
    fn node(&self, name: &str) -> Result<NodeDescriptor, SourceError> {
        self.descriptor_calls.set(self.descriptor_calls.get() + 1);
        self.nodes
            .get(name)
            .cloned()
            .ok_or_else(|| SourceError::NotFound {
                kind: "node",
                name: name.to_string(),
            })
    }

    fn pod(&self, namespace: &str, name: &str) -> Result<PodDescriptor, SourceError> {
        self.descriptor_calls.set(self.descriptor_calls.get() + 1);
        self.pods
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| SourceError::NotFound {
                kind: "pod",
                name: format!("{namespace}/{name}"),
            })
    }
}
