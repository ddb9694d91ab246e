//! Tracked entities: a single node, or a pod narrowed to selected containers.
//!
//! An entity is resolved once at startup from its static descriptor and stays
//! immutable for the lifetime of the dashboard.

use crate::quantity::{Quantity, scale};

/// Static node descriptor: identity, versions and capacity.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDescriptor {
    pub name: String,
    pub kubelet_version: String,
    pub os_image: String,
    pub cpu_capacity: Quantity,
    pub cpu_allocatable: Quantity,
    pub memory_capacity: Quantity,
    pub memory_allocatable: Quantity,
}

/// Static container descriptor: requests and limits as declared in the pod spec.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerDescriptor {
    pub name: String,
    pub cpu_request: Quantity,
    pub cpu_limit: Quantity,
    pub memory_request: Quantity,
    pub memory_limit: Quantity,
}

impl ContainerDescriptor {
    /// Descriptor with no requests or limits.
    pub fn unbounded(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cpu_request: Quantity::zero(),
            cpu_limit: Quantity::zero(),
            memory_request: Quantity::zero(),
            memory_limit: Quantity::zero(),
        }
    }
}

/// Static pod descriptor with every declared container.
#[derive(Debug, Clone, PartialEq)]
pub struct PodDescriptor {
    pub namespace: String,
    pub name: String,
    pub containers: Vec<ContainerDescriptor>,
}

/// A pod narrowed to the containers that will be plotted.
#[derive(Debug, Clone, PartialEq)]
pub struct PodSelection {
    pub namespace: String,
    pub name: String,
    /// Selected containers, in pod spec order. Never empty.
    pub containers: Vec<ContainerDescriptor>,
}

/// What the dashboard monitors.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackedEntity {
    Node(NodeDescriptor),
    Pod(PodSelection),
}

impl TrackedEntity {
    /// Number of CPU/memory bands to lay out.
    pub fn band_count(&self) -> usize {
        match self {
            TrackedEntity::Node(_) => 1,
            TrackedEntity::Pod(pod) => pod.containers.len(),
        }
    }

    /// Band labels in display order.
    pub fn band_names(&self) -> Vec<&str> {
        match self {
            TrackedEntity::Node(node) => vec![node.name.as_str()],
            TrackedEntity::Pod(pod) => pod.containers.iter().map(|c| c.name.as_str()).collect(),
        }
    }

    /// Short identity for logs (`node/x`, `pod/ns/x`).
    pub fn describe(&self) -> String {
        match self {
            TrackedEntity::Node(node) => format!("node/{}", node.name),
            TrackedEntity::Pod(pod) => format!("pod/{}/{}", pod.namespace, pod.name),
        }
    }
}

impl NodeDescriptor {
    /// CPU capacity in milli-cores.
    pub fn cpu_capacity_millis(&self) -> i64 {
        self.cpu_capacity.milli_value()
    }

    /// Allocatable CPU in milli-cores.
    pub fn cpu_allocatable_millis(&self) -> i64 {
        self.cpu_allocatable.milli_value()
    }

    /// Memory capacity in decimal giga-units, rounded up.
    pub fn memory_capacity_giga(&self) -> i64 {
        self.memory_capacity.scaled_value(scale::GIGA)
    }

    /// Allocatable memory in decimal giga-units, rounded up.
    pub fn memory_allocatable_giga(&self) -> i64 {
        self.memory_allocatable.scaled_value(scale::GIGA)
    }
}

/// Narrows a pod to the containers matching `filter`.
///
/// `None` or an empty filter selects every container. Returns `None` when the
/// filter matches nothing.
pub fn select_containers(pod: PodDescriptor, filter: Option<&str>) -> Option<PodSelection> {
    let filter = filter.filter(|f| !f.is_empty());
    let containers: Vec<ContainerDescriptor> = pod
        .containers
        .into_iter()
        .filter(|c| filter.is_none_or(|f| c.name == f))
        .collect();
    if containers.is_empty() {
        return None;
    }
    Some(PodSelection {
        namespace: pod.namespace,
        name: pod.name,
        containers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pod(names: &[&str]) -> PodDescriptor {
        PodDescriptor {
            namespace: "default".to_string(),
            name: "web".to_string(),
            containers: names.iter().map(|n| ContainerDescriptor::unbounded(*n)).collect(),
        }
    }

    #[test]
    fn test_filter_selects_single_container() {
        let sel = select_containers(pod(&["a", "b", "c"]), Some("b")).unwrap();
        let names: Vec<_> = sel.containers.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["b"]);
    }

    #[test]
    fn test_empty_filter_selects_all() {
        let sel = select_containers(pod(&["a", "b", "c"]), None).unwrap();
        assert_eq!(sel.containers.len(), 3);
        let sel = select_containers(pod(&["a", "b", "c"]), Some("")).unwrap();
        assert_eq!(sel.containers.len(), 3);
        assert_eq!(TrackedEntity::Pod(sel).band_names(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_unmatched_filter_is_none() {
        assert!(select_containers(pod(&["a", "b", "c"]), Some("z")).is_none());
        assert!(select_containers(pod(&[]), None).is_none());
    }

    #[test]
    fn test_node_capacity_projections() {
        let node = NodeDescriptor {
            name: "n1".to_string(),
            kubelet_version: "v1.30.1".to_string(),
            os_image: "Ubuntu".to_string(),
            cpu_capacity: Quantity::parse("4").unwrap(),
            cpu_allocatable: Quantity::parse("3920m").unwrap(),
            memory_capacity: Quantity::parse("16318304Ki").unwrap(),
            memory_allocatable: Quantity::parse("15166304Ki").unwrap(),
        };
        assert_eq!(node.cpu_capacity_millis(), 4000);
        assert_eq!(node.cpu_allocatable_millis(), 3920);
        assert_eq!(node.memory_capacity_giga(), 17);
        assert_eq!(node.memory_allocatable_giga(), 16);

        let entity = TrackedEntity::Node(node);
        assert_eq!(entity.band_count(), 1);
        assert_eq!(entity.describe(), "node/n1");
    }
}
