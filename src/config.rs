//! Per-invocation configuration and entity resolution.
//!
//! A `DashboardConfig` and a `Target` are built once from the command line
//! and passed down explicitly; nothing is kept in process-global state.

use std::time::Duration;

use tracing::info;

use crate::entity::{TrackedEntity, select_containers};
use crate::error::DashboardError;
use crate::source::DescriptorSource;

/// Rows reserved for the header panel (two borders, two text lines).
pub const HEADER_HEIGHT: u16 = 4;

/// Columns kept free on the right of each plot when sizing series.
pub const PLOT_MARGIN: u16 = 5;

/// Smallest usable series capacity.
pub const MIN_SERIES_CAPACITY: usize = 1;

/// Default polling interval.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// Default number format language.
pub const DEFAULT_LOCALE: &str = "de-CH";

/// Default timeout for each API request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Dashboard settings shared by node and pod mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Time between metric fetches.
    pub interval: Duration,
    /// Height of the header panel in rows.
    pub header_height: u16,
    /// Number format language tag (`de-CH`, `en`, ...).
    pub locale: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            header_height: HEADER_HEIGHT,
            locale: DEFAULT_LOCALE.to_string(),
        }
    }
}

/// What to monitor, as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Node {
        name: String,
    },
    Pod {
        /// `None` uses the source's default namespace.
        namespace: Option<String>,
        name: String,
        /// `None` selects every container.
        container: Option<String>,
    },
}

/// Resolves a target into a tracked entity by fetching its static spec.
pub fn resolve_entity<S: DescriptorSource + ?Sized>(
    source: &S,
    target: &Target,
) -> Result<TrackedEntity, DashboardError> {
    let entity = match target {
        Target::Node { name } => TrackedEntity::Node(source.node(name)?),
        Target::Pod {
            namespace,
            name,
            container,
        } => {
            let namespace = namespace
                .as_deref()
                .filter(|ns| !ns.is_empty())
                .unwrap_or_else(|| source.default_namespace())
                .to_string();
            let pod = source.pod(&namespace, name)?;
            let selection = select_containers(pod, container.as_deref()).ok_or_else(|| {
                DashboardError::ContainerNotFound {
                    container: container.clone().unwrap_or_default(),
                    namespace: namespace.clone(),
                    pod: name.clone(),
                }
            })?;
            TrackedEntity::Pod(selection)
        }
    };
    info!(entity = %entity.describe(), bands = entity.band_count(), "resolved entity");
    Ok(entity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{ContainerDescriptor, PodDescriptor};
    use crate::source::mock::MockSource;

    fn source() -> MockSource {
        MockSource::new().with_pod(PodDescriptor {
            namespace: "default".to_string(),
            name: "web".to_string(),
            containers: ["a", "b", "c"]
                .into_iter()
                .map(ContainerDescriptor::unbounded)
                .collect(),
        })
    }

    fn pod_target(namespace: Option<&str>, container: Option<&str>) -> Target {
        Target::Pod {
            namespace: namespace.map(str::to_string),
            name: "web".to_string(),
            container: container.map(str::to_string),
        }
    }

    #[test]
    fn test_default_config() {
        let config = DashboardConfig::default();
        assert_eq!(config.interval, Duration::from_secs(1));
        assert_eq!(config.header_height, 4);
        assert_eq!(config.locale, "de-CH");
    }

    #[test]
    fn test_resolve_pod_with_filter() {
        let entity = resolve_entity(&source(), &pod_target(None, Some("b"))).unwrap();
        assert_eq!(entity.band_names(), vec!["b"]);
    }

    #[test]
    fn test_resolve_pod_without_filter_uses_default_namespace() {
        let entity = resolve_entity(&source(), &pod_target(Some(""), None)).unwrap();
        assert_eq!(entity.band_names(), vec!["a", "b", "c"]);
        assert_eq!(entity.describe(), "pod/default/web");
    }

    #[test]
    fn test_resolve_pod_unmatched_filter_fails() {
        let err = resolve_entity(&source(), &pod_target(None, Some("z"))).unwrap_err();
        assert!(matches!(err, DashboardError::ContainerNotFound { .. }));
        assert!(err.to_string().contains("\"z\""));
    }

    #[test]
    fn test_resolve_missing_objects() {
        let err = resolve_entity(&source(), &pod_target(Some("other"), None)).unwrap_err();
        assert!(matches!(err, DashboardError::Source(_)));
        let err = resolve_entity(
            &source(),
            &Target::Node {
                name: "n1".to_string(),
            },
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "node \"n1\" not found");
    }
}
