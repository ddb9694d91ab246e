//! Kubernetes-backed source.
//!
//! The dashboard core is synchronous, so this source owns a current-thread
//! tokio runtime and blocks on every API call.

use std::path::PathBuf;
use std::time::Duration;

use k8s_openapi::api::core::v1::{Container, Node, Pod};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity as ApiQuantity;
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::core::{ApiResource, DynamicObject, GroupVersionKind};
use kube::{Api, Client, Config};
use serde::Deserialize;
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, info};

use crate::entity::{ContainerDescriptor, NodeDescriptor, PodDescriptor};
use crate::quantity::{Quantity, QuantityError, parse_or_zero};

use super::{DescriptorSource, MetricsSource, PodUsage, RawUsage, SourceError};

const METRICS_GROUP: &str = "metrics.k8s.io";
const METRICS_VERSION: &str = "v1beta1";

/// How to reach the cluster.
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    /// Explicit kubeconfig path; falls back to in-cluster/default discovery.
    pub kubeconfig: Option<PathBuf>,
    /// Kubeconfig context to use instead of the current one.
    pub context: Option<String>,
    /// Upper bound for connecting and for reading each response.
    pub request_timeout: Duration,
}

/// Source reading descriptors from the core API and usage from `metrics.k8s.io`.
pub struct KubeSource {
    runtime: Runtime,
    client: Client,
    default_namespace: String,
    node_metrics: ApiResource,
    pod_metrics: ApiResource,
}

impl KubeSource {
    /// Resolves cluster credentials and builds an API client.
    pub fn connect(options: &ConnectOptions) -> Result<Self, SourceError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(client_error)?;

        let client = runtime.block_on(async {
            let mut config = load_config(options).await?;
            config.connect_timeout = Some(options.request_timeout);
            config.read_timeout = Some(options.request_timeout);
            info!(
                cluster = %config.cluster_url,
                namespace = %config.default_namespace,
                "connecting to cluster"
            );
            Client::try_from(config).map_err(client_error)
        })?;

        let default_namespace = client.default_namespace().to_string();
        let node_metrics = ApiResource::from_gvk_with_plural(
            &GroupVersionKind::gvk(METRICS_GROUP, METRICS_VERSION, "NodeMetrics"),
            "nodes",
        );
        let pod_metrics = ApiResource::from_gvk_with_plural(
            &GroupVersionKind::gvk(METRICS_GROUP, METRICS_VERSION, "PodMetrics"),
            "pods",
        );

        Ok(Self {
            runtime,
            client,
            default_namespace,
            node_metrics,
            pod_metrics,
        })
    }

    fn get_dynamic(
        &self,
        api: Api<DynamicObject>,
        kind: &'static str,
        name: &str,
    ) -> Result<serde_json::Value, SourceError> {
        let object = self
            .runtime
            .block_on(api.get(name))
            .map_err(|e| api_error(e, kind, name))?;
        Ok(object.data)
    }
}

async fn load_config(options: &ConnectOptions) -> Result<Config, SourceError> {
    let kube_options = KubeConfigOptions {
        context: options.context.clone(),
        ..KubeConfigOptions::default()
    };
    match (&options.kubeconfig, &options.context) {
        (Some(path), _) => {
            let kubeconfig = Kubeconfig::read_from(path).map_err(client_error)?;
            Config::from_custom_kubeconfig(kubeconfig, &kube_options)
                .await
                .map_err(client_error)
        }
        (None, Some(_)) => Config::from_kubeconfig(&kube_options)
            .await
            .map_err(client_error),
        (None, None) => Config::infer().await.map_err(client_error),
    }
}

fn client_error(err: impl std::fmt::Display) -> SourceError {
    SourceError::Client(err.to_string())
}

fn api_error(err: kube::Error, kind: &'static str, name: &str) -> SourceError {
    match err {
        kube::Error::Api(resp) if resp.code == 404 => SourceError::NotFound {
            kind,
            name: name.to_string(),
        },
        other => SourceError::Api(other.to_string()),
    }
}

impl MetricsSource for KubeSource {
    fn node_usage(&self, name: &str) -> Result<RawUsage, SourceError> {
        let api = Api::all_with(self.client.clone(), &self.node_metrics);
        let data = self.get_dynamic(api, "NodeMetrics", name)?;
        let body: NodeMetricsBody = decode("NodeMetrics", data)?;
        let usage = body.usage.to_raw()?;
        debug!(node = name, ?usage, "node usage");
        Ok(usage)
    }

    fn pod_usage(&self, namespace: &str, name: &str) -> Result<PodUsage, SourceError> {
        let api = Api::namespaced_with(self.client.clone(), namespace, &self.pod_metrics);
        let data = self.get_dynamic(api, "PodMetrics", name)?;
        let body: PodMetricsBody = decode("PodMetrics", data)?;
        body.containers
            .into_iter()
            .map(|c| -> Result<_, SourceError> { Ok((c.name, c.usage.to_raw()?)) })
            .collect()
    }
}

impl DescriptorSource for KubeSource {
    fn node(&self, name: &str) -> Result<NodeDescriptor, SourceError> {
        let api: Api<Node> = Api::all(self.client.clone());
        let node = self
            .runtime
            .block_on(api.get(name))
            .map_err(|e| api_error(e, "node", name))?;
        node_descriptor(name, node).map_err(SourceError::from)
    }

    fn pod(&self, namespace: &str, name: &str) -> Result<PodDescriptor, SourceError> {
        let api: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let pod = self
            .runtime
            .block_on(api.get(name))
            .map_err(|e| api_error(e, "pod", &format!("{namespace}/{name}")))?;
        let containers = pod
            .spec
            .map(|spec| spec.containers)
            .unwrap_or_default()
            .iter()
            .map(container_descriptor)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PodDescriptor {
            namespace: namespace.to_string(),
            name: name.to_string(),
            containers,
        })
    }

    fn default_namespace(&self) -> &str {
        &self.default_namespace
    }
}

fn node_descriptor(name: &str, node: Node) -> Result<NodeDescriptor, QuantityError> {
    let status = node.status.unwrap_or_default();
    let capacity = status.capacity.unwrap_or_default();
    let allocatable = status.allocatable.unwrap_or_default();
    let info = status.node_info.unwrap_or_default();
    let get = |map: &std::collections::BTreeMap<String, ApiQuantity>, key: &str| {
        parse_or_zero(map.get(key).map(|q| q.0.as_str()))
    };
    Ok(NodeDescriptor {
        name: name.to_string(),
        kubelet_version: info.kubelet_version,
        os_image: info.os_image,
        cpu_capacity: get(&capacity, "cpu")?,
        cpu_allocatable: get(&allocatable, "cpu")?,
        memory_capacity: get(&capacity, "memory")?,
        memory_allocatable: get(&allocatable, "memory")?,
    })
}

fn container_descriptor(container: &Container) -> Result<ContainerDescriptor, QuantityError> {
    let resources = container.resources.clone().unwrap_or_default();
    let requests = resources.requests.unwrap_or_default();
    let limits = resources.limits.unwrap_or_default();
    Ok(ContainerDescriptor {
        name: container.name.clone(),
        cpu_request: parse_or_zero(requests.get("cpu").map(|q| q.0.as_str()))?,
        cpu_limit: parse_or_zero(limits.get("cpu").map(|q| q.0.as_str()))?,
        memory_request: parse_or_zero(requests.get("memory").map(|q| q.0.as_str()))?,
        memory_limit: parse_or_zero(limits.get("memory").map(|q| q.0.as_str()))?,
    })
}

fn decode<T: for<'de> Deserialize<'de>>(
    kind: &'static str,
    data: serde_json::Value,
) -> Result<T, SourceError> {
    serde_json::from_value(data).map_err(|e| SourceError::Decode {
        kind,
        message: e.to_string(),
    })
}

#[derive(Debug, Deserialize)]
struct NodeMetricsBody {
    usage: UsageBody,
}

#[derive(Debug, Deserialize)]
struct PodMetricsBody {
    #[serde(default)]
    containers: Vec<ContainerMetricsBody>,
}

#[derive(Debug, Deserialize)]
struct ContainerMetricsBody {
    name: String,
    usage: UsageBody,
}

#[derive(Debug, Default, Deserialize)]
struct UsageBody {
    cpu: Option<String>,
    memory: Option<String>,
}

impl UsageBody {
    fn to_raw(&self) -> Result<RawUsage, QuantityError> {
        let cpu = self.cpu.as_deref().map(Quantity::parse).transpose()?;
        let memory = self.memory.as_deref().map(Quantity::parse).transpose()?;
        Ok(RawUsage {
            cpu_millis: cpu.map_or(0, |q| q.milli_value()),
            memory_bytes: memory.map_or(0, |q| q.value()),
        })
    }
}
