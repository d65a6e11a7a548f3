//! Cluster integration module.
//!
//! This module provides the Kubernetes resource types the converter
//! emits, the [`ClusterGateway`] interface used for live submission, and
//! the `kube`-backed client implementing it.

mod client;
mod gateway;
mod types;

pub use client::{endpoint_config, KubeClient, DEFAULT_NAMESPACE};
pub use gateway::ClusterGateway;
#[cfg(test)]
pub(crate) use gateway::MockClusterGateway;
pub use types::{
    Container, ContainerPort, Deployment, DeploymentSpec, EnvVar, IntOrString,
    IntOrStringKind, LabelSelector, ObjectMeta, PodSpec, PodTemplateSpec, Protocol,
    ReplicationController, ReplicationControllerSpec, ResourceKind, RestartPolicy, Scale,
    ScaleSpec, SecurityContext, Service, ServicePort, ServiceSpec,
};
