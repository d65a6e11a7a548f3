//! Resource assembly.
//!
//! Builds the replication controller, the optional deployment and the
//! service for one compose service. All three share the service name and
//! the `role=<name>` label, which is also the selector on both workloads
//! and on the service. That shared pair is what routes service traffic
//! to the right pods.

use std::collections::BTreeMap;

use crate::cluster::{
    Container, Deployment, DeploymentSpec, LabelSelector, ObjectMeta, PodSpec, PodTemplateSpec,
    ReplicationController, ReplicationControllerSpec, Service, ServiceSpec,
};
use crate::config::ServiceDescriptor;
use crate::error::ConvertError;

use super::env::parse_env;
use super::policy::{resolve_restart_policy, security_context};
use super::ports::PortBinding;

/// Label key tying pods, workloads and services together.
pub const ROLE_LABEL: &str = "role";

/// Label key carrying the run hash on deployments.
pub const RUN_LABEL: &str = "kubecompose.io/run";

/// Replica count given to every generated workload.
pub const DEFAULT_REPLICAS: i32 = 1;

/// The resources generated for one service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceTriple {
    /// Service name.
    pub name: String,
    /// Replication controller.
    pub replica: ReplicationController,
    /// Deployment, when rollout generation is enabled.
    pub rollout: Option<Deployment>,
    /// Network service.
    pub service: Service,
}

/// Builder turning service descriptors into resources.
#[derive(Debug, Clone, Default)]
pub struct ResourceBuilder {
    /// Run label value; `Some` enables deployment generation.
    run_label: Option<String>,
}

impl ResourceBuilder {
    /// Creates a builder producing replication controllers and services.
    #[must_use]
    pub const fn new() -> Self {
        Self { run_label: None }
    }

    /// Also produces a deployment labelled with `run_label`.
    #[must_use]
    pub fn with_rollout(mut self, run_label: impl Into<String>) -> Self {
        self.run_label = Some(run_label.into());
        self
    }

    /// Returns true if deployments are generated.
    #[must_use]
    pub const fn generates_rollout(&self) -> bool {
        self.run_label.is_some()
    }

    /// Builds the resources for one service.
    ///
    /// # Errors
    ///
    /// Returns the first environment, port or restart policy entry that
    /// fails to parse.
    pub fn build(
        &self,
        name: &str,
        descriptor: &ServiceDescriptor,
    ) -> Result<ResourceTriple, ConvertError> {
        let selector = role_labels(name);

        let env = descriptor
            .environment
            .iter()
            .map(|entry| parse_env(name, entry))
            .collect::<Result<Vec<_>, _>>()?;

        let bindings = descriptor
            .ports
            .iter()
            .map(|entry| PortBinding::parse(name, entry))
            .collect::<Result<Vec<_>, _>>()?;

        let restart_policy = resolve_restart_policy(name, &descriptor.restart)?;

        let template = PodTemplateSpec {
            metadata: ObjectMeta::labels_only(selector.clone()),
            spec: PodSpec {
                containers: vec![Container {
                    name: name.to_string(),
                    image: descriptor.image.clone(),
                    env,
                    ports: bindings.iter().map(PortBinding::container_port).collect(),
                    security_context: security_context(descriptor.privileged),
                }],
                restart_policy,
            },
        };

        let replica = ReplicationController {
            api_version: String::from("v1"),
            kind: String::from("ReplicationController"),
            metadata: ObjectMeta::new(name, selector.clone()),
            spec: ReplicationControllerSpec {
                replicas: DEFAULT_REPLICAS,
                selector: selector.clone(),
                template: template.clone(),
            },
        };

        let rollout = self.run_label.as_ref().map(|run| Deployment {
            api_version: String::from("apps/v1"),
            kind: String::from("Deployment"),
            metadata: ObjectMeta::new(name, selector.clone()).with_label(RUN_LABEL, run.as_str()),
            spec: DeploymentSpec {
                replicas: DEFAULT_REPLICAS,
                selector: LabelSelector {
                    match_labels: selector.clone(),
                },
                template,
            },
        });

        let service = Service {
            api_version: String::from("v1"),
            kind: String::from("Service"),
            metadata: ObjectMeta::new(name, selector.clone()),
            spec: ServiceSpec {
                selector,
                ports: bindings.iter().map(PortBinding::service_port).collect(),
                cluster_ip: None,
            },
        };

        Ok(ResourceTriple {
            name: name.to_string(),
            replica,
            rollout,
            service,
        })
    }
}

/// The `{role: name}` label map.
#[must_use]
pub fn role_labels(name: &str) -> BTreeMap<String, String> {
    BTreeMap::from([(ROLE_LABEL.to_string(), name.to_string())])
}
