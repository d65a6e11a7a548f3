//! Command orchestration.
//!
//! This module drives one command over every service of a compose
//! project: generating and submitting resources, listing what exists in
//! the cluster, deleting it, or scaling it. Services are visited in name
//! order, and one service's result never rolls back another's.

use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

use crate::cluster::{ClusterGateway, ReplicationController, ResourceKind, Service};
use crate::config::{ComposeProject, DescriptorHasher};
use crate::convert::{LinkSet, ResourceBuilder, ResourceTriple};
use crate::error::{ClusterError, KubeComposeError, Result};
use crate::output::{ChartGenerator, ManifestWriter};

/// Options for the generate command.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenerateOptions {
    /// Also build and write a deployment per service.
    pub rollout: bool,
    /// Hand every service to the chart generator.
    pub chart: bool,
    /// Submit resources to the cluster.
    pub submit: bool,
}

/// Which resource kinds list and delete act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindSelection {
    /// Act on services.
    pub services: bool,
    /// Act on replication controllers.
    pub replicas: bool,
}

impl KindSelection {
    /// Builds a selection from CLI flags; neither flag selects both kinds.
    #[must_use]
    pub const fn from_flags(svc: bool, rc: bool) -> Self {
        if svc || rc {
            Self {
                services: svc,
                replicas: rc,
            }
        } else {
            Self {
                services: true,
                replicas: true,
            }
        }
    }
}

/// Result of a generate run.
#[derive(Debug, Default, Serialize)]
pub struct GenerateReport {
    /// Manifest files written, in generation order.
    pub written: Vec<PathBuf>,
    /// Resources accepted by the cluster.
    pub submitted: Vec<String>,
    /// Submissions the cluster rejected.
    pub failures: Vec<String>,
    /// Chart directories touched.
    pub charts: Vec<PathBuf>,
}

impl GenerateReport {
    /// Returns true if every submission succeeded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// A service as seen in the cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceSummary {
    /// Service name.
    pub name: String,
    /// Assigned cluster IP.
    pub cluster_ip: String,
    /// Ports as `PROTOCOL(port)`.
    pub ports: Vec<String>,
    /// Selector pairs as `key=value`, in key order.
    pub selectors: Vec<String>,
}

/// A replication controller as seen in the cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplicaSummary {
    /// Controller name.
    pub name: String,
    /// Container names.
    pub containers: Vec<String>,
    /// Container images.
    pub images: Vec<String>,
    /// Desired replicas.
    pub replicas: i32,
    /// Selector pairs as `key=value`, in key order.
    pub selectors: Vec<String>,
}

/// Result of a list run.
#[derive(Debug, Default, Serialize)]
pub struct ListReport {
    /// Services found.
    pub services: Vec<ServiceSummary>,
    /// Replication controllers found.
    pub replicas: Vec<ReplicaSummary>,
}

/// Result of scaling one controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScaleOutcome {
    /// Controller name.
    pub name: String,
    /// Replica count reported by the cluster after the update.
    pub replicas: i32,
}

/// Per-command driver over a compose project.
pub struct Orchestrator<'a, G: ClusterGateway + ?Sized> {
    /// Project being acted on.
    project: &'a ComposeProject,
    /// Cluster gateway.
    gateway: &'a G,
    /// Chart generator, when charts are supported.
    charts: Option<&'a dyn ChartGenerator>,
    /// Descriptor hasher for the run label.
    hasher: DescriptorHasher,
}

impl<'a, G: ClusterGateway + ?Sized> Orchestrator<'a, G> {
    /// Creates a new orchestrator.
    #[must_use]
    pub const fn new(project: &'a ComposeProject, gateway: &'a G) -> Self {
        Self {
            project,
            gateway,
            charts: None,
            hasher: DescriptorHasher::new(),
        }
    }

    /// Sets the chart generator used when charts are requested.
    #[must_use]
    pub fn with_charts(mut self, charts: &'a dyn ChartGenerator) -> Self {
        self.charts = Some(charts);
        self
    }

    /// Service names, optionally restricted to one.
    fn targets(&self, only: Option<&str>) -> Vec<&'a str> {
        let project = self.project;
        let names: Vec<&'a str> = project
            .services
            .keys()
            .map(String::as_str)
            .filter(|name| only.is_none_or(|wanted| wanted == *name))
            .collect();

        if let Some(wanted) = only {
            if names.is_empty() {
                warn!("No service named {wanted} in the descriptor");
            }
        }
        names
    }

    /// Converts every service, writes manifests through `writer`, and
    /// optionally submits.
    ///
    /// Replication controllers are submitted while iterating services.
    /// Services are submitted in a second pass, once links from every
    /// service are known, and only for services some link points at.
    ///
    /// # Errors
    ///
    /// Returns an error on the first conversion, serialization, write or
    /// chart failure. Rejected submissions are recorded in the report
    /// instead.
    pub async fn generate(
        &self,
        writer: &ManifestWriter,
        options: GenerateOptions,
    ) -> Result<GenerateReport> {
        info!(
            "Converting {} services of project {}",
            self.project.services.len(),
            self.project.name
        );

        let builder = if options.rollout {
            let hash = self.hasher.hash_project(self.project);
            ResourceBuilder::new().with_rollout(self.hasher.short_hash(&hash))
        } else {
            ResourceBuilder::new()
        };
        let links = LinkSet::from_services(self.project.services.values());
        debug!("Links across services: {:?}", links.iter().collect::<Vec<_>>());

        let mut report = GenerateReport::default();
        let mut triples: Vec<ResourceTriple> = Vec::with_capacity(self.project.services.len());

        for (name, descriptor) in &self.project.services {
            let triple = builder.build(name, descriptor)?;

            if options.submit {
                self.submit_replica(&triple.replica, &mut report).await;
            }

            report.written.extend(writer.write_triple(&triple)?);
            triples.push(triple);
        }

        if options.submit {
            for triple in &triples {
                if links.references(&triple.name) {
                    self.submit_service(&triple.service, &mut report).await;
                } else {
                    debug!("Service {} is not linked, not submitting it", triple.name);
                }
            }
        }

        if options.chart {
            match self.charts {
                Some(charts) => {
                    for triple in &triples {
                        report.charts.push(charts.generate(&self.project.name, triple)?);
                    }
                    report.charts.dedup();
                }
                None => warn!("Chart generation requested but no chart generator is configured"),
            }
        }

        Ok(report)
    }

    async fn submit_replica(&self, rc: &ReplicationController, report: &mut GenerateReport) {
        let name = &rc.metadata.name;
        match self.gateway.create_replica(rc).await {
            Ok(created) => {
                debug!("Created replication controller: {created:?}");
                report.submitted.push(format!("{} {name}", ResourceKind::ReplicationController));
            }
            Err(e) => {
                error!("Failed to create replication controller {name}: {e}");
                report.failures.push(format!("{} {name}: {e}", ResourceKind::ReplicationController));
            }
        }
    }

    async fn submit_service(&self, svc: &Service, report: &mut GenerateReport) {
        let name = &svc.metadata.name;
        match self.gateway.create_service(svc).await {
            Ok(created) => {
                debug!("Created service: {created:?}");
                report.submitted.push(format!("{} {name}", ResourceKind::Service));
            }
            Err(e) => {
                error!("Failed to create service {name}: {e}");
                report.failures.push(format!("{} {name}: {e}", ResourceKind::Service));
            }
        }
    }

    /// Looks up the project's services and controllers in the cluster.
    ///
    /// Missing resources are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if a lookup fails for a reason other than absence.
    pub async fn list(&self, kinds: KindSelection) -> Result<ListReport> {
        let mut report = ListReport::default();
        let names = self.targets(None);

        if kinds.services {
            for name in &names {
                match self.gateway.get_service(name).await? {
                    Some(svc) => report.services.push(summarize_service(&svc)),
                    None => debug!("Cannot find service for: {name}"),
                }
            }
        }

        if kinds.replicas {
            for name in &names {
                match self.gateway.get_replica(name).await? {
                    Some(rc) => report.replicas.push(summarize_replica(&rc)),
                    None => debug!("Cannot find rc for: {name}"),
                }
            }
        }

        Ok(report)
    }

    /// Deletes the project's resources of the selected kinds.
    ///
    /// Each resource is looked up first; missing ones are skipped. Returns
    /// the deleted resources as `Kind name`.
    ///
    /// # Errors
    ///
    /// Returns the first failed lookup or deletion.
    pub async fn delete(&self, kinds: KindSelection, only: Option<&str>) -> Result<Vec<String>> {
        let mut deleted = Vec::new();

        for name in self.targets(only) {
            if kinds.services {
                if self.gateway.get_service(name).await?.is_some() {
                    self.gateway.delete_service(name).await?;
                    info!("Deleted service {name}");
                    deleted.push(format!("{} {name}", ResourceKind::Service));
                } else {
                    debug!("Cannot find service for: {name}");
                }
            }
            if kinds.replicas {
                if self.gateway.get_replica(name).await?.is_some() {
                    self.gateway.delete_replica(name).await?;
                    info!("Deleted replication controller {name}");
                    deleted.push(format!("{} {name}", ResourceKind::ReplicationController));
                } else {
                    debug!("Cannot find rc for: {name}");
                }
            }
        }

        Ok(deleted)
    }

    /// Sets the replica count of the project's controllers.
    ///
    /// # Errors
    ///
    /// Returns [`KubeComposeError::InvalidScale`] for a non-positive count
    /// before anything is looked up, and the first failed lookup or update.
    pub async fn scale(&self, replicas: i32, only: Option<&str>) -> Result<Vec<ScaleOutcome>> {
        if replicas <= 0 {
            return Err(KubeComposeError::InvalidScale { replicas });
        }

        let kind = ResourceKind::ReplicationController;
        let mut outcomes = Vec::new();

        for name in self.targets(only) {
            if self.gateway.get_replica(name).await?.is_none() {
                return Err(ClusterError::not_found(kind.to_string(), name).into());
            }

            let scale = self.gateway.update_scale(kind, name, replicas).await?;
            info!("Scaled {name} to {}", scale.spec.replicas);
            outcomes.push(ScaleOutcome {
                name: name.to_string(),
                replicas: scale.spec.replicas,
            });
        }

        Ok(outcomes)
    }
}

fn selector_pairs(selector: &std::collections::BTreeMap<String, String>) -> Vec<String> {
    selector.iter().map(|(k, v)| format!("{k}={v}")).collect()
}

fn summarize_service(svc: &Service) -> ServiceSummary {
    ServiceSummary {
        name: svc.metadata.name.clone(),
        cluster_ip: svc.spec.cluster_ip.clone().unwrap_or_default(),
        ports: svc
            .spec
            .ports
            .iter()
            .map(|p| format!("{}({})", p.protocol, p.port))
            .collect(),
        selectors: selector_pairs(&svc.spec.selector),
    }
}

fn summarize_replica(rc: &ReplicationController) -> ReplicaSummary {
    let containers = &rc.spec.template.spec.containers;
    ReplicaSummary {
        name: rc.metadata.name.clone(),
        containers: containers.iter().map(|c| c.name.clone()).collect(),
        images: containers.iter().map(|c| c.image.clone()).collect(),
        replicas: rc.spec.replicas,
        selectors: selector_pairs(&rc.spec.selector),
    }
}
