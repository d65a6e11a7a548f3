//! Cluster gateway trait.
//!
//! This is the narrow interface the orchestrator uses to talk to a
//! cluster. Calls are awaited one at a time; there is no retry at this
//! layer.

use async_trait::async_trait;

use crate::error::Result;

use super::types::{ReplicationController, ResourceKind, Scale, Service};

/// Operations on named resources in the target namespace.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClusterGateway: Send + Sync {
    /// Creates a replication controller.
    async fn create_replica(&self, rc: &ReplicationController) -> Result<ReplicationController>;

    /// Creates a service.
    async fn create_service(&self, svc: &Service) -> Result<Service>;

    /// Deletes a replication controller by name.
    async fn delete_replica(&self, name: &str) -> Result<()>;

    /// Deletes a service by name.
    async fn delete_service(&self, name: &str) -> Result<()>;

    /// Gets a replication controller, or `None` if it does not exist.
    async fn get_replica(&self, name: &str) -> Result<Option<ReplicationController>>;

    /// Gets a service, or `None` if it does not exist.
    async fn get_service(&self, name: &str) -> Result<Option<Service>>;

    /// Sets the desired replica count through the scale sub-resource.
    async fn update_scale(&self, kind: ResourceKind, name: &str, replicas: i32) -> Result<Scale>;
}
