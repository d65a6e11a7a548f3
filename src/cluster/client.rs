//! Kubernetes API client implementation.
//!
//! [`KubeClient`] implements [`ClusterGateway`] on top of `kube`. Resources
//! travel as `DynamicObject`s built from the converter's own types, so the
//! API server receives exactly what is written to the manifest files.

use async_trait::async_trait;
use kube::api::{Api, DeleteParams, DynamicObject, Patch, PatchParams, PostParams};
use kube::discovery::ApiResource;
use kube::{Client, Config};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::DEFAULT_HOST;
use crate::error::{ClusterError, KubeComposeError, Result};

use super::gateway::ClusterGateway;
use super::types::{ReplicationController, ResourceKind, Scale, Service};

/// Namespace every resource is created in.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Builds a client configuration for an explicit API server URL.
///
/// Read and write timeouts are left unset; set them on the returned
/// config before [`KubeClient::try_new`] to bound calls.
///
/// # Errors
///
/// Returns an error if `host` is not a valid URL.
pub fn endpoint_config(host: &str) -> Result<Config> {
    let uri = host
        .trim_end_matches('/')
        .parse()
        .map_err(|e| ClusterError::network(format!("Invalid cluster endpoint {host}: {e}")))?;

    let mut config = Config::new(uri);
    config.read_timeout = None;
    config.write_timeout = None;
    Ok(config)
}

/// Kubernetes API client.
#[derive(Clone)]
pub struct KubeClient {
    /// Underlying kube client.
    client: Client,
    /// Target namespace.
    namespace: String,
    /// API server URL, for diagnostics.
    cluster_url: String,
}

impl KubeClient {
    /// Connects to a cluster.
    ///
    /// An explicit `host` is used as given. Otherwise the configuration is
    /// inferred from the kubeconfig or the in-cluster environment, and
    /// [`DEFAULT_HOST`] is used when neither is available.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is invalid or the client cannot be
    /// created.
    pub async fn connect(host: Option<&str>, token: Option<String>) -> Result<Self> {
        let config = match host {
            Some(host) => endpoint_config(host)?,
            None => match Config::infer().await {
                Ok(config) => config,
                Err(e) => {
                    debug!("No kubeconfig found ({e}), using {DEFAULT_HOST}");
                    endpoint_config(DEFAULT_HOST)?
                }
            },
        };

        Self::try_new(with_token(config, token))
    }

    /// Creates a client for an explicit API server URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is invalid or the client cannot be
    /// created.
    pub fn for_host(host: &str, token: Option<String>) -> Result<Self> {
        Self::try_new(with_token(endpoint_config(host)?, token))
    }

    /// Creates a client from a prepared configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn try_new(config: Config) -> Result<Self> {
        let cluster_url = config.cluster_url.to_string();
        let client = Client::try_from(config)
            .map_err(|e| ClusterError::network(format!("Failed to create Kubernetes client: {e}")))?;

        debug!("Using cluster endpoint: {cluster_url}");
        Ok(Self {
            client,
            namespace: String::from(DEFAULT_NAMESPACE),
            cluster_url,
        })
    }

    /// Sets the target namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Returns the API server URL.
    #[must_use]
    pub fn cluster_url(&self) -> &str {
        &self.cluster_url
    }

    /// Namespaced API for a resource kind.
    fn api(&self, kind: ResourceKind) -> Api<DynamicObject> {
        Api::namespaced_with(self.client.clone(), &self.namespace, &api_resource(kind))
    }

    /// Creates a resource of `kind`.
    async fn create<T>(&self, kind: ResourceKind, name: &str, resource: &T) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Sync,
    {
        debug!("Creating {kind} {name}");
        let object: DynamicObject = convert(resource).map_err(|e| {
            KubeComposeError::internal(format!("Failed to encode {kind} {name}: {e}"))
        })?;

        let created = self
            .api(kind)
            .create(&PostParams::default(), &object)
            .await
            .map_err(|e| cluster_error(e, kind, name))?;
        decode(&created)
    }

    /// Gets a resource, mapping 404 to `None`.
    async fn get_optional<T: DeserializeOwned>(
        &self,
        kind: ResourceKind,
        name: &str,
    ) -> Result<Option<T>> {
        match self.api(kind).get(name).await {
            Ok(object) => decode(&object).map(Some),
            Err(kube::Error::Api(ae)) if ae.code == 404 => Ok(None),
            Err(e) => Err(cluster_error(e, kind, name)),
        }
    }

    /// Deletes a resource.
    async fn delete(&self, kind: ResourceKind, name: &str) -> Result<()> {
        debug!("Deleting {kind} {name}");
        self.api(kind)
            .delete(name, &DeleteParams::default())
            .await
            .map_err(|e| cluster_error(e, kind, name))?;
        Ok(())
    }
}

#[async_trait]
impl ClusterGateway for KubeClient {
    async fn create_replica(&self, rc: &ReplicationController) -> Result<ReplicationController> {
        self.create(ResourceKind::ReplicationController, &rc.metadata.name, rc)
            .await
    }

    async fn create_service(&self, svc: &Service) -> Result<Service> {
        self.create(ResourceKind::Service, &svc.metadata.name, svc).await
    }

    async fn delete_replica(&self, name: &str) -> Result<()> {
        self.delete(ResourceKind::ReplicationController, name).await
    }

    async fn delete_service(&self, name: &str) -> Result<()> {
        self.delete(ResourceKind::Service, name).await
    }

    async fn get_replica(&self, name: &str) -> Result<Option<ReplicationController>> {
        self.get_optional(ResourceKind::ReplicationController, name)
            .await
    }

    async fn get_service(&self, name: &str) -> Result<Option<Service>> {
        self.get_optional(ResourceKind::Service, name).await
    }

    async fn update_scale(&self, kind: ResourceKind, name: &str, replicas: i32) -> Result<Scale> {
        debug!("Scaling {kind} {name} to {replicas}");
        let patch = serde_json::json!({ "spec": { "replicas": replicas } });

        let scale = self
            .api(kind)
            .patch_scale(name, &PatchParams::default(), &Patch::Merge(&patch))
            .await
            .map_err(|e| cluster_error(e, kind, name))?;
        decode(&scale)
    }
}

/// Sets the bearer token, ignoring empty values.
fn with_token(mut config: Config, token: Option<String>) -> Config {
    if let Some(token) = token.filter(|t| !t.is_empty()) {
        config.auth_info.token = Some(token.into());
    }
    config
}

/// API coordinates of a resource kind.
fn api_resource(kind: ResourceKind) -> ApiResource {
    ApiResource {
        group: kind.group().to_string(),
        version: kind.version().to_string(),
        api_version: kind.api_version().to_string(),
        kind: kind.to_string(),
        plural: kind.plural().to_string(),
    }
}

/// Re-types a value through its JSON form.
fn convert<S: Serialize, T: DeserializeOwned>(value: &S) -> serde_json::Result<T> {
    serde_json::to_value(value).and_then(serde_json::from_value)
}

/// Reads an API response into one of the converter's types.
fn decode<S: Serialize, T: DeserializeOwned>(object: &S) -> Result<T> {
    convert(object).map_err(|e| {
        ClusterError::InvalidResponse {
            message: format!("Failed to parse response: {e}"),
        }
        .into()
    })
}

/// Maps a kube error for `kind`/`name` into a cluster error.
fn cluster_error(err: kube::Error, kind: ResourceKind, name: &str) -> KubeComposeError {
    let err = match err {
        kube::Error::Api(ae) if ae.code == 404 => ClusterError::not_found(kind.to_string(), name),
        kube::Error::Api(ae) if ae.code == 401 || ae.code == 403 => {
            ClusterError::AuthenticationFailed {
                message: ae.message.clone(),
            }
        }
        kube::Error::Api(ae) => {
            let message = if ae.reason.is_empty() {
                ae.message.clone()
            } else {
                format!("{} ({})", ae.message, ae.reason)
            };
            ClusterError::api_error(ae.code, message)
        }
        kube::Error::SerdeError(e) => ClusterError::InvalidResponse {
            message: format!("Failed to parse response: {e}"),
        },
        other => ClusterError::network(other.to_string()),
    };
    err.into()
}
