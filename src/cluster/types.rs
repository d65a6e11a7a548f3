//! Kubernetes resource types produced by the converter.
//!
//! Only the fields the converter writes (or reads back when listing) are
//! modelled. Unknown fields returned by the API server are ignored on
//! deserialization.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// Metadata and selectors
// =============================================================================

/// Object metadata.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    /// Resource name (empty inside pod templates).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Namespace, set by the API server on read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Labels.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

impl ObjectMeta {
    /// Creates named metadata with the given labels.
    pub fn new(name: impl Into<String>, labels: BTreeMap<String, String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            labels,
        }
    }

    /// Creates unnamed metadata, as used by pod templates.
    #[must_use]
    pub const fn labels_only(labels: BTreeMap<String, String>) -> Self {
        Self {
            name: String::new(),
            namespace: None,
            labels,
        }
    }

    /// Adds a label.
    #[must_use]
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }
}

/// Label selector used by `apps/v1` workloads.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LabelSelector {
    /// Labels a pod must carry to be selected.
    #[serde(default)]
    pub match_labels: BTreeMap<String, String>,
}

// =============================================================================
// Workloads
// =============================================================================

/// A `v1` `ReplicationController`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReplicationController {
    /// API version.
    pub api_version: String,
    /// Kind.
    pub kind: String,
    /// Metadata.
    pub metadata: ObjectMeta,
    /// Desired state.
    pub spec: ReplicationControllerSpec,
}

/// Replication controller desired state.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReplicationControllerSpec {
    /// Desired number of pods.
    #[serde(default)]
    pub replicas: i32,
    /// Pod selector.
    #[serde(default)]
    pub selector: BTreeMap<String, String>,
    /// Pod template.
    pub template: PodTemplateSpec,
}

/// An `apps/v1` `Deployment`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    /// API version.
    pub api_version: String,
    /// Kind.
    pub kind: String,
    /// Metadata.
    pub metadata: ObjectMeta,
    /// Desired state.
    pub spec: DeploymentSpec,
}

/// Deployment desired state.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentSpec {
    /// Desired number of pods.
    #[serde(default)]
    pub replicas: i32,
    /// Pod selector.
    pub selector: LabelSelector,
    /// Pod template.
    pub template: PodTemplateSpec,
}

/// Pod template.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PodTemplateSpec {
    /// Template metadata (labels only).
    pub metadata: ObjectMeta,
    /// Pod spec.
    pub spec: PodSpec,
}

/// Pod spec.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PodSpec {
    /// Containers.
    pub containers: Vec<Container>,
    /// Restart policy.
    #[serde(default)]
    pub restart_policy: RestartPolicy,
}

/// Pod restart policy.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum RestartPolicy {
    /// Always restart.
    #[default]
    Always,
    /// Never restart.
    Never,
    /// Restart only on non-zero exit.
    OnFailure,
}

impl fmt::Display for RestartPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => write!(f, "Always"),
            Self::Never => write!(f, "Never"),
            Self::OnFailure => write!(f, "OnFailure"),
        }
    }
}

// =============================================================================
// Container
// =============================================================================

/// Container spec.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    /// Container name.
    pub name: String,
    /// Image.
    #[serde(default)]
    pub image: String,
    /// Environment variables.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<EnvVar>,
    /// Ports.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<ContainerPort>,
    /// Security context, absent unless the container runs privileged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_context: Option<SecurityContext>,
}

/// Environment variable with a literal value.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnvVar {
    /// Variable name.
    pub name: String,
    /// Literal value.
    #[serde(default)]
    pub value: String,
}

impl EnvVar {
    /// Creates an env var with a literal value.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Port exposed by a container.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContainerPort {
    /// Port number inside the container.
    pub container_port: i32,
    /// Protocol.
    #[serde(default)]
    pub protocol: Protocol,
}

/// Transport protocol.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Protocol {
    /// TCP.
    #[default]
    Tcp,
    /// UDP.
    Udp,
    /// SCTP.
    Sctp,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp => write!(f, "TCP"),
            Self::Udp => write!(f, "UDP"),
            Self::Sctp => write!(f, "SCTP"),
        }
    }
}

/// Container security context.
///
/// `privileged` is an `Option` so "unset" and "false" stay distinct.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SecurityContext {
    /// Run the container privileged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privileged: Option<bool>,
}

// =============================================================================
// Service
// =============================================================================

/// A `v1` `Service`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// API version.
    pub api_version: String,
    /// Kind.
    pub kind: String,
    /// Metadata.
    pub metadata: ObjectMeta,
    /// Desired state.
    pub spec: ServiceSpec,
}

/// Service desired state.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceSpec {
    /// Pod selector.
    #[serde(default)]
    pub selector: BTreeMap<String, String>,
    /// Exposed ports.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<ServicePort>,
    /// Cluster IP, assigned by the API server.
    #[serde(rename = "clusterIP", default, skip_serializing_if = "Option::is_none")]
    pub cluster_ip: Option<String>,
}

/// Port exposed by a service.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServicePort {
    /// Port name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Port the service listens on.
    pub port: i32,
    /// Protocol.
    #[serde(default)]
    pub protocol: Protocol,
    /// Port on the selected pods.
    pub target_port: IntOrString,
}

/// Which form of an [`IntOrString`] is serialized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntOrStringKind {
    /// Serialize the integer form.
    Int,
    /// Serialize the string form.
    String,
}

/// A value the resource schema accepts as either an integer or a string.
///
/// Both forms are carried so callers can read whichever they need; the
/// `kind` decides which one goes on the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntOrString {
    /// Serialized form.
    pub kind: IntOrStringKind,
    /// Integer form.
    pub int_val: i32,
    /// String form.
    pub str_val: String,
}

impl IntOrString {
    /// Creates an integer-kind value carrying both forms of `value`.
    #[must_use]
    pub fn int(value: i32) -> Self {
        Self {
            kind: IntOrStringKind::Int,
            int_val: value,
            str_val: value.to_string(),
        }
    }

    /// Creates a string-kind value, such as a named port.
    pub fn string(value: impl Into<String>) -> Self {
        let str_val = value.into();
        Self {
            kind: IntOrStringKind::String,
            int_val: str_val.parse().unwrap_or_default(),
            str_val,
        }
    }
}

impl Serialize for IntOrString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.kind {
            IntOrStringKind::Int => serializer.serialize_i32(self.int_val),
            IntOrStringKind::String => serializer.serialize_str(&self.str_val),
        }
    }
}

impl<'de> Deserialize<'de> for IntOrString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i32),
            Str(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Int(value) => Self::int(value),
            Raw::Str(value) => Self::string(value),
        })
    }
}

impl fmt::Display for IntOrString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            IntOrStringKind::Int => write!(f, "{}", self.int_val),
            IntOrStringKind::String => f.write_str(&self.str_val),
        }
    }
}

// =============================================================================
// Scale sub-resource
// =============================================================================

/// The `autoscaling/v1` `Scale` sub-resource.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Scale {
    /// API version.
    #[serde(default)]
    pub api_version: String,
    /// Kind.
    #[serde(default)]
    pub kind: String,
    /// Metadata.
    #[serde(default)]
    pub metadata: ObjectMeta,
    /// Desired scale.
    #[serde(default)]
    pub spec: ScaleSpec,
}

/// Desired scale.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScaleSpec {
    /// Desired number of replicas.
    #[serde(default)]
    pub replicas: i32,
}

// =============================================================================
// Resource kinds
// =============================================================================

/// Resource kinds the gateway addresses by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// `v1` `ReplicationController`.
    ReplicationController,
    /// `v1` `Service`.
    Service,
    /// `apps/v1` `Deployment`.
    Deployment,
}

impl ResourceKind {
    /// API group; empty for the core group.
    #[must_use]
    pub const fn group(self) -> &'static str {
        match self {
            Self::ReplicationController | Self::Service => "",
            Self::Deployment => "apps",
        }
    }

    /// API version within the group.
    #[must_use]
    pub const fn version(self) -> &'static str {
        "v1"
    }

    /// The `apiVersion` written on resources of this kind.
    #[must_use]
    pub const fn api_version(self) -> &'static str {
        match self {
            Self::ReplicationController | Self::Service => "v1",
            Self::Deployment => "apps/v1",
        }
    }

    /// Lower-case plural resource name used in URLs.
    #[must_use]
    pub const fn plural(self) -> &'static str {
        match self {
            Self::ReplicationController => "replicationcontrollers",
            Self::Service => "services",
            Self::Deployment => "deployments",
        }
    }

    /// File name suffix for manifests of this kind.
    #[must_use]
    pub const fn file_suffix(self) -> &'static str {
        match self {
            Self::ReplicationController => "rc",
            Self::Service => "svc",
            Self::Deployment => "deployment",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReplicationController => write!(f, "ReplicationController"),
            Self::Service => write!(f, "Service"),
            Self::Deployment => write!(f, "Deployment"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_or_string_carries_both_forms() {
        let port = IntOrString::int(8080);
        assert_eq!(port.int_val, 8080);
        assert_eq!(port.str_val, "8080");
        assert_eq!(serde_json::to_string(&port).unwrap(), "8080");
    }

    #[test]
    fn test_int_or_string_named_port() {
        let port = IntOrString::string("http");
        assert_eq!(serde_json::to_string(&port).unwrap(), "\"http\"");

        let parsed: IntOrString = serde_json::from_str("\"http\"").unwrap();
        assert_eq!(parsed.kind, IntOrStringKind::String);
        let parsed: IntOrString = serde_json::from_str("80").unwrap();
        assert_eq!(parsed, IntOrString::int(80));
    }

    #[test]
    fn test_unset_security_context_is_omitted() {
        let container = Container {
            name: String::from("web"),
            image: String::from("nginx"),
            env: vec![],
            ports: vec![],
            security_context: None,
        };
        let json = serde_json::to_value(&container).unwrap();
        assert!(json.get("securityContext").is_none());
        assert!(json.get("env").is_none());
    }

    #[test]
    fn test_service_reads_cluster_ip_and_ignores_unknown_fields() {
        let body = r#"{
            "apiVersion": "v1",
            "kind": "Service",
            "metadata": {"name": "web", "namespace": "default", "uid": "abc"},
            "spec": {
                "clusterIP": "10.0.0.12",
                "selector": {"role": "web"},
                "ports": [{"port": 80, "protocol": "TCP", "targetPort": 8080}],
                "sessionAffinity": "None"
            }
        }"#;
        let svc: Service = serde_json::from_str(body).unwrap();
        assert_eq!(svc.spec.cluster_ip.as_deref(), Some("10.0.0.12"));
        assert_eq!(svc.spec.ports[0].target_port.int_val, 8080);
    }

    #[test]
    fn test_resource_kind_paths() {
        assert_eq!(ResourceKind::ReplicationController.plural(), "replicationcontrollers");
        assert_eq!(ResourceKind::Deployment.api_version(), "apps/v1");
        assert_eq!(ResourceKind::Service.group(), "");
        assert_eq!(ResourceKind::Service.file_suffix(), "svc");
        assert_eq!(ResourceKind::ReplicationController.to_string(), "ReplicationController");
    }
}
