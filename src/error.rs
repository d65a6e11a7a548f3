//! Error types for the kubecompose conversion tool.
//!
//! This module provides the error hierarchy for every stage of a run:
//! descriptor loading, field conversion, manifest output, and calls to
//! the cluster API.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for kubecompose.
#[derive(Debug, Error)]
pub enum KubeComposeError {
    /// Descriptor loading errors.
    #[error("Descriptor error: {0}")]
    Descriptor(#[from] DescriptorError),

    /// Errors converting a service field into a resource field.
    #[error("Conversion error: {0}")]
    Convert(#[from] ConvertError),

    /// Manifest serialization and file output errors.
    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    /// Cluster API errors.
    #[error("Cluster API error: {0}")]
    Cluster(#[from] ClusterError),

    /// A scale request asked for a non-positive replica count.
    #[error("Scale must be a positive number, got {replicas}")]
    InvalidScale {
        /// The rejected replica count.
        replicas: i32,
    },

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors raised while locating or parsing the application descriptor.
#[derive(Debug, Error)]
pub enum DescriptorError {
    /// The descriptor file was not found.
    #[error("Descriptor file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The descriptor could not be parsed.
    #[error("Failed to parse descriptor: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Optional source location.
        location: Option<String>,
    },
}

/// Errors raised while mapping one service's raw fields.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConvertError {
    /// An environment entry has neither `=` nor `:` or an empty name.
    #[error("Invalid container env {entry} for service {service}")]
    InvalidEnvironment {
        /// Owning service.
        service: String,
        /// The raw environment entry.
        entry: String,
    },

    /// A port entry is not a positive integer or `external:internal` pair.
    #[error("Invalid container port {entry} for service {service}")]
    InvalidPort {
        /// Owning service.
        service: String,
        /// The raw port entry.
        entry: String,
    },

    /// The restart token is not one of the known policies.
    #[error("Unknown restart policy {policy} for service {service}")]
    UnknownRestartPolicy {
        /// Owning service.
        service: String,
        /// The unrecognized token.
        policy: String,
    },
}

/// Manifest serialization and file output errors.
#[derive(Debug, Error)]
pub enum OutputError {
    /// A resource could not be rendered.
    #[error("Failed to marshal the {resource}: {message}")]
    Serialization {
        /// Resource description (kind and name).
        resource: String,
        /// Serializer message.
        message: String,
    },

    /// A rendered manifest could not be written.
    #[error("Failed to write {path}: {message}")]
    FileWrite {
        /// Target path.
        path: PathBuf,
        /// Underlying IO message.
        message: String,
    },
}

/// Cluster API errors.
#[derive(Debug, Error)]
pub enum ClusterError {
    /// The named resource does not exist.
    #[error("{kind} not found: {name}")]
    NotFound {
        /// Resource kind.
        kind: String,
        /// Resource name.
        name: String,
    },

    /// The API server rejected the credentials.
    #[error("Cluster authentication failed: {message}")]
    AuthenticationFailed {
        /// Description of the auth failure.
        message: String,
    },

    /// The API server returned a non-success status.
    #[error("Cluster API request failed: {status} - {message}")]
    ApiRequestFailed {
        /// HTTP status code.
        status: u16,
        /// Message from the API server.
        message: String,
    },

    /// The API server could not be reached.
    #[error("Network error communicating with the cluster: {message}")]
    NetworkError {
        /// Description of the network error.
        message: String,
    },

    /// The API server returned a body that could not be decoded.
    #[error("Invalid response from the cluster API: {message}")]
    InvalidResponse {
        /// Description of the response issue.
        message: String,
    },
}

/// Result type alias for kubecompose operations.
pub type Result<T> = std::result::Result<T, KubeComposeError>;

impl KubeComposeError {
    /// Creates a new internal error with the given message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true if this error reports a missing cluster resource.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Cluster(ClusterError::NotFound { .. }))
    }
}

impl DescriptorError {
    /// Creates a parse error with an optional location.
    #[must_use]
    pub fn parse(message: impl Into<String>, location: Option<String>) -> Self {
        Self::ParseError {
            message: message.into(),
            location,
        }
    }
}

impl ClusterError {
    /// Creates an API request error.
    #[must_use]
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiRequestFailed {
            status,
            message: message.into(),
        }
    }

    /// Creates a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkError {
            message: message.into(),
        }
    }

    /// Creates a not-found error for a resource kind and name.
    #[must_use]
    pub fn not_found(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.into(),
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_error_names_service_and_entry() {
        let err = ConvertError::InvalidPort {
            service: String::from("web"),
            entry: String::from("http"),
        };
        assert_eq!(err.to_string(), "Invalid container port http for service web");
    }

    #[test]
    fn test_is_not_found() {
        let err = KubeComposeError::from(ClusterError::not_found("Service", "db"));
        assert!(err.is_not_found());

        let err = KubeComposeError::from(ClusterError::network("refused"));
        assert!(!err.is_not_found());
    }
}
