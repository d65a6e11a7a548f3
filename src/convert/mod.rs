//! Conversion engine.
//!
//! This module turns raw service descriptors into Kubernetes resources:
//! - Parsing environment and port entries
//! - Resolving restart policies and security contexts
//! - Aggregating link references across services
//! - Assembling the per-service resource triple

mod builder;
mod env;
mod links;
mod policy;
mod ports;

pub use builder::{
    role_labels, ResourceBuilder, ResourceTriple, DEFAULT_REPLICAS, ROLE_LABEL, RUN_LABEL,
};
pub use env::parse_env;
pub use links::LinkSet;
pub use policy::{resolve_restart_policy, security_context};
pub use ports::PortBinding;
