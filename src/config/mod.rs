//! Configuration module for kubecompose.
//!
//! This module handles everything read before conversion starts:
//! - Parsing compose descriptors into service records
//! - Resolving the cluster API endpoint
//! - Hashing the descriptor set for the run label

mod spec;
mod parser;
mod hash;

pub use spec::{ComposeProject, ServiceDescriptor, DEFAULT_PROJECT_NAME};
pub use parser::{
    find_compose_file, resolve_host, write_endpoint, ComposeParser, DEFAULT_COMPOSE_FILES,
    DEFAULT_HOST, ENDPOINT_FILE,
};
pub use hash::{DescriptorHasher, SHORT_HASH_LEN};
