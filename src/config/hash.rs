//! Descriptor hashing for the run label.
//!
//! The rollout resource carries a label derived from the whole
//! descriptor set, so resources produced by the same descriptor share
//! a value and a changed descriptor yields a new one.

use sha2::{Digest, Sha256};

use super::spec::{ComposeProject, ServiceDescriptor};

/// Length of the hash used in label values.
pub const SHORT_HASH_LEN: usize = 12;

/// Hasher for compose descriptors.
#[derive(Debug, Default)]
pub struct DescriptorHasher;

impl DescriptorHasher {
    /// Creates a new descriptor hasher.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Computes a hash of every service in the project.
    ///
    /// Services are visited in name order, so the result does not
    /// depend on how the descriptor was laid out.
    #[must_use]
    pub fn hash_project(&self, project: &ComposeProject) -> String {
        let mut hasher = Sha256::new();

        for (name, service) in &project.services {
            hasher.update(name.as_bytes());
            hasher.update(self.hash_service(service).as_bytes());
        }

        hex::encode(hasher.finalize())
    }

    /// Computes a hash for a single service descriptor.
    #[must_use]
    pub fn hash_service(&self, service: &ServiceDescriptor) -> String {
        let mut hasher = Sha256::new();

        hasher.update(service.image.as_bytes());

        // Field separators keep ["ab"] and ["a", "b"] apart
        for env in &service.environment {
            hasher.update(env.as_bytes());
            hasher.update([0u8]);
        }
        hasher.update([1u8]);
        for port in &service.ports {
            hasher.update(port.as_bytes());
            hasher.update([0u8]);
        }
        hasher.update([1u8]);
        for link in &service.links {
            hasher.update(link.as_bytes());
            hasher.update([0u8]);
        }
        hasher.update([1u8]);

        hasher.update(service.restart.as_bytes());
        hasher.update([u8::from(service.privileged)]);

        hex::encode(hasher.finalize())
    }

    /// Returns a short label-safe prefix of a hash.
    #[must_use]
    pub fn short_hash<'h>(&self, hash: &'h str) -> &'h str {
        &hash[..SHORT_HASH_LEN.min(hash.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn project_with(services: &[(&str, ServiceDescriptor)]) -> ComposeProject {
        let services: BTreeMap<String, ServiceDescriptor> = services
            .iter()
            .map(|(name, svc)| ((*name).to_string(), svc.clone()))
            .collect();
        ComposeProject::new("test", services)
    }

    #[test]
    fn test_project_hash_deterministic() {
        let hasher = DescriptorHasher::new();
        let project = project_with(&[("web", ServiceDescriptor::with_image("nginx"))]);

        assert_eq!(hasher.hash_project(&project), hasher.hash_project(&project));
    }

    #[test]
    fn test_changed_service_changes_hash() {
        let hasher = DescriptorHasher::new();
        let before = project_with(&[("web", ServiceDescriptor::with_image("nginx:1.25"))]);
        let after = project_with(&[("web", ServiceDescriptor::with_image("nginx:1.26"))]);

        assert_ne!(hasher.hash_project(&before), hasher.hash_project(&after));
    }

    #[test]
    fn test_entry_boundaries_matter() {
        let hasher = DescriptorHasher::new();
        let mut joined = ServiceDescriptor::with_image("x");
        joined.environment = vec![String::from("AB=1")];
        let mut split = ServiceDescriptor::with_image("x");
        split.environment = vec![String::from("A"), String::from("B=1")];

        assert_ne!(hasher.hash_service(&joined), hasher.hash_service(&split));
    }

    #[test]
    fn test_short_hash() {
        let hasher = DescriptorHasher::new();
        assert_eq!(hasher.short_hash("abcdef1234567890abcdef"), "abcdef123456");
        assert_eq!(hasher.short_hash("abc"), "abc");
    }
}
