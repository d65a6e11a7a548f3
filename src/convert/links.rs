//! Cross-service link aggregation.

use std::collections::BTreeSet;

use crate::config::ServiceDescriptor;

/// The distinct link tokens declared across every service of a run.
///
/// Tokens are held in a set, so repeats collapse and the contents do
/// not depend on the order services or links were visited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkSet {
    tokens: BTreeSet<String>,
}

impl LinkSet {
    /// Creates an empty link set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tokens: BTreeSet::new(),
        }
    }

    /// Collects the links of every given service.
    pub fn from_services<'a>(services: impl IntoIterator<Item = &'a ServiceDescriptor>) -> Self {
        services
            .into_iter()
            .flat_map(|svc| svc.links.iter().cloned())
            .collect()
    }

    /// Adds a token; returns false if it was already present.
    pub fn insert(&mut self, token: impl Into<String>) -> bool {
        self.tokens.insert(token.into())
    }

    /// Returns true if the exact token was observed.
    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    /// Returns true if some link targets the named service.
    ///
    /// A link may carry an alias (`db:database`); the part before the
    /// colon names the target service.
    #[must_use]
    pub fn references(&self, service: &str) -> bool {
        self.tokens
            .iter()
            .any(|token| token.split(':').next().map(str::trim) == Some(service))
    }

    /// Number of distinct tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns true if no links were declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Iterates tokens in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for LinkSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for token in iter {
            set.insert(token);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_collapse() {
        let links: LinkSet = ["a", "b", "a"].into_iter().collect();
        assert_eq!(links.len(), 2);
        assert_eq!(links.iter().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_order_independent() {
        let forward: LinkSet = ["redis", "db", "cache", "db"].into_iter().collect();
        let backward: LinkSet = ["db", "cache", "db", "redis"].into_iter().collect();
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_from_services_across_services() {
        let mut web = ServiceDescriptor::with_image("nginx");
        web.links = vec![String::from("db"), String::from("cache")];
        let mut worker = ServiceDescriptor::with_image("worker");
        worker.links = vec![String::from("db"), String::from("db")];
        let db = ServiceDescriptor::with_image("postgres");

        let links = LinkSet::from_services([&web, &worker, &db]);
        assert_eq!(links.iter().collect::<Vec<_>>(), vec!["cache", "db"]);
        assert!(links.contains("db"));
        assert!(!links.contains("postgres"));
    }

    #[test]
    fn test_references_resolves_aliases() {
        let links: LinkSet = ["db:database", "cache"].into_iter().collect();
        assert!(links.references("db"));
        assert!(links.references("cache"));
        assert!(!links.references("database"));
        assert!(!links.references("web"));
    }

    #[test]
    fn test_insert_reports_new_tokens() {
        let mut links = LinkSet::new();
        assert!(links.is_empty());
        assert!(links.insert("db"));
        assert!(!links.insert("db"));
    }
}
