//! Descriptor types for a compose application.
//!
//! These types map the service section of a compose file into the raw,
//! still-unparsed fields the converter works from. Environment and port
//! entries are kept as strings; interpreting them is the converter's job.

use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::fmt;

/// Project name used when none can be derived from the descriptor path.
pub const DEFAULT_PROJECT_NAME: &str = "kube";

/// A loaded compose project.
///
/// Services are keyed by name in a `BTreeMap` so every loop over them
/// (file generation, submission, listing) runs in name order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeProject {
    /// Project name (used for chart packaging).
    pub name: String,
    /// Service descriptors by service name.
    pub services: BTreeMap<String, ServiceDescriptor>,
}

/// One named application component as declared in the compose file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ServiceDescriptor {
    /// Container image reference.
    #[serde(default)]
    pub image: String,
    /// Raw environment entries (`NAME=value` or `NAME: value`).
    #[serde(default, deserialize_with = "environment_entries")]
    pub environment: Vec<String>,
    /// Raw port entries (`port` or `external:internal`).
    #[serde(default, deserialize_with = "port_entries")]
    pub ports: Vec<String>,
    /// Raw link references to other services.
    #[serde(default)]
    pub links: Vec<String>,
    /// Restart policy token.
    #[serde(default)]
    pub restart: String,
    /// Whether the container runs privileged.
    #[serde(default)]
    pub privileged: bool,
}

/// A scalar kept as the text written in the descriptor.
///
/// Reads through `deserialize_str`, so a YAML deserializer hands over the
/// literal text and `1.10` stays `1.10` instead of becoming a float.
struct ScalarText(String);

impl<'de> Deserialize<'de> for ScalarText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(ScalarTextVisitor).map(Self)
    }
}

struct ScalarTextVisitor;

impl Visitor<'_> for ScalarTextVisitor {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a scalar value")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
        Ok(v.to_string())
    }
}

/// Environment may be declared as a list of strings or as a map.
struct EnvironmentVisitor;

impl<'de> Visitor<'de> for EnvironmentVisitor {
    type Value = Vec<String>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a list of NAME=value entries or a map of names to values")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Vec<String>, E> {
        Ok(Vec::new())
    }

    fn visit_none<E: de::Error>(self) -> Result<Vec<String>, E> {
        Ok(Vec::new())
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Vec<String>, A::Error> {
        let mut entries = Vec::new();
        while let Some(ScalarText(entry)) = seq.next_element()? {
            entries.push(entry);
        }
        Ok(entries)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Vec<String>, A::Error> {
        let mut values = BTreeMap::new();
        while let Some((name, value)) = map.next_entry::<String, Option<ScalarText>>()? {
            values.insert(name, value.map(|ScalarText(text)| text).unwrap_or_default());
        }
        Ok(values
            .into_iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect())
    }
}

fn environment_entries<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(EnvironmentVisitor)
}

fn port_entries<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<ScalarText>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|ScalarText(text)| text)
        .collect())
}

impl ComposeProject {
    /// Creates a project from a set of services.
    #[must_use]
    pub fn new(name: impl Into<String>, services: BTreeMap<String, ServiceDescriptor>) -> Self {
        Self {
            name: name.into(),
            services,
        }
    }

    /// Returns service names in iteration order.
    #[must_use]
    pub fn service_names(&self) -> Vec<&str> {
        self.services.keys().map(String::as_str).collect()
    }
}

impl ServiceDescriptor {
    /// Creates a descriptor with only an image set.
    #[must_use]
    pub fn with_image(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_list_form() {
        let yaml = r"
image: busybox
environment:
  - A=1
  - 'B: two'
";
        let svc: ServiceDescriptor = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(svc.environment, vec!["A=1", "B: two"]);
    }

    #[test]
    fn test_environment_map_form() {
        let yaml = r"
image: busybox
environment:
  DEBUG: true
  PORT: 8080
  EMPTY:
";
        let svc: ServiceDescriptor = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(svc.environment, vec!["DEBUG=true", "EMPTY=", "PORT=8080"]);
    }

    #[test]
    fn test_environment_map_keeps_number_text() {
        let yaml = r"
image: busybox
environment:
  VERSION: 1.10
  RATIO: 2.0
  HEX: 0x1F
";
        let svc: ServiceDescriptor = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(svc.environment, vec!["HEX=0x1F", "RATIO=2.0", "VERSION=1.10"]);
    }

    #[test]
    fn test_empty_environment_key() {
        let svc: ServiceDescriptor = serde_yaml::from_str("image: busybox\nenvironment:\n").unwrap();
        assert!(svc.environment.is_empty());
    }

    #[test]
    fn test_integer_ports_become_strings() {
        let yaml = r#"
image: nginx
ports:
  - 80
  - "8080:80"
"#;
        let svc: ServiceDescriptor = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(svc.ports, vec!["80", "8080:80"]);
    }

    #[test]
    fn test_defaults() {
        let svc: ServiceDescriptor = serde_yaml::from_str("image: redis").unwrap();
        assert!(svc.environment.is_empty());
        assert!(svc.links.is_empty());
        assert_eq!(svc.restart, "");
        assert!(!svc.privileged);
    }
}
