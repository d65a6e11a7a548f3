//! Manifest rendering.

use serde::Serialize;

use crate::error::OutputError;

/// Textual encoding used for generated manifests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ManifestFormat {
    /// Pretty-printed JSON.
    #[default]
    Json,
    /// YAML.
    Yaml,
}

impl ManifestFormat {
    /// Picks YAML when `yaml` is set, JSON otherwise.
    #[must_use]
    pub const fn from_yaml_flag(yaml: bool) -> Self {
        if yaml { Self::Yaml } else { Self::Json }
    }

    /// File extension without the dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }

    /// Renders a resource.
    ///
    /// `what` names the resource in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError::Serialization`] if the encoder fails.
    pub fn render<T: Serialize>(self, resource: &T, what: &str) -> Result<String, OutputError> {
        let rendered = match self {
            Self::Json => serde_json::to_string_pretty(resource)
                .map(|mut json| {
                    json.push('\n');
                    json
                })
                .map_err(|e| e.to_string()),
            Self::Yaml => serde_yaml::to_string(resource).map_err(|e| e.to_string()),
        };

        rendered.map_err(|message| OutputError::Serialization {
            resource: what.to_string(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::{IntOrString, Protocol, ServicePort};

    fn port() -> ServicePort {
        ServicePort {
            name: String::from("8080"),
            port: 8080,
            protocol: Protocol::Tcp,
            target_port: IntOrString::int(80),
        }
    }

    #[test]
    fn test_json_uses_wire_names() {
        let json = ManifestFormat::Json.render(&port(), "service port").unwrap();
        assert!(json.contains("\"targetPort\": 80"));
        assert!(json.contains("\"protocol\": \"TCP\""));
    }

    #[test]
    fn test_formats_decode_to_same_value() {
        let json = ManifestFormat::Json.render(&port(), "service port").unwrap();
        let yaml = ManifestFormat::Yaml.render(&port(), "service port").unwrap();

        let from_json: serde_json::Value = serde_json::from_str(&json).unwrap();
        let from_yaml: serde_json::Value = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(from_json, from_yaml);
    }

    #[test]
    fn test_extension_and_flag() {
        assert_eq!(ManifestFormat::from_yaml_flag(true).extension(), "yaml");
        assert_eq!(ManifestFormat::from_yaml_flag(false).extension(), "json");
    }
}
