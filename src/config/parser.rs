//! Compose descriptor parser and endpoint configuration.
//!
//! This module loads a compose file into a [`ComposeProject`], loads an
//! optional `.env` file next to it, and resolves which cluster API
//! endpoint commands talk to.

use crate::error::{DescriptorError, KubeComposeError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::spec::{ComposeProject, ServiceDescriptor, DEFAULT_PROJECT_NAME};

/// Default compose file names to search for.
pub const DEFAULT_COMPOSE_FILES: &[&str] = &[
    "docker-compose.yml",
    "docker-compose.yaml",
    "compose.yml",
    "compose.yaml",
];

/// File holding a persisted cluster API endpoint.
pub const ENDPOINT_FILE: &str = ".kuberconfig";

/// Endpoint used when nothing else is configured.
pub const DEFAULT_HOST: &str = "http://127.0.0.1:8080";

/// Parser for compose descriptors.
#[derive(Debug, Default)]
pub struct ComposeParser {
    /// Base path for resolving the `.env` file.
    base_path: Option<PathBuf>,
}

impl ComposeParser {
    /// Creates a new compose parser.
    #[must_use]
    pub const fn new() -> Self {
        Self { base_path: None }
    }

    /// Sets the base path for resolving relative paths.
    #[must_use]
    pub fn with_base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Loads a compose project from a YAML file.
    ///
    /// The project is named after the directory containing the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<ComposeProject> {
        let path = path.as_ref();
        info!("Loading compose file from: {}", path.display());

        if !path.exists() {
            return Err(KubeComposeError::Descriptor(DescriptorError::FileNotFound {
                path: path.to_path_buf(),
            }));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            DescriptorError::parse(
                format!("Failed to read file: {e}"),
                Some(path.display().to_string()),
            )
        })?;

        let services = self.parse_yaml(&content, Some(path))?;
        Ok(ComposeProject::new(project_name_for(path), services))
    }

    /// Parses the services of a compose document.
    ///
    /// Both the legacy layout (services at the top level) and the
    /// versioned layout (a `services:` map) are accepted.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid.
    pub fn parse_yaml(
        &self,
        content: &str,
        source: Option<&Path>,
    ) -> Result<BTreeMap<String, ServiceDescriptor>> {
        debug!("Parsing compose YAML");
        let location = || source.map(|p| p.display().to_string());

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        let document: serde_yaml::Value = serde_yaml::from_str(content)
            .map_err(|e| DescriptorError::parse(format!("YAML parse error: {e}"), location()))?;

        // Services are read from the text rather than from `document` so
        // scalar values keep the spelling they were written with.
        let services = if document.get("services").is_some() {
            serde_yaml::from_str::<VersionedLayout>(content)
                .map(|layout| layout.services.unwrap_or_default())
        } else if document.is_null() {
            Ok(BTreeMap::new())
        } else {
            serde_yaml::from_str::<BTreeMap<String, ServiceDescriptor>>(content)
        }
        .map_err(|e| DescriptorError::parse(format!("Invalid service definition: {e}"), location()))?;

        debug!("Parsed {} services", services.len());
        Ok(services)
    }

    /// Loads the .env file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the .env file exists but cannot be loaded.
    pub fn load_dotenv(&self) -> Result<()> {
        let env_path = self
            .base_path
            .as_ref()
            .map_or_else(|| PathBuf::from(".env"), |p| p.join(".env"));

        if env_path.exists() {
            info!("Loading environment from: {}", env_path.display());
            dotenvy::from_path(&env_path).map_err(|e| {
                DescriptorError::parse(
                    format!("Failed to load .env file: {e}"),
                    Some(env_path.display().to_string()),
                )
            })?;
        } else {
            debug!(".env file not found at: {}", env_path.display());
        }

        Ok(())
    }
}

/// The `services:` section of a versioned compose file.
#[derive(Deserialize)]
struct VersionedLayout {
    #[serde(default)]
    services: Option<BTreeMap<String, ServiceDescriptor>>,
}

/// Derives a project name from the directory holding the descriptor.
fn project_name_for(path: &Path) -> String {
    path.canonicalize()
        .ok()
        .as_deref()
        .and_then(Path::parent)
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| String::from(DEFAULT_PROJECT_NAME))
}

/// Finds the compose file in the given directory or its parents.
///
/// # Errors
///
/// Returns an error if no compose file is found.
pub fn find_compose_file(start_dir: impl AsRef<Path>) -> Result<PathBuf> {
    let start = start_dir.as_ref();
    let mut current = start.canonicalize().unwrap_or_else(|_| start.to_path_buf());

    loop {
        for filename in DEFAULT_COMPOSE_FILES {
            let candidate = current.join(filename);
            if candidate.exists() {
                info!("Found compose file: {}", candidate.display());
                return Ok(candidate);
            }
        }

        if !current.pop() {
            break;
        }
    }

    Err(KubeComposeError::Descriptor(DescriptorError::FileNotFound {
        path: start.join(DEFAULT_COMPOSE_FILES[0]),
    }))
}

/// Resolves an explicitly configured cluster API endpoint.
///
/// An explicit host wins; otherwise the endpoint persisted in
/// `.kuberconfig` under `dir` is used. `None` leaves the choice to the
/// kubeconfig, then [`DEFAULT_HOST`].
#[must_use]
pub fn resolve_host(explicit: Option<&str>, dir: impl AsRef<Path>) -> Option<String> {
    if let Some(host) = explicit.map(str::trim).filter(|h| !h.is_empty()) {
        return Some(host.to_string());
    }

    let endpoint_path = dir.as_ref().join(ENDPOINT_FILE);
    match std::fs::read_to_string(&endpoint_path) {
        Ok(content) if !content.trim().is_empty() => {
            debug!("Using endpoint from {}", endpoint_path.display());
            Some(content.trim().to_string())
        }
        _ => None,
    }
}

/// Persists a cluster API endpoint to `.kuberconfig` under `dir`.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_endpoint(host: &str, dir: impl AsRef<Path>) -> Result<PathBuf> {
    let endpoint_path = dir.as_ref().join(ENDPOINT_FILE);
    std::fs::write(&endpoint_path, host).map_err(|e| {
        crate::error::OutputError::FileWrite {
            path: endpoint_path.clone(),
            message: e.to_string(),
        }
    })?;
    info!("Wrote cluster endpoint to {}", endpoint_path.display());
    Ok(endpoint_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_legacy_layout() {
        let yaml = r"
hello:
  image: busybox
  stdin_open: true
  tty: true
";
        let services = ComposeParser::new().parse_yaml(yaml, None).unwrap();
        assert_eq!(services.len(), 1);
        assert_eq!(services["hello"].image, "busybox");
    }

    #[test]
    fn test_parse_versioned_layout() {
        let yaml = r#"
version: "2"
services:
  web:
    image: nginx
    ports:
      - "80:8080"
    links:
      - db
    restart: always
  db:
    image: postgres
    environment:
      POSTGRES_PASSWORD: secret
    privileged: true
volumes:
  data: {}
"#;
        let services = ComposeParser::new().parse_yaml(yaml, None).unwrap();
        assert_eq!(services.keys().collect::<Vec<_>>(), vec!["db", "web"]);
        assert_eq!(services["web"].links, vec!["db"]);
        assert_eq!(services["db"].environment, vec!["POSTGRES_PASSWORD=secret"]);
        assert!(services["db"].privileged);
    }

    #[test]
    fn test_parse_versioned_layout_without_services() {
        let yaml = "version: \"2\"\nservices:\n";
        let services = ComposeParser::new().parse_yaml(yaml, None).unwrap();
        assert!(services.is_empty());
    }

    #[test]
    fn test_parse_keeps_env_number_text() {
        let yaml = r#"
version: "3"
services:
  app:
    image: busybox
    environment:
      VERSION: 1.10
      RATIO: 2.0
"#;
        let services = ComposeParser::new().parse_yaml(yaml, None).unwrap();
        assert_eq!(services["app"].environment, vec!["RATIO=2.0", "VERSION=1.10"]);
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let result = ComposeParser::new().parse_yaml("web: [unclosed", None);
        assert!(matches!(
            result,
            Err(KubeComposeError::Descriptor(DescriptorError::ParseError { .. }))
        ));
    }

    #[test]
    fn test_parse_empty_document() {
        let services = ComposeParser::new().parse_yaml("", None).unwrap();
        assert!(services.is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let result = ComposeParser::new().load_file(temp.path().join("docker-compose.yml"));
        assert!(matches!(
            result,
            Err(KubeComposeError::Descriptor(DescriptorError::FileNotFound { .. }))
        ));
    }

    #[test]
    fn test_load_file_names_project_after_directory() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("shop");
        std::fs::create_dir(&dir).unwrap();
        let path = dir.join("docker-compose.yml");
        std::fs::write(&path, "hello:\n  image: busybox\n").unwrap();

        let project = ComposeParser::new().load_file(&path).unwrap();
        assert_eq!(project.name, "shop");
        assert_eq!(project.service_names(), vec!["hello"]);
    }

    #[test]
    fn test_find_compose_file_in_parent() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("compose.yaml"), "a:\n  image: x\n").unwrap();
        let nested = temp.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let found = find_compose_file(&nested).unwrap();
        assert_eq!(found, temp.path().join("compose.yaml"));
    }

    #[test]
    fn test_resolve_host_precedence() {
        let temp = TempDir::new().unwrap();
        assert_eq!(resolve_host(None, temp.path()), None);
        assert_eq!(resolve_host(Some("  "), temp.path()), None);

        write_endpoint("https://10.0.0.1:6443\n", temp.path()).unwrap();
        assert_eq!(
            resolve_host(None, temp.path()).as_deref(),
            Some("https://10.0.0.1:6443")
        );

        assert_eq!(
            resolve_host(Some("http://override:8080"), temp.path()).as_deref(),
            Some("http://override:8080")
        );
    }
}
