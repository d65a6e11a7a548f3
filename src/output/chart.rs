//! Helm chart packaging.
//!
//! The orchestrator only sees [`ChartGenerator`]; [`HelmChartWriter`] is
//! the implementation wired in by the CLI.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::convert::ResourceTriple;
use crate::error::{OutputError, Result};

use super::serializer::ManifestFormat;
use super::writer::ManifestWriter;

/// Chart version written to new charts.
pub const CHART_VERSION: &str = "0.0.1";

/// Packaging collaborator invoked once per service.
pub trait ChartGenerator {
    /// Adds a service's resources to the chart for `project`.
    ///
    /// # Errors
    ///
    /// Returns an error if the chart cannot be written.
    fn generate(&self, project: &str, triple: &ResourceTriple) -> Result<PathBuf>;
}

/// `Chart.yaml` contents.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChartMetadata<'a> {
    api_version: &'static str,
    name: &'a str,
    description: String,
    version: &'static str,
}

/// Writes Helm charts under a base directory.
#[derive(Debug, Clone)]
pub struct HelmChartWriter {
    /// Directory charts are created in.
    base_dir: PathBuf,
}

impl HelmChartWriter {
    /// Creates a chart writer rooted at `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Directory of the chart for `project`.
    #[must_use]
    pub fn chart_dir(&self, project: &str) -> PathBuf {
        self.base_dir.join(project)
    }

    fn write_metadata(chart_dir: &Path, project: &str) -> Result<()> {
        let path = chart_dir.join("Chart.yaml");
        if path.exists() {
            return Ok(());
        }

        let metadata = ChartMetadata {
            api_version: "v2",
            name: project,
            description: format!("A generated Helm chart for {project}"),
            version: CHART_VERSION,
        };
        let rendered = ManifestFormat::Yaml.render(&metadata, "chart metadata")?;
        std::fs::write(&path, rendered).map_err(|e| OutputError::FileWrite {
            path: path.clone(),
            message: e.to_string(),
        })?;

        info!("Created chart {}", chart_dir.display());
        Ok(())
    }
}

impl ChartGenerator for HelmChartWriter {
    fn generate(&self, project: &str, triple: &ResourceTriple) -> Result<PathBuf> {
        let chart_dir = self.chart_dir(project);
        let templates = ManifestWriter::new(chart_dir.join("templates"), ManifestFormat::Yaml);

        // Creates chart_dir as a side effect
        templates.write_triple(triple)?;
        Self::write_metadata(&chart_dir, project)?;

        Ok(chart_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceDescriptor;
    use crate::convert::ResourceBuilder;
    use tempfile::TempDir;

    #[test]
    fn test_chart_layout() {
        let temp = TempDir::new().unwrap();
        let charts = HelmChartWriter::new(temp.path());
        let builder = ResourceBuilder::new();

        for name in ["web", "db"] {
            let triple = builder
                .build(name, &ServiceDescriptor::with_image("busybox"))
                .unwrap();
            charts.generate("shop", &triple).unwrap();
        }

        let chart_dir = temp.path().join("shop");
        let metadata = std::fs::read_to_string(chart_dir.join("Chart.yaml")).unwrap();
        assert!(metadata.contains("name: shop"));
        assert!(metadata.contains("apiVersion: v2"));
        for file in ["web-rc.yaml", "web-svc.yaml", "db-rc.yaml", "db-svc.yaml"] {
            assert!(chart_dir.join("templates").join(file).exists(), "missing {file}");
        }
    }
}
