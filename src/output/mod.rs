//! Output module for generated manifests.
//!
//! This module renders resources as JSON or YAML, writes them to
//! per-service files, and packages them into Helm charts.

mod chart;
mod serializer;
mod writer;

pub use chart::{ChartGenerator, HelmChartWriter, CHART_VERSION};
pub use serializer::ManifestFormat;
pub use writer::ManifestWriter;
