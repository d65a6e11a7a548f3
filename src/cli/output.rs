//! Output formatting for CLI commands.
//!
//! This module provides formatting utilities for displaying
//! information to the user in various formats.

use colored::Colorize;
use serde::Serialize;
use std::fmt::Write;
use std::path::Path;
use tabled::{Table, Tabled};

use crate::orchestrator::{
    GenerateReport, ListReport, ReplicaSummary, ScaleOutcome, ServiceSummary,
};

use super::commands::OutputFormat;

/// Output formatter for CLI.
#[derive(Debug)]
pub struct OutputFormatter {
    /// Output format.
    format: OutputFormat,
}

/// Service row for table display.
#[derive(Tabled)]
struct ServiceRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Cluster IP")]
    cluster_ip: String,
    #[tabled(rename = "Ports")]
    ports: String,
    #[tabled(rename = "Selectors")]
    selectors: String,
}

/// Replication controller row for table display.
#[derive(Tabled)]
struct ReplicaRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Containers")]
    containers: String,
    #[tabled(rename = "Images")]
    images: String,
    #[tabled(rename = "Replicas")]
    replicas: i32,
    #[tabled(rename = "Selectors")]
    selectors: String,
}

impl From<&ServiceSummary> for ServiceRow {
    fn from(svc: &ServiceSummary) -> Self {
        Self {
            name: svc.name.clone(),
            cluster_ip: svc.cluster_ip.clone(),
            ports: svc.ports.join(","),
            selectors: svc.selectors.join(","),
        }
    }
}

impl From<&ReplicaSummary> for ReplicaRow {
    fn from(rc: &ReplicaSummary) -> Self {
        Self {
            name: rc.name.clone(),
            containers: rc.containers.join(","),
            images: rc.images.join(","),
            replicas: rc.replicas,
            selectors: rc.selectors.join(","),
        }
    }
}

impl OutputFormatter {
    /// Creates a new output formatter.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    fn json<T: Serialize + ?Sized>(value: &T) -> String {
        let mut output = serde_json::to_string_pretty(value).unwrap_or_default();
        output.push('\n');
        output
    }

    /// Formats the result of a convert run.
    #[must_use]
    pub fn format_generate(&self, report: &GenerateReport) -> String {
        match self.format {
            OutputFormat::Json => Self::json(report),
            OutputFormat::Text => {
                let mut output = String::new();

                for path in &report.written {
                    let _ = writeln!(output, "file {:?} created", path.display().to_string());
                }
                for chart in &report.charts {
                    let _ = writeln!(output, "chart {:?} created", chart.display().to_string());
                }
                for resource in &report.submitted {
                    let _ = writeln!(output, "{} {resource} submitted", "✓".green());
                }

                if !report.is_clean() {
                    let _ = write!(output, "\n{} Submission failures:\n", "⚠".yellow());
                    for failure in &report.failures {
                        let _ = writeln!(output, "   - {failure}");
                    }
                }

                output
            }
        }
    }

    /// Formats the services and replication controllers found in the cluster.
    #[must_use]
    pub fn format_list(&self, report: &ListReport) -> String {
        match self.format {
            OutputFormat::Json => Self::json(report),
            OutputFormat::Text => {
                let mut output = String::new();

                if !report.services.is_empty() {
                    let rows: Vec<ServiceRow> = report.services.iter().map(ServiceRow::from).collect();
                    output.push_str(&Table::new(rows).to_string());
                    output.push_str("\n\n");
                }

                if !report.replicas.is_empty() {
                    let rows: Vec<ReplicaRow> = report.replicas.iter().map(ReplicaRow::from).collect();
                    output.push_str(&Table::new(rows).to_string());
                    output.push('\n');
                }

                if output.is_empty() {
                    output.push_str("No resources found.\n");
                }

                output
            }
        }
    }

    /// Formats the resources removed by a delete run.
    #[must_use]
    pub fn format_deleted(&self, deleted: &[String]) -> String {
        match self.format {
            OutputFormat::Json => Self::json(deleted),
            OutputFormat::Text => {
                let mut output = String::new();
                for resource in deleted {
                    let _ = writeln!(output, "{} {resource} deleted", "✓".green());
                }
                output
            }
        }
    }

    /// Formats the result of a scale run.
    #[must_use]
    pub fn format_scale(&self, outcomes: &[ScaleOutcome]) -> String {
        match self.format {
            OutputFormat::Json => Self::json(outcomes),
            OutputFormat::Text => {
                let mut output = String::new();
                for outcome in outcomes {
                    let _ = writeln!(output, "Scaling {} to: {}", outcome.name, outcome.replicas);
                }
                output
            }
        }
    }

    /// Formats a saved cluster endpoint.
    #[must_use]
    pub fn format_endpoint(&self, host: &str, path: &Path) -> String {
        match self.format {
            OutputFormat::Json => Self::json(&serde_json::json!({
                "host": host,
                "path": path,
            })),
            OutputFormat::Text => format!("{} Saved endpoint {host} to {}\n", "✓".green(), path.display()),
        }
    }
}
