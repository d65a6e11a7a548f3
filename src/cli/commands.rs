//! CLI command definitions.
//!
//! This module defines all CLI commands and their arguments using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Kubecompose - Convert compose descriptors into Kubernetes resources.
#[derive(Parser, Debug)]
#[command(name = "kubecompose")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the compose file.
    #[arg(short, long, global = true, env = "KUBECOMPOSE_FILE")]
    pub file: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Cluster API endpoint.
    #[arg(long, global = true, env = "KUBECOMPOSE_HOST")]
    pub host: Option<String>,

    /// Bearer token for the cluster API.
    #[arg(long, global = true, env = "KUBECOMPOSE_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Output format (text, json).
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert services to resources, write manifests, and submit them.
    Convert {
        /// Also generate a deployment per service.
        #[arg(short, long)]
        deployment: bool,

        /// Package the resources into a Helm chart.
        #[arg(short, long)]
        chart: bool,

        /// Write YAML instead of JSON.
        #[arg(short, long)]
        yaml: bool,

        /// Write manifests only, never contact the cluster.
        #[arg(long)]
        dry_run: bool,

        /// Directory manifests are written to.
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// List the project's services and replication controllers.
    Ps {
        /// Only list services.
        #[arg(long)]
        svc: bool,

        /// Only list replication controllers.
        #[arg(long)]
        rc: bool,
    },

    /// Delete the project's services and replication controllers.
    Delete {
        /// Only delete services.
        #[arg(long)]
        svc: bool,

        /// Only delete replication controllers.
        #[arg(long)]
        rc: bool,

        /// Only act on this service.
        #[arg(long)]
        name: Option<String>,
    },

    /// Set the replica count of the project's replication controllers.
    Scale {
        /// New replica count.
        #[arg(long, allow_negative_numbers = true)]
        replicas: i32,

        /// Only act on this service.
        #[arg(long)]
        name: Option<String>,
    },

    /// Save the endpoint given with `--host` for later runs.
    Config,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_convert_flags() {
        let cli = Cli::try_parse_from([
            "kubecompose",
            "-f",
            "app.yml",
            "convert",
            "--deployment",
            "--yaml",
            "--out-dir",
            "k8s",
        ])
        .unwrap();

        assert_eq!(cli.file, Some(PathBuf::from("app.yml")));
        match cli.command {
            Commands::Convert {
                deployment,
                chart,
                yaml,
                dry_run,
                out_dir,
            } => {
                assert!(deployment);
                assert!(!chart);
                assert!(yaml);
                assert!(!dry_run);
                assert_eq!(out_dir, PathBuf::from("k8s"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_scale_accepts_negative_count() {
        let cli = Cli::try_parse_from(["kubecompose", "scale", "--replicas", "-1"]).unwrap();
        assert!(matches!(cli.command, Commands::Scale { replicas: -1, name: None }));
    }

    #[test]
    fn test_config_takes_global_host() {
        let cli =
            Cli::try_parse_from(["kubecompose", "config", "--host", "http://10.0.0.1:8080"]).unwrap();
        assert!(matches!(cli.command, Commands::Config));
        assert_eq!(cli.host.as_deref(), Some("http://10.0.0.1:8080"));
    }
}
