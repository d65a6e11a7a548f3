//! CLI module for kubecompose.
//!
//! This module provides the command-line interface for converting
//! compose projects and managing their resources in a cluster.

mod commands;
mod output;

pub use commands::{Cli, Commands, OutputFormat};
pub use output::OutputFormatter;
