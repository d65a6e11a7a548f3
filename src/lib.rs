// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(warnings)]                    // All warnings are treated as errors
#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![deny(missing_docs)]                // All public items must be documented
#![deny(dead_code)]                   // Unused code is forbidden
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![deny(unused_imports)]              // Unused imports are forbidden
#![deny(unused_variables)]            // Unused variables are forbidden
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::missing_const_for_fn)] // Force const when possible
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::module_inception)]    // Module with same name as crate warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::shadow_unrelated)]    // Shadowing unrelated variables warning
#![warn(clippy::too_many_arguments)]  // Limit function arguments
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// ============================================================================
// Crate Documentation
// ============================================================================

//! # Kubecompose
//!
//! Converts multi-service compose descriptors into Kubernetes workload
//! resources.
//!
//! ## Overview
//!
//! For every service in a compose file, kubecompose produces:
//!
//! - A `ReplicationController` running the service's container
//! - A `Service` exposing its ports
//! - Optionally an `apps/v1` `Deployment`
//!
//! Resources are written to `<service>-<kind>.json` (or `.yaml`), and can
//! be submitted to a cluster, listed, deleted, and scaled.
//!
//! ## Modules
//!
//! - [`config`]: Compose descriptor parsing and endpoint resolution
//! - [`convert`]: Field conversion and resource assembly
//! - [`output`]: Manifest serialization, files, and Helm charts
//! - [`cluster`]: Resource types and the cluster API gateway
//! - [`orchestrator`]: Per-command orchestration over all services
//! - [`cli`]: Command-line interface
//!
//! ## Example
//!
//! ```yaml
//! web:
//!   image: nginx
//!   ports:
//!     - "8080:80"
//!   links:
//!     - db
//! db:
//!   image: postgres
//!   environment:
//!     - POSTGRES_PASSWORD=secret
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod cli;
pub mod cluster;
pub mod config;
pub mod convert;
pub mod error;
pub mod orchestrator;
pub mod output;

// ============================================================================
// Re-exports
// ============================================================================

pub use cli::{Cli, Commands, OutputFormatter};
pub use cluster::{ClusterGateway, KubeClient};
pub use config::{ComposeParser, ComposeProject, DescriptorHasher, ServiceDescriptor};
pub use convert::{LinkSet, ResourceBuilder, ResourceTriple};
pub use error::{KubeComposeError, Result};
pub use orchestrator::{GenerateOptions, GenerateReport, KindSelection, Orchestrator};
pub use output::{HelmChartWriter, ManifestFormat, ManifestWriter};
