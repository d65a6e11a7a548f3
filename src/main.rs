//! Kubecompose CLI entrypoint.
//!
//! This is the main entrypoint for the kubecompose command-line tool.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use kubecompose::cli::{Cli, Commands, OutputFormatter};
use kubecompose::cluster::KubeClient;
use kubecompose::config::{
    find_compose_file, resolve_host, write_endpoint, ComposeParser, ComposeProject,
};
use kubecompose::error::{KubeComposeError, Result};
use kubecompose::orchestrator::{GenerateOptions, KindSelection, Orchestrator};
use kubecompose::output::{HelmChartWriter, ManifestFormat, ManifestWriter};

use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Main entrypoint.
fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    // Run async runtime
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Options shared by every command.
struct Context {
    /// Explicit compose file.
    file: Option<PathBuf>,
    /// Explicit cluster endpoint.
    host: Option<String>,
    /// Bearer token.
    token: Option<String>,
    /// Report formatter.
    formatter: OutputFormatter,
}

/// Main async entry point.
async fn run(cli: Cli) -> Result<()> {
    let ctx = Context {
        file: cli.file,
        host: cli.host,
        token: cli.token,
        formatter: OutputFormatter::new(cli.output),
    };

    match cli.command {
        Commands::Convert {
            deployment,
            chart,
            yaml,
            dry_run,
            out_dir,
        } => {
            let options = GenerateOptions {
                rollout: deployment,
                chart,
                submit: !(deployment || chart || dry_run),
            };
            cmd_convert(&ctx, options, ManifestFormat::from_yaml_flag(yaml), &out_dir).await
        }
        Commands::Ps { svc, rc } => cmd_ps(&ctx, KindSelection::from_flags(svc, rc)).await,
        Commands::Delete { svc, rc, name } => {
            cmd_delete(&ctx, KindSelection::from_flags(svc, rc), name.as_deref()).await
        }
        Commands::Scale { replicas, name } => cmd_scale(&ctx, replicas, name.as_deref()).await,
        Commands::Config => cmd_config(&ctx),
    }
}

/// Convert the project and optionally submit it.
async fn cmd_convert(
    ctx: &Context,
    options: GenerateOptions,
    format: ManifestFormat,
    out_dir: &Path,
) -> Result<()> {
    let project = load_project(ctx.file.as_ref())?;
    let client = create_client(ctx).await?;
    let writer = ManifestWriter::new(out_dir, format);
    let charts = HelmChartWriter::new(out_dir);

    if !options.submit {
        info!("Writing manifests only, nothing will be submitted");
    }

    let report = Orchestrator::new(&project, &client)
        .with_charts(&charts)
        .generate(&writer, options)
        .await?;

    if !report.is_clean() {
        warn!("{} resources were not submitted", report.failures.len());
    }

    print!("{}", ctx.formatter.format_generate(&report));
    Ok(())
}

/// List the project's resources.
async fn cmd_ps(ctx: &Context, kinds: KindSelection) -> Result<()> {
    let project = load_project(ctx.file.as_ref())?;
    let client = create_client(ctx).await?;

    let report = Orchestrator::new(&project, &client).list(kinds).await?;

    print!("{}", ctx.formatter.format_list(&report));
    Ok(())
}

/// Delete the project's resources.
async fn cmd_delete(ctx: &Context, kinds: KindSelection, only: Option<&str>) -> Result<()> {
    let project = load_project(ctx.file.as_ref())?;
    let client = create_client(ctx).await?;

    let deleted = Orchestrator::new(&project, &client)
        .delete(kinds, only)
        .await?;

    print!("{}", ctx.formatter.format_deleted(&deleted));
    Ok(())
}

/// Scale the project's replication controllers.
async fn cmd_scale(ctx: &Context, replicas: i32, only: Option<&str>) -> Result<()> {
    let project = load_project(ctx.file.as_ref())?;
    let client = create_client(ctx).await?;

    let outcomes = Orchestrator::new(&project, &client)
        .scale(replicas, only)
        .await?;

    print!("{}", ctx.formatter.format_scale(&outcomes));
    Ok(())
}

/// Save the cluster endpoint.
fn cmd_config(ctx: &Context) -> Result<()> {
    let host = ctx
        .host
        .as_deref()
        .ok_or_else(|| KubeComposeError::internal("config requires --host"))?;

    let path = write_endpoint(host, ".")?;
    print!("{}", ctx.formatter.format_endpoint(host, &path));
    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Resolves the compose file path.
fn resolve_compose_path(file: Option<&PathBuf>) -> Result<PathBuf> {
    file.map_or_else(|| find_compose_file("."), |path| Ok(path.clone()))
}

/// Loads `.env` and the compose project.
fn load_project(file: Option<&PathBuf>) -> Result<ComposeProject> {
    let compose_file = resolve_compose_path(file)?;
    debug!("Loading compose file from: {}", compose_file.display());

    let parser = ComposeParser::new().with_base_path(
        compose_file
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new(".")),
    );
    parser.load_dotenv()?;

    parser.load_file(&compose_file)
}

/// Creates a cluster API client for the resolved endpoint.
async fn create_client(ctx: &Context) -> Result<KubeClient> {
    let host = resolve_host(ctx.host.as_deref(), ".");
    KubeClient::connect(host.as_deref(), ctx.token.clone()).await
}
