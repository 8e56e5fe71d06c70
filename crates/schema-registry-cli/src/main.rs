// crates/schema-registry-cli/src/main.rs
// ============================================================================
// Module: Schema Registry CLI Entry Point
// Description: Command dispatcher for serving and uploading schemas.
// Purpose: Run the registry server and push local spec files to it.
// Dependencies: clap, reqwest, schema-registry-core, schema-registry-server
// ============================================================================

//! ## Overview
//! Two commands: `serve` runs the registry HTTP server from an optional TOML
//! configuration file, and `upload` validates a local JSON/YAML spec file
//! with the same syntax check the server applies, then posts it to a running
//! registry as a multipart form.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::ffi::OsStr;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use reqwest::multipart::Form;
use reqwest::multipart::Part;
use schema_registry_core::validate;
use schema_registry_server::RegistryConfig;
use schema_registry_server::RegistryServer;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default registry endpoint for uploads.
const DEFAULT_SERVER: &str = "http://127.0.0.1:8000";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "schema-registry", version, about = "Versioned API schema registry")]
struct Cli {
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the registry HTTP server.
    Serve {
        /// Path to a TOML configuration file. Defaults apply when omitted.
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
    },
    /// Validate a local spec file and upload it to a running registry.
    Upload(UploadArgs),
}

/// Arguments for the upload command.
#[derive(Args, Debug)]
struct UploadArgs {
    /// Path to the spec file (json|yaml).
    #[arg(long, value_name = "PATH")]
    spec: PathBuf,
    /// Application name owning the schema.
    #[arg(long)]
    application: String,
    /// Service name within the application (optional).
    #[arg(long, default_value = "")]
    service: String,
    /// Registry server URL.
    #[arg(long, default_value = DEFAULT_SERVER)]
    server: String,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI failure modes.
#[derive(Debug, Error)]
enum CliError {
    /// Configuration could not be loaded.
    #[error("config error: {0}")]
    Config(String),
    /// Server failed to start or crashed.
    #[error("server error: {0}")]
    Server(String),
    /// Local file could not be read.
    #[error("io error: {0}")]
    Io(String),
    /// Local validation rejected the spec file.
    #[error("validation error: {0}")]
    Validation(String),
    /// Upload request failed or was rejected.
    #[error("upload failed: {0}")]
    Upload(String),
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// Process entry point.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            emit_error(&format!("Error: {error}"));
            ExitCode::FAILURE
        }
    }
}

/// Dispatches the parsed command.
async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Serve {
            config,
        } => run_serve(config).await,
        Commands::Upload(args) => run_upload(args).await,
    }
}

// ============================================================================
// SECTION: Serve Command
// ============================================================================

/// Runs the registry server until it fails.
async fn run_serve(config: Option<PathBuf>) -> Result<(), CliError> {
    let config = match config {
        Some(path) => {
            RegistryConfig::load(&path).map_err(|err| CliError::Config(err.to_string()))?
        }
        None => RegistryConfig::default(),
    };
    let server =
        RegistryServer::from_config(config).map_err(|err| CliError::Server(err.to_string()))?;
    server.serve().await.map_err(|err| CliError::Server(err.to_string()))
}

// ============================================================================
// SECTION: Upload Command
// ============================================================================

/// Upload success reply from the registry.
#[derive(Debug, Deserialize)]
struct UploadReply {
    /// Assigned version identifier.
    version_id: i64,
}

/// Validates a local spec file and posts it to the registry.
async fn run_upload(args: UploadArgs) -> Result<(), CliError> {
    let file_name = args
        .spec
        .file_name()
        .and_then(OsStr::to_str)
        .ok_or_else(|| CliError::Validation("spec path has no filename".to_string()))?
        .to_string();
    let content = fs::read(&args.spec)
        .map_err(|err| CliError::Io(format!("cannot read {}: {err}", args.spec.display())))?;
    // Same syntax check the server applies, before any bytes leave the
    // machine.
    validate(&file_name, &content).map_err(|err| CliError::Validation(err.to_string()))?;
    let url = upload_url(&args.server)?;
    let form = Form::new()
        .text("application", args.application)
        .text("service", args.service)
        .part("file", Part::bytes(content).file_name(file_name));
    let response = reqwest::Client::new()
        .post(url)
        .multipart(form)
        .send()
        .await
        .map_err(|err| CliError::Upload(err.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        let detail = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|body| body.get("detail").and_then(Value::as_str).map(str::to_owned))
            .unwrap_or_else(|| "no detail provided".to_string());
        return Err(CliError::Upload(format!("server responded {status}: {detail}")));
    }
    let reply: UploadReply =
        response.json().await.map_err(|err| CliError::Upload(err.to_string()))?;
    emit(&format!("Schema uploaded successfully! Version: {}", reply.version_id));
    Ok(())
}

/// Resolves the upload endpoint from the server base URL.
fn upload_url(server: &str) -> Result<Url, CliError> {
    let base =
        Url::parse(server).map_err(|_| CliError::Validation("invalid server url".to_string()))?;
    base.join("/api/upload").map_err(|_| CliError::Validation("invalid server url".to_string()))
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes one user-facing line to stdout.
#[allow(clippy::print_stdout, reason = "User-facing CLI output.")]
fn emit(line: &str) {
    println!("{line}");
}

/// Writes one user-facing line to stderr.
#[allow(clippy::print_stderr, reason = "User-facing CLI errors.")]
fn emit_error(line: &str) {
    eprintln!("{line}");
}
