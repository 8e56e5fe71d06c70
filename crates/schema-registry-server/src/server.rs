// crates/schema-registry-server/src/server.rs
// ============================================================================
// Module: Registry HTTP Server
// Description: axum request handlers for upload, latest, list, and fetch.
// Purpose: Orchestrate validator, version store, and file store per request.
// Dependencies: schema-registry-core, schema-registry-store-sqlite, axum, tokio
// ============================================================================

//! ## Overview
//! The HTTP layer exposes four operations: upload a schema, fetch the latest
//! version as raw text, list all versions of a scope, and fetch one version
//! as a parsed structure. Handlers are stateless; shared state is an
//! explicitly constructed [`ServerState`] injected through axum. Validation
//! failures are returned before any mutation. When the version row insert
//! succeeds and the file write fails, the row is not rolled back: that
//! inconsistency window is part of the contract and surfaces as an internal
//! error plus a `file_write` audit kind.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::extract::Multipart;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use axum::routing::post;
use schema_registry_core::SchemaFormat;
use schema_registry_core::Scope;
use schema_registry_core::SharedVersionStore;
use schema_registry_core::StoreError;
use schema_registry_core::ValidateError;
use schema_registry_core::VersionId;
use schema_registry_core::VersionStore;
use schema_registry_core::validate;
use schema_registry_store_sqlite::SqliteVersionStore;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::audit::AuditEvent;
use crate::audit::AuditSink;
use crate::audit::Operation;
use crate::audit::StderrAuditSink;
use crate::config::RegistryConfig;
use crate::storage::FileStore;
use crate::storage::FileStoreError;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Registry server lifecycle errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration rejected during startup.
    #[error("server config error: {0}")]
    Config(String),
    /// Store or storage initialization failed.
    #[error("server init error: {0}")]
    Init(String),
    /// HTTP transport failed.
    #[error("server transport error: {0}")]
    Transport(String),
}

/// Terminal per-request error mapped to an HTTP response.
#[derive(Debug)]
struct ApiError {
    /// Response status code.
    status: StatusCode,
    /// Normalized kind label for audit events.
    kind: &'static str,
    /// Human-readable detail returned to the client.
    detail: String,
}

impl ApiError {
    /// Builds a client error.
    fn bad_request(kind: &'static str, detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            kind,
            detail: detail.into(),
        }
    }

    /// Builds a not-found error.
    fn not_found(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            kind: "not_found",
            detail: detail.into(),
        }
    }

    /// Builds a server error.
    fn internal(kind: &'static str, detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            kind,
            detail: detail.into(),
        }
    }

    /// Maps a validation failure to a client error.
    fn from_validate(error: &ValidateError) -> Self {
        let kind = match error {
            ValidateError::UnsupportedFormat => "unsupported_format",
            ValidateError::MalformedContent(_) => "malformed_content",
        };
        Self::bad_request(kind, error.to_string())
    }

    /// Maps a version store failure to a server error.
    fn from_store(error: &StoreError) -> Self {
        Self::internal("store", error.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            detail: self.detail,
        };
        (self.status, axum::Json(body)).into_response()
    }
}

/// Error body mirroring the `detail` shape clients expect.
#[derive(Debug, Serialize)]
struct ErrorBody {
    /// Human-readable failure description.
    detail: String,
}

// ============================================================================
// SECTION: Server State
// ============================================================================

/// Shared state injected into request handlers.
#[derive(Clone)]
pub struct ServerState {
    /// Version metadata store.
    pub(crate) versions: SharedVersionStore,
    /// Raw schema file store.
    pub(crate) files: FileStore,
    /// Audit sink receiving one event per request.
    pub(crate) audit: Arc<dyn AuditSink>,
    /// Maximum accepted request body size in bytes.
    pub(crate) max_body_bytes: usize,
}

/// Builds server state from validated configuration.
///
/// # Errors
///
/// Returns [`ServerError`] when the version store or file store cannot be
/// opened.
pub fn build_server_state(config: &RegistryConfig) -> Result<ServerState, ServerError> {
    let store = SqliteVersionStore::new(&config.version_store)
        .map_err(|err| ServerError::Init(err.to_string()))?;
    let files =
        FileStore::new(&config.storage.root).map_err(|err| ServerError::Init(err.to_string()))?;
    Ok(ServerState {
        versions: SharedVersionStore::from_store(store),
        files,
        audit: Arc::new(StderrAuditSink),
        max_body_bytes: config.server.max_body_bytes,
    })
}

/// Builds the axum router over the given state.
#[must_use]
pub fn router(state: ServerState) -> Router {
    let max_body_bytes = state.max_body_bytes;
    Router::new()
        .route("/api/upload", post(handle_upload))
        .route("/api/latest", get(handle_latest))
        .route("/api/get-versions", get(handle_list_versions))
        .route("/api/get-version", get(handle_get_version))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(Arc::new(state))
}

// ============================================================================
// SECTION: Server
// ============================================================================

/// Registry HTTP server instance.
pub struct RegistryServer {
    /// Validated server configuration.
    config: RegistryConfig,
}

impl RegistryServer {
    /// Builds a new registry server from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when the configuration is invalid.
    pub fn from_config(config: RegistryConfig) -> Result<Self, ServerError> {
        config.validate().map_err(|err| ServerError::Config(err.to_string()))?;
        Ok(Self {
            config,
        })
    }

    /// Serves requests until the listener fails.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when binding or serving fails.
    pub async fn serve(self) -> Result<(), ServerError> {
        let addr: SocketAddr = self
            .config
            .server
            .bind
            .parse()
            .map_err(|_| ServerError::Config("invalid bind address".to_string()))?;
        let state = build_server_state(&self.config)?;
        let app = router(state);
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|_| ServerError::Transport("http bind failed".to_string()))?;
        axum::serve(listener, app)
            .await
            .map_err(|_| ServerError::Transport("http server failed".to_string()))
    }
}

// ============================================================================
// SECTION: Request Payloads
// ============================================================================

/// Query fields identifying a scope.
#[derive(Debug, Deserialize)]
struct ScopeQuery {
    /// Application name.
    application: String,
    /// Optional service name.
    #[serde(default)]
    service: String,
}

/// Query fields identifying one version within a scope.
#[derive(Debug, Deserialize)]
struct VersionQuery {
    /// Application name.
    application: String,
    /// Optional service name.
    #[serde(default)]
    service: String,
    /// Requested version identifier.
    version: i64,
}

/// Decoded multipart upload form.
struct UploadForm {
    /// Application name field.
    application: String,
    /// Service name field, empty when omitted.
    service: String,
    /// Uploaded filename carrying the declared extension.
    file_name: String,
    /// Raw uploaded bytes.
    content: Vec<u8>,
}

// ============================================================================
// SECTION: Response Payloads
// ============================================================================

/// Upload success payload.
#[derive(Debug, Serialize)]
struct UploadResponse {
    /// Static confirmation message.
    message: &'static str,
    /// Assigned version identifier.
    version_id: VersionId,
}

/// Latest-version payload carrying the raw stored text.
#[derive(Debug, Serialize)]
struct LatestResponse {
    /// Raw schema file content.
    schema: String,
    /// Version identifier of the returned schema.
    version: VersionId,
}

/// Version listing payload.
#[derive(Debug, Serialize)]
struct VersionsResponse {
    /// Versions for the scope, newest first.
    versions: Vec<VersionEntry>,
}

/// One row of the version listing.
#[derive(Debug, Serialize)]
struct VersionEntry {
    /// Version identifier.
    version: VersionId,
    /// Insertion timestamp in unix-epoch milliseconds.
    created_at: i64,
}

/// Exact-version payload carrying the parsed document.
#[derive(Debug, Serialize)]
struct VersionResponse {
    /// Parsed schema document.
    schema: Value,
    /// Version identifier of the returned schema.
    version: VersionId,
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Handles `POST /api/upload`.
async fn handle_upload(State(state): State<Arc<ServerState>>, multipart: Multipart) -> Response {
    match read_upload_form(multipart).await {
        Ok(form) => {
            let application = form.application.clone();
            let service = form.service.clone();
            let result = process_upload(&state, &form);
            finish(&state, Operation::Upload, application, service, result)
        }
        Err(error) => {
            finish::<UploadResponse>(
                &state,
                Operation::Upload,
                String::new(),
                String::new(),
                Err(error),
            )
        }
    }
}

/// Handles `GET /api/latest`.
async fn handle_latest(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<ScopeQuery>,
) -> Response {
    let result = process_latest(&state, &query);
    finish(&state, Operation::GetLatest, query.application, query.service, result)
}

/// Handles `GET /api/get-versions`.
async fn handle_list_versions(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<ScopeQuery>,
) -> Response {
    let result = process_list_versions(&state, &query);
    finish(&state, Operation::ListVersions, query.application, query.service, result)
}

/// Handles `GET /api/get-version`.
async fn handle_get_version(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<VersionQuery>,
) -> Response {
    let result = process_get_version(&state, &query);
    finish(&state, Operation::GetVersion, query.application, query.service, result)
}

// ============================================================================
// SECTION: Request Processing
// ============================================================================

/// Decodes the multipart upload form into memory.
async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, ApiError> {
    let mut application = None;
    let mut service = None;
    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::bad_request("bad_multipart", err.to_string()))?
    {
        match field.name().map(str::to_owned).as_deref() {
            Some("application") => {
                application = Some(
                    field
                        .text()
                        .await
                        .map_err(|err| ApiError::bad_request("bad_multipart", err.to_string()))?,
                );
            }
            Some("service") => {
                service = Some(
                    field
                        .text()
                        .await
                        .map_err(|err| ApiError::bad_request("bad_multipart", err.to_string()))?,
                );
            }
            Some("file") => {
                let file_name = field.file_name().map(str::to_owned).ok_or_else(|| {
                    ApiError::bad_request("bad_multipart", "file field requires a filename")
                })?;
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|err| ApiError::bad_request("bad_multipart", err.to_string()))?;
                file = Some((file_name, bytes.to_vec()));
            }
            _ => {}
        }
    }
    let application = application
        .ok_or_else(|| ApiError::bad_request("bad_multipart", "application field is required"))?;
    let (file_name, content) =
        file.ok_or_else(|| ApiError::bad_request("bad_multipart", "file field is required"))?;
    Ok(UploadForm {
        application,
        service: service.unwrap_or_default(),
        file_name,
        content,
    })
}

/// Validates and persists one uploaded schema.
fn process_upload(
    state: &ServerState,
    form: &UploadForm,
) -> Result<(Option<VersionId>, UploadResponse), ApiError> {
    let scope = Scope::parse(&form.application, &form.service)
        .map_err(|err| ApiError::bad_request("invalid_scope", err.to_string()))?;
    let (_, format) =
        validate(&form.file_name, &form.content).map_err(|err| ApiError::from_validate(&err))?;
    let version =
        state.versions.insert(&scope, format).map_err(|err| ApiError::from_store(&err))?;
    // The row stays behind if this write fails; there is no compensating
    // delete.
    state.files.put(&scope, version, format, &form.content).map_err(|_| {
        ApiError::internal(
            "file_write",
            "Error occurred while saving the file. Please contact support, if it persists",
        )
    })?;
    Ok((
        Some(version),
        UploadResponse {
            message: "Upload successful",
            version_id: version,
        },
    ))
}

/// Returns the newest schema of a scope as raw text.
fn process_latest(
    state: &ServerState,
    query: &ScopeQuery,
) -> Result<(Option<VersionId>, LatestResponse), ApiError> {
    let scope = parse_scope(&query.application, &query.service)?;
    let record = state
        .versions
        .latest(&scope)
        .map_err(|err| ApiError::from_store(&err))?
        .ok_or_else(|| ApiError::not_found("No schema found"))?;
    let bytes = read_schema_file(state, &scope, record.version, record.format)?;
    let schema = String::from_utf8(bytes)
        .map_err(|_| ApiError::internal("file_read", "stored schema is not valid utf-8"))?;
    Ok((
        Some(record.version),
        LatestResponse {
            schema,
            version: record.version,
        },
    ))
}

/// Lists all versions of a scope, newest first.
fn process_list_versions(
    state: &ServerState,
    query: &ScopeQuery,
) -> Result<(Option<VersionId>, VersionsResponse), ApiError> {
    let scope = parse_scope(&query.application, &query.service)?;
    let records = state.versions.list_all(&scope).map_err(|err| ApiError::from_store(&err))?;
    let versions = records
        .into_iter()
        .map(|record| VersionEntry {
            version: record.version,
            created_at: record.created_at,
        })
        .collect();
    Ok((
        None,
        VersionsResponse {
            versions,
        },
    ))
}

/// Returns one exact schema version as a parsed document.
fn process_get_version(
    state: &ServerState,
    query: &VersionQuery,
) -> Result<(Option<VersionId>, VersionResponse), ApiError> {
    let scope = parse_scope(&query.application, &query.service)?;
    let record = state
        .versions
        .get(&scope, VersionId::new(query.version))
        .map_err(|err| ApiError::from_store(&err))?
        .ok_or_else(|| ApiError::not_found("No schema found"))?;
    let bytes = read_schema_file(state, &scope, record.version, record.format)?;
    let schema = match record.format {
        SchemaFormat::Json => serde_json::from_slice::<Value>(&bytes)
            .map_err(|_| ApiError::internal("stored_parse", "stored schema failed to parse"))?,
        SchemaFormat::Yaml => serde_yaml::from_slice::<Value>(&bytes)
            .map_err(|_| ApiError::internal("stored_parse", "stored schema failed to parse"))?,
    };
    Ok((
        Some(record.version),
        VersionResponse {
            schema,
            version: record.version,
        },
    ))
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses client-supplied scope names.
fn parse_scope(application: &str, service: &str) -> Result<Scope, ApiError> {
    Scope::parse(application, service)
        .map_err(|err| ApiError::bad_request("invalid_scope", err.to_string()))
}

/// Reads the stored file behind a version row.
///
/// A missing file here means the row and the file store disagree; the
/// response stays a generic internal error while the audit kind is `desync`.
fn read_schema_file(
    state: &ServerState,
    scope: &Scope,
    version: VersionId,
    format: SchemaFormat,
) -> Result<Vec<u8>, ApiError> {
    state.files.get(scope, version, format).map_err(|err| match err {
        FileStoreError::Missing(_) => ApiError::internal("desync", "Schema file missing"),
        other => ApiError::internal("file_read", other.to_string()),
    })
}

/// Records the audit event and converts the outcome into a response.
fn finish<T: Serialize>(
    state: &ServerState,
    operation: Operation,
    application: String,
    service: String,
    result: Result<(Option<VersionId>, T), ApiError>,
) -> Response {
    match result {
        Ok((version, payload)) => {
            state.audit.record(&AuditEvent {
                operation,
                application,
                service,
                version: version.map(VersionId::as_i64),
                outcome: "ok",
                error_kind: None,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => {
            state.audit.record(&AuditEvent {
                operation,
                application,
                service,
                version: None,
                outcome: "error",
                error_kind: Some(error.kind),
            });
            error.into_response()
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
