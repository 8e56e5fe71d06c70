// crates/schema-registry-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Version Store
// Description: Append-only schema version table backed by SQLite WAL.
// Purpose: Assign monotone version identifiers and answer scope queries.
// Dependencies: schema-registry-core, rusqlite, serde, thiserror
// ============================================================================

//! ## Overview
//! This module implements a durable [`VersionStore`] using `SQLite`. Each
//! upload inserts one row into an append-only table whose `AUTOINCREMENT`
//! primary key supplies the version identifier. The connection is opened once
//! and shared behind a mutex instead of being reopened per operation. No
//! transaction spans the row insert and the schema file write performed by
//! the caller; a single insert is the only atomic unit this store offers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::Row;
use rusqlite::params;
use schema_registry_core::ApplicationName;
use schema_registry_core::SchemaFormat;
use schema_registry_core::SchemaVersionRecord;
use schema_registry_core::Scope;
use schema_registry_core::ServiceName;
use schema_registry_core::StoreError;
use schema_registry_core::VersionId;
use schema_registry_core::VersionStore;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// `SQLite` schema version for the store.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteJournalMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteJournalMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` version store.
#[derive(Debug, Clone, Deserialize)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteJournalMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` store errors.
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Store row failed domain validation on read.
    #[error("sqlite store corruption: {0}")]
    Corrupt(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid store data or configuration.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
}

impl From<SqliteStoreError> for StoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) => Self::Io(message),
            SqliteStoreError::Db(message) => Self::Db(message),
            SqliteStoreError::Corrupt(message) => Self::Corrupt(message),
            SqliteStoreError::VersionMismatch(message) => Self::VersionMismatch(message),
            SqliteStoreError::Invalid(message) => Self::Invalid(message),
        }
    }
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite`-backed version store with WAL support.
#[derive(Clone)]
pub struct SqliteVersionStore {
    /// Shared `SQLite` connection guarded by a mutex.
    connection: Arc<Mutex<Connection>>,
}

impl SqliteVersionStore {
    /// Opens an `SQLite`-backed version store.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened or
    /// initialized.
    pub fn new(config: &SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(config)?;
        initialize_schema(&mut connection)?;
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Appends a row and returns the assigned version identifier.
    fn insert_row(
        &self,
        scope: &Scope,
        format: SchemaFormat,
    ) -> Result<VersionId, SqliteStoreError> {
        let created_at = unix_millis();
        let guard = self
            .connection
            .lock()
            .map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))?;
        guard
            .execute(
                "INSERT INTO schemas (application, service, extension, created_at) VALUES (?1, \
                 ?2, ?3, ?4)",
                params![
                    scope.application.as_str(),
                    scope.service.as_str(),
                    format.extension(),
                    created_at
                ],
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        Ok(VersionId::new(guard.last_insert_rowid()))
    }

    /// Returns the newest row for the scope, if any.
    fn latest_row(&self, scope: &Scope) -> Result<Option<SchemaVersionRecord>, SqliteStoreError> {
        let guard = self
            .connection
            .lock()
            .map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))?;
        guard
            .query_row(
                "SELECT version, application, service, extension, created_at FROM schemas WHERE \
                 application = ?1 AND service = ?2 ORDER BY version DESC LIMIT 1",
                params![scope.application.as_str(), scope.service.as_str()],
                record_from_row,
            )
            .optional()
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?
            .map(|record| record.map_err(SqliteStoreError::Corrupt))
            .transpose()
    }

    /// Returns all rows for the scope, newest first.
    fn list_rows(&self, scope: &Scope) -> Result<Vec<SchemaVersionRecord>, SqliteStoreError> {
        let guard = self
            .connection
            .lock()
            .map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))?;
        let mut statement = guard
            .prepare(
                "SELECT version, application, service, extension, created_at FROM schemas WHERE \
                 application = ?1 AND service = ?2 ORDER BY version DESC",
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        let rows = statement
            .query_map(
                params![scope.application.as_str(), scope.service.as_str()],
                record_from_row,
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        let mut records = Vec::new();
        for row in rows {
            let record = row.map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            records.push(record.map_err(SqliteStoreError::Corrupt)?);
        }
        Ok(records)
    }

    /// Returns the exact row for the scope and version, if any.
    fn get_row(
        &self,
        scope: &Scope,
        version: VersionId,
    ) -> Result<Option<SchemaVersionRecord>, SqliteStoreError> {
        let guard = self
            .connection
            .lock()
            .map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))?;
        guard
            .query_row(
                "SELECT version, application, service, extension, created_at FROM schemas WHERE \
                 application = ?1 AND service = ?2 AND version = ?3",
                params![scope.application.as_str(), scope.service.as_str(), version.as_i64()],
                record_from_row,
            )
            .optional()
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?
            .map(|record| record.map_err(SqliteStoreError::Corrupt))
            .transpose()
    }
}

impl VersionStore for SqliteVersionStore {
    fn insert(&self, scope: &Scope, format: SchemaFormat) -> Result<VersionId, StoreError> {
        self.insert_row(scope, format).map_err(StoreError::from)
    }

    fn latest(&self, scope: &Scope) -> Result<Option<SchemaVersionRecord>, StoreError> {
        self.latest_row(scope).map_err(StoreError::from)
    }

    fn list_all(&self, scope: &Scope) -> Result<Vec<SchemaVersionRecord>, StoreError> {
        self.list_rows(scope).map_err(StoreError::from)
    }

    fn get(
        &self,
        scope: &Scope,
        version: VersionId,
    ) -> Result<Option<SchemaVersionRecord>, StoreError> {
        self.get_row(scope, version).map_err(StoreError::from)
    }
}

// ============================================================================
// SECTION: Row Mapping
// ============================================================================

/// Maps one `schemas` row into a version record.
///
/// Domain validation failures are reported as an inner `Err` so they surface
/// as corruption rather than a driver error.
fn record_from_row(row: &Row<'_>) -> rusqlite::Result<Result<SchemaVersionRecord, String>> {
    let version: i64 = row.get(0)?;
    let application: String = row.get(1)?;
    let service: String = row.get(2)?;
    let extension: String = row.get(3)?;
    let created_at: i64 = row.get(4)?;
    Ok(build_record(version, &application, &service, &extension, created_at))
}

/// Builds a validated version record from raw column values.
fn build_record(
    version: i64,
    application: &str,
    service: &str,
    extension: &str,
    created_at: i64,
) -> Result<SchemaVersionRecord, String> {
    if version < 1 {
        return Err(format!("invalid version id {version}"));
    }
    let application = ApplicationName::new(application)
        .map_err(|err| format!("invalid application column: {err}"))?;
    let service =
        ServiceName::new(service).map_err(|err| format!("invalid service column: {err}"))?;
    let format = SchemaFormat::from_stored_extension(extension)
        .ok_or_else(|| format!("unknown extension column: {extension}"))?;
    Ok(SchemaVersionRecord {
        version: VersionId::new(version),
        application,
        service,
        format,
        created_at,
    })
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    // A bare relative filename has an empty parent; nothing to create.
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    let path_string = path.display().to_string();
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteStoreError::Invalid(
                "store path contains an overlong component".to_string(),
            ));
        }
    }
    if path.exists() && path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection with durable defaults.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags)
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies `SQLite` pragmas required for durability.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteStoreConfig,
) -> Result<(), SqliteStoreError> {
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .busy_timeout(std::time::Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

/// Initializes the `SQLite` schema or validates the existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection.transaction().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS schemas (
                    version INTEGER PRIMARY KEY AUTOINCREMENT,
                    application TEXT NOT NULL,
                    service TEXT NOT NULL,
                    extension TEXT NOT NULL,
                    created_at INTEGER NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_schemas_scope
                    ON schemas (application, service);",
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        }
        Some(value) if value == SCHEMA_VERSION => {}
        Some(value) => {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "unsupported schema version: {value}"
            )));
        }
    }
    tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

/// Returns the current unix epoch in milliseconds.
fn unix_millis() -> i64 {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    i64::try_from(now.as_millis()).unwrap_or(i64::MAX)
}
