// crates/schema-registry-server/src/config.rs
// ============================================================================
// Module: Registry Configuration
// Description: TOML configuration model for the registry server.
// Purpose: Load, default, and validate server/store/storage settings.
// Dependencies: schema-registry-store-sqlite, serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Canonical configuration for the registry: the HTTP bind address and body
//! limit, the `SQLite` version store settings, and the file storage root.
//! Configuration files are size-capped and must be UTF-8 TOML; every load is
//! followed by a validation pass before a server is constructed from it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;

use schema_registry_store_sqlite::SqliteStoreConfig;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum accepted configuration file size in bytes.
const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Default HTTP bind address.
const DEFAULT_BIND: &str = "127.0.0.1:8000";
/// Default maximum request body size in bytes.
const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;
/// Default version store database file.
const DEFAULT_STORE_PATH: &str = "versions.db";
/// Default storage root directory.
const DEFAULT_STORAGE_ROOT: &str = "storage";
/// Default `SQLite` busy timeout in milliseconds.
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("config io error: {0}")]
    Io(String),
    /// Configuration file failed to parse.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Configuration is internally inconsistent.
    #[error("config invalid: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Config Model
// ============================================================================

/// Top-level registry configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Version store configuration.
    #[serde(default = "default_version_store")]
    pub version_store: SqliteStoreConfig,
    /// Schema file storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            version_store: default_version_store(),
            storage: StorageConfig::default(),
        }
    }
}

impl RegistryConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, parsed, or
    /// validated.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        if self.version_store.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("version_store.path is empty".to_string()));
        }
        if self.storage.root.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("storage.root is empty".to_string()));
        }
        Ok(())
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the HTTP listener.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Maximum accepted request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl ServerConfig {
    /// Validates the server section.
    fn validate(&self) -> Result<(), ConfigError> {
        self.bind
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::Invalid("server.bind is not a socket address".to_string()))?;
        if self.max_body_bytes == 0 {
            return Err(ConfigError::Invalid("server.max_body_bytes must be nonzero".to_string()));
        }
        Ok(())
    }
}

/// Schema file storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Root directory for stored schema files.
    #[serde(default = "default_storage_root")]
    pub root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_storage_root(),
        }
    }
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Returns the default bind address.
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

/// Returns the default maximum request body size.
const fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

/// Returns the default storage root.
fn default_storage_root() -> PathBuf {
    PathBuf::from(DEFAULT_STORAGE_ROOT)
}

/// Returns the default version store configuration.
fn default_version_store() -> SqliteStoreConfig {
    SqliteStoreConfig {
        path: PathBuf::from(DEFAULT_STORE_PATH),
        busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        journal_mode: schema_registry_store_sqlite::SqliteJournalMode::default(),
        sync_mode: schema_registry_store_sqlite::SqliteSyncMode::default(),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
