// crates/schema-registry-core/src/store.rs
// ============================================================================
// Module: Version Store Interface
// Description: Version records and the append-only version store contract.
// Purpose: Decouple the HTTP layer from the persistence backend.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! The version store records one row per uploaded schema and assigns the
//! monotonically increasing version identifier. The store is append-only:
//! rows are never updated or deleted. Backends implement [`VersionStore`];
//! the HTTP layer receives a [`SharedVersionStore`] by explicit injection
//! rather than holding global connection state.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::format::SchemaFormat;
use crate::scope::ApplicationName;
use crate::scope::Scope;
use crate::scope::ServiceName;

// ============================================================================
// SECTION: Version Identifier
// ============================================================================

/// Auto-assigned schema version identifier.
///
/// # Invariants
/// - Unique and strictly increasing across the entire store, not per scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionId(i64);

impl VersionId {
    /// Wraps a raw version identifier.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// SECTION: Version Record
// ============================================================================

/// One row in the version store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaVersionRecord {
    /// Assigned version identifier.
    pub version: VersionId,
    /// Owning application.
    pub application: ApplicationName,
    /// Service within the application, possibly empty.
    pub service: ServiceName,
    /// Declared document format recorded at upload time.
    pub format: SchemaFormat,
    /// Insertion timestamp in unix-epoch milliseconds. Immutable.
    pub created_at: i64,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Version store errors. All are fatal to the request; nothing is retried.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store I/O error.
    #[error("version store io error: {0}")]
    Io(String),
    /// Backing database error.
    #[error("version store db error: {0}")]
    Db(String),
    /// Store data is corrupted.
    #[error("version store corruption: {0}")]
    Corrupt(String),
    /// Store schema version is incompatible.
    #[error("version store version mismatch: {0}")]
    VersionMismatch(String),
    /// Store data is invalid.
    #[error("version store invalid data: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Version Store
// ============================================================================

/// Append-only store of schema version rows.
pub trait VersionStore {
    /// Appends a new row for the scope and returns the assigned version.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the insert fails.
    fn insert(&self, scope: &Scope, format: SchemaFormat) -> Result<VersionId, StoreError>;

    /// Returns the row with the maximum version for the scope, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup fails.
    fn latest(&self, scope: &Scope) -> Result<Option<SchemaVersionRecord>, StoreError>;

    /// Returns all rows for the scope, ordered by version descending.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails.
    fn list_all(&self, scope: &Scope) -> Result<Vec<SchemaVersionRecord>, StoreError>;

    /// Returns the exact row for the scope and version, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup fails.
    fn get(&self, scope: &Scope, version: VersionId)
    -> Result<Option<SchemaVersionRecord>, StoreError>;
}

// ============================================================================
// SECTION: Shared Store Wrapper
// ============================================================================

/// Shared version store backed by an `Arc` trait object.
#[derive(Clone)]
pub struct SharedVersionStore {
    /// Inner store implementation.
    inner: Arc<dyn VersionStore + Send + Sync>,
}

impl SharedVersionStore {
    /// Wraps a version store in a shared, clonable wrapper.
    #[must_use]
    pub fn from_store(store: impl VersionStore + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }
}

impl VersionStore for SharedVersionStore {
    fn insert(&self, scope: &Scope, format: SchemaFormat) -> Result<VersionId, StoreError> {
        self.inner.insert(scope, format)
    }

    fn latest(&self, scope: &Scope) -> Result<Option<SchemaVersionRecord>, StoreError> {
        self.inner.latest(scope)
    }

    fn list_all(&self, scope: &Scope) -> Result<Vec<SchemaVersionRecord>, StoreError> {
        self.inner.list_all(scope)
    }

    fn get(
        &self,
        scope: &Scope,
        version: VersionId,
    ) -> Result<Option<SchemaVersionRecord>, StoreError> {
        self.inner.get(scope, version)
    }
}
