// crates/schema-registry-server/src/storage.rs
// ============================================================================
// Module: Schema File Store
// Description: Filesystem storage for raw uploaded schema bytes.
// Purpose: Address files by scope and version under a single root.
// Dependencies: schema-registry-core, thiserror
// ============================================================================

//! ## Overview
//! Each uploaded schema is persisted verbatim as one file at
//! `<root>/{application}/{service}/{version}{extension}`. The file store owns
//! the bytes; the version store owns the metadata row. The two are linked
//! only by this naming convention, so a missing file behind an existing row
//! is the desync condition and surfaces as [`FileStoreError::Missing`].
//! Scope names are validated at construction time, which keeps every path
//! below the root.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use schema_registry_core::SchemaFormat;
use schema_registry_core::Scope;
use schema_registry_core::VersionId;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// File store errors.
#[derive(Debug, Error)]
pub enum FileStoreError {
    /// File or directory could not be written.
    #[error("file store write error: {0}")]
    Write(String),
    /// File could not be read.
    #[error("file store read error: {0}")]
    Read(String),
    /// Expected file is absent although a version row exists.
    #[error("file store missing file: {0}")]
    Missing(String),
}

// ============================================================================
// SECTION: File Store
// ============================================================================

/// Filesystem-backed schema file store.
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Root directory for all stored schema files.
    root: PathBuf,
}

impl FileStore {
    /// Opens a file store rooted at the given directory, creating it when
    /// absent.
    ///
    /// # Errors
    ///
    /// Returns [`FileStoreError::Write`] when the root cannot be created.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, FileStoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|err| FileStoreError::Write(err.to_string()))?;
        Ok(Self {
            root,
        })
    }

    /// Writes the raw schema bytes for one version, overwriting if present.
    ///
    /// Directory creation is idempotent; overwriting should not normally
    /// occur since version identifiers are unique.
    ///
    /// # Errors
    ///
    /// Returns [`FileStoreError::Write`] on any I/O failure.
    pub fn put(
        &self,
        scope: &Scope,
        version: VersionId,
        format: SchemaFormat,
        bytes: &[u8],
    ) -> Result<(), FileStoreError> {
        let path = self.file_path(scope, version, format);
        let Some(parent) = path.parent() else {
            return Err(FileStoreError::Write("schema path missing parent".to_string()));
        };
        fs::create_dir_all(parent).map_err(|err| FileStoreError::Write(err.to_string()))?;
        fs::write(&path, bytes).map_err(|err| FileStoreError::Write(err.to_string()))
    }

    /// Reads the raw schema bytes for one version.
    ///
    /// # Errors
    ///
    /// Returns [`FileStoreError::Missing`] when the file is absent and
    /// [`FileStoreError::Read`] on other I/O failures.
    pub fn get(
        &self,
        scope: &Scope,
        version: VersionId,
        format: SchemaFormat,
    ) -> Result<Vec<u8>, FileStoreError> {
        let path = self.file_path(scope, version, format);
        fs::read(&path).map_err(|err| {
            if err.kind() == ErrorKind::NotFound {
                FileStoreError::Missing(path.display().to_string())
            } else {
                FileStoreError::Read(err.to_string())
            }
        })
    }

    /// Returns the storage root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Builds the deterministic path for one stored schema file.
    fn file_path(&self, scope: &Scope, version: VersionId, format: SchemaFormat) -> PathBuf {
        let mut path = self.root.join(scope.application.as_str());
        if !scope.service.is_empty() {
            path.push(scope.service.as_str());
        }
        path.push(format!("{version}{}", format.extension()));
        path
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
