// crates/schema-registry-core/src/scope.rs
// ============================================================================
// Module: Versioning Scope
// Description: Validated application and service names forming a scope.
// Purpose: Keep scope names safe for use as storage path components.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Versions are partitioned by the `(application, service)` pair, called the
//! scope. Both names end up as filesystem path components under the storage
//! root, so they are validated on construction: bounded length, a restricted
//! character set, and no path separators or dot components. Scope names arrive
//! from untrusted clients and must never escape the storage root.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum length of a single scope name in bytes.
const MAX_NAME_LENGTH: usize = 255;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Scope name validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScopeError {
    /// Application name is empty.
    #[error("application name must not be empty")]
    EmptyApplication,
    /// Name exceeds the length limit.
    #[error("scope name exceeds {MAX_NAME_LENGTH} bytes")]
    TooLong,
    /// Name contains a character outside the allowed set.
    #[error("scope name may only contain [A-Za-z0-9._-]")]
    InvalidCharacter,
    /// Name is a dot component and would not address a directory.
    #[error("scope name must not be '.' or '..'")]
    DotComponent,
}

// ============================================================================
// SECTION: Scope Names
// ============================================================================

/// Validated application name owning a schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationName(String);

impl ApplicationName {
    /// Creates a validated application name.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError`] when the name is empty or unsafe as a path
    /// component.
    pub fn new(name: impl Into<String>) -> Result<Self, ScopeError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ScopeError::EmptyApplication);
        }
        validate_component(&name)?;
        Ok(Self(name))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApplicationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Validated service name within an application. May be empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceName(String);

impl ServiceName {
    /// Creates a validated service name. The empty name is permitted and
    /// scopes the schema to the application alone.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError`] when the name is unsafe as a path component.
    pub fn new(name: impl Into<String>) -> Result<Self, ScopeError> {
        let name = name.into();
        if !name.is_empty() {
            validate_component(&name)?;
        }
        Ok(Self(name))
    }

    /// Returns the empty service name.
    #[must_use]
    pub const fn empty() -> Self {
        Self(String::new())
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true when no service name was provided.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// SECTION: Scope
// ============================================================================

/// The `(application, service)` pair that versions are partitioned by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    /// Owning application.
    pub application: ApplicationName,
    /// Service within the application, possibly empty.
    pub service: ServiceName,
}

impl Scope {
    /// Builds a scope from raw client-supplied names.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError`] when either name fails validation.
    pub fn parse(application: &str, service: &str) -> Result<Self, ScopeError> {
        Ok(Self {
            application: ApplicationName::new(application)?,
            service: ServiceName::new(service)?,
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validates one scope name as a single safe path component.
fn validate_component(name: &str) -> Result<(), ScopeError> {
    if name.len() > MAX_NAME_LENGTH {
        return Err(ScopeError::TooLong);
    }
    if name == "." || name == ".." {
        return Err(ScopeError::DotComponent);
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')) {
        return Err(ScopeError::InvalidCharacter);
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
