// crates/schema-registry-core/src/lib.rs
// ============================================================================
// Module: Schema Registry Core Library
// Description: Public API surface for the schema registry core.
// Purpose: Expose scope types, formats, validation, and store interfaces.
// Dependencies: crate::{format, scope, store, validator}
// ============================================================================

//! ## Overview
//! Core domain types for the schema registry: validated scope names, schema
//! formats, syntactic validation of uploaded documents, and the version store
//! interface. This crate performs no I/O; persistence backends implement
//! [`VersionStore`] and the HTTP layer orchestrates them.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod format;
pub mod scope;
pub mod store;
pub mod validator;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use format::SchemaFormat;
pub use scope::ApplicationName;
pub use scope::Scope;
pub use scope::ScopeError;
pub use scope::ServiceName;
pub use store::SchemaVersionRecord;
pub use store::SharedVersionStore;
pub use store::StoreError;
pub use store::VersionId;
pub use store::VersionStore;
pub use validator::ValidateError;
pub use validator::validate;
