// crates/schema-registry-store-sqlite/src/lib.rs
// ============================================================================
// Module: SQLite Version Store Library
// Description: Public API surface for the SQLite-backed version store.
// Purpose: Expose the store type, its configuration, and error types.
// Dependencies: crate::store
// ============================================================================

//! ## Overview
//! Durable [`schema_registry_core::VersionStore`] implementation backed by
//! `SQLite`. Version identifiers come from an `AUTOINCREMENT` primary key, so
//! they are unique and strictly increasing across the whole store.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::SqliteJournalMode;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteSyncMode;
pub use store::SqliteVersionStore;
