// crates/schema-registry-server/src/lib.rs
// ============================================================================
// Module: Schema Registry Server Library
// Description: Public API surface for the registry HTTP server.
// Purpose: Expose configuration, the file store, audit sinks, and the server.
// Dependencies: crate::{audit, config, server, storage}
// ============================================================================

//! ## Overview
//! HTTP API layer for the schema registry. Request handlers orchestrate the
//! validator, the version store, and the file store; each request is
//! stateless and carries no cross-request coordination. All inputs arrive
//! from untrusted clients and are validated before any mutation.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod config;
pub mod server;
pub mod storage;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AuditEvent;
pub use audit::AuditSink;
pub use audit::NoopAuditSink;
pub use audit::Operation;
pub use audit::StderrAuditSink;
pub use config::ConfigError;
pub use config::RegistryConfig;
pub use server::RegistryServer;
pub use server::ServerError;
pub use server::ServerState;
pub use server::build_server_state;
pub use server::router;
pub use storage::FileStore;
pub use storage::FileStoreError;
