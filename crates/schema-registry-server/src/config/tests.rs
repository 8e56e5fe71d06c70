// crates/schema-registry-server/src/config/tests.rs
// ============================================================================
// Module: Configuration Unit Tests
// Description: Unit tests for defaults, loading, and validation.
// Purpose: Keep the configuration surface stable.
// Dependencies: schema-registry-server
// ============================================================================

//! ## Overview
//! Exercises TOML loading, serde defaults, and the validation pass.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    missing_docs,
    reason = "Test-only panic-based assertions are permitted."
)]

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use super::ConfigError;
use super::RegistryConfig;

fn write_config(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("registry.toml");
    fs::write(&path, content).expect("write config");
    path
}

#[test]
fn defaults_are_valid() {
    let config = RegistryConfig::default();
    config.validate().expect("defaults validate");
    assert_eq!(config.server.bind, "127.0.0.1:8000");
    assert_eq!(config.storage.root, PathBuf::from("storage"));
    assert_eq!(config.version_store.path, PathBuf::from("versions.db"));
}

#[test]
fn empty_file_loads_defaults() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_config(&dir, "");
    let config = RegistryConfig::load(&path).expect("load");
    assert_eq!(config.server.max_body_bytes, 10 * 1024 * 1024);
}

#[test]
fn sections_override_defaults() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_config(
        &dir,
        r#"
[server]
bind = "0.0.0.0:9000"
max_body_bytes = 1024

[version_store]
path = "data/versions.db"
journal_mode = "delete"
sync_mode = "normal"

[storage]
root = "data/storage"
"#,
    );
    let config = RegistryConfig::load(&path).expect("load");
    assert_eq!(config.server.bind, "0.0.0.0:9000");
    assert_eq!(config.server.max_body_bytes, 1024);
    assert_eq!(config.version_store.path, PathBuf::from("data/versions.db"));
    assert_eq!(config.storage.root, PathBuf::from("data/storage"));
}

#[test]
fn rejects_invalid_bind() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_config(&dir, "[server]\nbind = \"not-an-address\"\n");
    assert!(matches!(RegistryConfig::load(&path).unwrap_err(), ConfigError::Invalid(_)));
}

#[test]
fn rejects_zero_body_limit() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_config(&dir, "[server]\nmax_body_bytes = 0\n");
    assert!(matches!(RegistryConfig::load(&path).unwrap_err(), ConfigError::Invalid(_)));
}

#[test]
fn rejects_malformed_toml() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_config(&dir, "[server\nbind = ");
    assert!(matches!(RegistryConfig::load(&path).unwrap_err(), ConfigError::Parse(_)));
}

#[test]
fn missing_file_is_io_error() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("absent.toml");
    assert!(matches!(RegistryConfig::load(&path).unwrap_err(), ConfigError::Io(_)));
}
