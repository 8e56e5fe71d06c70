// crates/schema-registry-server/tests/api.rs
// ============================================================================
// Module: Registry API Tests
// Description: End-to-end HTTP tests against an in-process server.
// Purpose: Validate the wire contract of the four API operations.
// Dependencies: schema-registry-server, axum, reqwest, tokio
// ============================================================================

//! ## Overview
//! Boots the full router on an ephemeral port and drives it with a real HTTP
//! client: multipart uploads, raw latest fetches, version listings, and
//! parsed exact-version fetches, plus the client-error paths.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    missing_docs,
    reason = "Test-only panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::SocketAddr;

use reqwest::multipart::Form;
use reqwest::multipart::Part;
use schema_registry_server::build_server_state;
use schema_registry_server::config::RegistryConfig;
use schema_registry_server::config::ServerConfig;
use schema_registry_server::config::StorageConfig;
use schema_registry_server::router;
use schema_registry_store_sqlite::SqliteJournalMode;
use schema_registry_store_sqlite::SqliteStoreConfig;
use schema_registry_store_sqlite::SqliteSyncMode;
use serde_json::Value;
use serde_json::json;
use tempfile::TempDir;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Boots the registry on an ephemeral loopback port.
async fn spawn_registry() -> (SocketAddr, TempDir) {
    let dir = TempDir::new().expect("tempdir");
    let config = RegistryConfig {
        server: ServerConfig::default(),
        version_store: SqliteStoreConfig {
            path: dir.path().join("versions.db"),
            busy_timeout_ms: 5_000,
            journal_mode: SqliteJournalMode::Wal,
            sync_mode: SqliteSyncMode::Full,
        },
        storage: StorageConfig {
            root: dir.path().join("storage"),
        },
    };
    let state = build_server_state(&config).expect("state");
    let app = router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (addr, dir)
}

/// Uploads one schema file and returns the response.
async fn upload(
    client: &reqwest::Client,
    addr: SocketAddr,
    application: &str,
    service: &str,
    file_name: &str,
    content: &[u8],
) -> reqwest::Response {
    let form = Form::new()
        .text("application", application.to_string())
        .text("service", service.to_string())
        .part("file", Part::bytes(content.to_vec()).file_name(file_name.to_string()));
    client
        .post(format!("http://{addr}/api/upload"))
        .multipart(form)
        .send()
        .await
        .expect("upload request")
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[tokio::test]
async fn upload_then_fetch_flow() {
    let (addr, _dir) = spawn_registry().await;
    let client = reqwest::Client::new();
    let content = br#"{"openapi": "3.1.0", "paths": {}}"#;

    let response = upload(&client, addr, "billing", "auth", "openapi.json", content).await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("upload body");
    assert_eq!(body["message"], "Upload successful");
    let version = body["version_id"].as_i64().expect("version id");
    assert!(version >= 1);

    let latest: Value = client
        .get(format!("http://{addr}/api/latest"))
        .query(&[("application", "billing"), ("service", "auth")])
        .send()
        .await
        .expect("latest request")
        .json()
        .await
        .expect("latest body");
    assert_eq!(latest["version"].as_i64(), Some(version));
    assert_eq!(latest["schema"].as_str(), Some(std::str::from_utf8(content).expect("utf8")));

    let versions: Value = client
        .get(format!("http://{addr}/api/get-versions"))
        .query(&[("application", "billing"), ("service", "auth")])
        .send()
        .await
        .expect("versions request")
        .json()
        .await
        .expect("versions body");
    let entries = versions["versions"].as_array().expect("entries");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["version"].as_i64(), Some(version));
    assert!(entries[0]["created_at"].as_i64().expect("created_at") > 0);

    let fetched: Value = client
        .get(format!("http://{addr}/api/get-version"))
        .query(&[
            ("application", "billing".to_string()),
            ("service", "auth".to_string()),
            ("version", version.to_string()),
        ])
        .send()
        .await
        .expect("get-version request")
        .json()
        .await
        .expect("get-version body");
    assert_eq!(fetched["schema"], json!({"openapi": "3.1.0", "paths": {}}));
    assert_eq!(fetched["version"].as_i64(), Some(version));
}

#[tokio::test]
async fn yaml_upload_returns_parsed_structure() {
    let (addr, _dir) = spawn_registry().await;
    let client = reqwest::Client::new();
    let content = b"openapi: 3.1.0\npaths:\n  /health:\n    get: {}\n";

    let response = upload(&client, addr, "app", "", "spec.yaml", content).await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("upload body");
    let version = body["version_id"].as_i64().expect("version id");

    let fetched: Value = client
        .get(format!("http://{addr}/api/get-version"))
        .query(&[
            ("application", "app".to_string()),
            ("service", String::new()),
            ("version", version.to_string()),
        ])
        .send()
        .await
        .expect("get-version request")
        .json()
        .await
        .expect("get-version body");
    assert_eq!(fetched["schema"], json!({"openapi": "3.1.0", "paths": {"/health": {"get": {}}}}));
}

#[tokio::test]
async fn unsupported_extension_is_client_error() {
    let (addr, _dir) = spawn_registry().await;
    let client = reqwest::Client::new();
    let response = upload(&client, addr, "app", "", "schema.txt", b"{}").await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("error body");
    assert!(body["detail"].as_str().expect("detail").contains("[yaml|json]"));
}

#[tokio::test]
async fn malformed_json_is_client_error() {
    let (addr, _dir) = spawn_registry().await;
    let client = reqwest::Client::new();
    let response = upload(&client, addr, "app", "", "bad.json", b"{ invalid json }").await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("error body");
    assert!(body["detail"].as_str().expect("detail").contains("malformed"));
}

#[tokio::test]
async fn latest_on_unknown_scope_is_not_found() {
    let (addr, _dir) = spawn_registry().await;
    let client = reqwest::Client::new();
    let response = client
        .get(format!("http://{addr}/api/latest"))
        .query(&[("application", "ghost"), ("service", "")])
        .send()
        .await
        .expect("latest request");
    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.expect("error body");
    assert_eq!(body["detail"], "No schema found");
}

#[tokio::test]
async fn list_versions_on_unknown_scope_is_empty_ok() {
    let (addr, _dir) = spawn_registry().await;
    let client = reqwest::Client::new();
    let response = client
        .get(format!("http://{addr}/api/get-versions"))
        .query(&[("application", "ghost"), ("service", "")])
        .send()
        .await
        .expect("versions request");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("body");
    assert_eq!(body["versions"], json!([]));
}

#[tokio::test]
async fn get_version_for_absent_id_is_not_found() {
    let (addr, _dir) = spawn_registry().await;
    let client = reqwest::Client::new();
    let response = client
        .get(format!("http://{addr}/api/get-version"))
        .query(&[
            ("application", "app".to_string()),
            ("service", String::new()),
            ("version", "42".to_string()),
        ])
        .send()
        .await
        .expect("get-version request");
    assert_eq!(response.status(), 404);
}
