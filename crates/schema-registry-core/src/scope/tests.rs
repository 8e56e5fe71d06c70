// crates/schema-registry-core/src/scope/tests.rs
// ============================================================================
// Module: Scope Unit Tests
// Description: Unit tests for scope name validation.
// Purpose: Ensure unsafe names never become storage path components.
// Dependencies: schema-registry-core
// ============================================================================

//! ## Overview
//! Exercises scope name validation against traversal attempts, separator
//! injection, and length limits.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    missing_docs,
    reason = "Test-only panic-based assertions are permitted."
)]

use super::ApplicationName;
use super::Scope;
use super::ScopeError;
use super::ServiceName;

#[test]
fn accepts_typical_names() {
    let scope = Scope::parse("billing-app", "auth_v2").expect("scope");
    assert_eq!(scope.application.as_str(), "billing-app");
    assert_eq!(scope.service.as_str(), "auth_v2");
}

#[test]
fn allows_empty_service() {
    let scope = Scope::parse("app", "").expect("scope");
    assert!(scope.service.is_empty());
    assert_eq!(scope.service, ServiceName::empty());
}

#[test]
fn rejects_empty_application() {
    assert_eq!(ApplicationName::new("").unwrap_err(), ScopeError::EmptyApplication);
}

#[test]
fn rejects_path_separators() {
    assert_eq!(ApplicationName::new("a/b").unwrap_err(), ScopeError::InvalidCharacter);
    assert_eq!(ApplicationName::new("a\\b").unwrap_err(), ScopeError::InvalidCharacter);
    assert_eq!(ServiceName::new("svc/../../etc").unwrap_err(), ScopeError::InvalidCharacter);
}

#[test]
fn rejects_dot_components() {
    assert_eq!(ApplicationName::new(".").unwrap_err(), ScopeError::DotComponent);
    assert_eq!(ApplicationName::new("..").unwrap_err(), ScopeError::DotComponent);
    assert_eq!(ServiceName::new("..").unwrap_err(), ScopeError::DotComponent);
}

#[test]
fn rejects_overlong_names() {
    let name = "x".repeat(256);
    assert_eq!(ApplicationName::new(name).unwrap_err(), ScopeError::TooLong);
}

#[test]
fn dotted_names_are_allowed() {
    // A dot inside a name is fine; only bare dot components are rejected.
    let app = ApplicationName::new("org.example.app").expect("app");
    assert_eq!(app.as_str(), "org.example.app");
}
