// crates/schema-registry-core/src/validator/tests.rs
// ============================================================================
// Module: Validator Unit Tests
// Description: Unit tests for syntactic schema validation.
// Purpose: Cover format detection, parse failures, and the empty-document
//          JSON/YAML asymmetry.
// Dependencies: schema-registry-core
// ============================================================================

//! ## Overview
//! Exercises the validator against valid and malformed JSON/YAML payloads and
//! unsupported extensions.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    missing_docs,
    reason = "Test-only panic-based assertions are permitted."
)]

use serde_json::Value;
use serde_json::json;

use super::ValidateError;
use super::detect_format;
use super::validate;
use crate::format::SchemaFormat;

#[test]
fn parses_valid_json() {
    let content = br#"{"openapi": "3.1.0", "paths": {}}"#;
    let (document, format) = validate("openapi.json", content).expect("valid json");
    assert_eq!(format, SchemaFormat::Json);
    assert_eq!(document, json!({"openapi": "3.1.0", "paths": {}}));
}

#[test]
fn parses_valid_yaml() {
    let content = b"openapi: 3.1.0\npaths:\n  /health:\n    get: {}\n";
    let (document, format) = validate("openapi.yaml", content).expect("valid yaml");
    assert_eq!(format, SchemaFormat::Yaml);
    assert_eq!(document, json!({"openapi": "3.1.0", "paths": {"/health": {"get": {}}}}));
}

#[test]
fn yml_extension_maps_to_yaml() {
    let (_, format) = validate("spec.yml", b"a: 1\n").expect("valid yml");
    assert_eq!(format, SchemaFormat::Yaml);
    assert_eq!(format.extension(), ".yaml");
}

#[test]
fn extension_detection_is_case_insensitive() {
    assert_eq!(detect_format("SPEC.JSON").expect("json"), SchemaFormat::Json);
    assert_eq!(detect_format("Spec.YaMl").expect("yaml"), SchemaFormat::Yaml);
}

#[test]
fn rejects_unsupported_extension() {
    let err = validate("schema.txt", b"{}").unwrap_err();
    assert!(matches!(err, ValidateError::UnsupportedFormat));
    assert!(err.to_string().contains("[yaml|json]"));
}

#[test]
fn rejects_missing_extension() {
    assert!(matches!(validate("schema", b"{}").unwrap_err(), ValidateError::UnsupportedFormat));
}

#[test]
fn rejects_dotfile_names() {
    // ".json" is an extensionless dotfile, not a JSON filename.
    assert!(matches!(detect_format(".json").unwrap_err(), ValidateError::UnsupportedFormat));
    assert!(matches!(detect_format(".yaml").unwrap_err(), ValidateError::UnsupportedFormat));
    assert!(matches!(validate(".json", b"{}").unwrap_err(), ValidateError::UnsupportedFormat));
}

#[test]
fn rejects_malformed_json() {
    let err = validate("bad.json", b"{ invalid json }").unwrap_err();
    assert!(matches!(err, ValidateError::MalformedContent(_)));
    assert!(err.to_string().contains("malformed"));
}

#[test]
fn rejects_malformed_yaml() {
    let err = validate("bad.yaml", b"key: [unbalanced\n  nested: {").unwrap_err();
    assert!(matches!(err, ValidateError::MalformedContent(_)));
}

#[test]
fn empty_content_asymmetry() {
    // Empty input is the YAML null document but is not valid strict JSON.
    let (document, _) = validate("empty.yaml", b"").expect("empty yaml parses");
    assert_eq!(document, Value::Null);
    assert!(matches!(
        validate("empty.json", b"").unwrap_err(),
        ValidateError::MalformedContent(_)
    ));
}

#[test]
fn parsed_value_is_not_inspected() {
    // A scalar is a syntactically valid document even though it is not an
    // OpenAPI schema.
    let (document, _) = validate("scalar.json", b"42").expect("scalar json");
    assert_eq!(document, json!(42));
}
