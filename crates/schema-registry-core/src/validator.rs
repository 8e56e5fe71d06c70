// crates/schema-registry-core/src/validator.rs
// ============================================================================
// Module: Schema Validator
// Description: Syntactic validation of uploaded schema documents.
// Purpose: Detect the declared format and parse the raw content.
// Dependencies: serde_json, serde_yaml, thiserror
// ============================================================================

//! ## Overview
//! The validator is a pure function of the uploaded filename and bytes. It
//! derives the declared format from the filename suffix, case-insensitively,
//! and parses the content with the matching parser. The parsed value is never
//! inspected further: any syntactically valid JSON or YAML document is
//! accepted, whether or not it resembles an OpenAPI document. YAML documents
//! deserialize into [`serde_json::Value`] so retrieval responses serialize
//! uniformly as JSON.
//!
//! One asymmetry is deliberate and covered by tests: empty content is a valid
//! YAML document (null) but fails strict JSON parsing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use thiserror::Error;

use crate::format::SchemaFormat;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Validation errors for uploaded schema documents.
#[derive(Debug, Error)]
pub enum ValidateError {
    /// Filename extension is not in the allowed set.
    #[error("unsupported schema format: only [yaml|json] files allowed")]
    UnsupportedFormat,
    /// Content failed to parse under the declared format.
    #[error("malformed schema content: {0}")]
    MalformedContent(String),
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Validates an uploaded schema document.
///
/// Returns the parsed document and the detected format on success.
///
/// # Errors
///
/// Returns [`ValidateError::UnsupportedFormat`] when the filename extension
/// is not `.json`, `.yaml`, or `.yml`, and [`ValidateError::MalformedContent`]
/// when parsing fails.
pub fn validate(filename: &str, content: &[u8]) -> Result<(Value, SchemaFormat), ValidateError> {
    let format = detect_format(filename)?;
    let document = match format {
        SchemaFormat::Json => serde_json::from_slice::<Value>(content)
            .map_err(|err| ValidateError::MalformedContent(err.to_string()))?,
        SchemaFormat::Yaml => serde_yaml::from_slice::<Value>(content)
            .map_err(|err| ValidateError::MalformedContent(err.to_string()))?,
    };
    Ok((document, format))
}

/// Detects the declared format from the filename suffix, case-insensitively.
///
/// # Errors
///
/// Returns [`ValidateError::UnsupportedFormat`] when no allowed extension is
/// present.
pub fn detect_format(filename: &str) -> Result<SchemaFormat, ValidateError> {
    let (stem, extension) =
        filename.rsplit_once('.').ok_or(ValidateError::UnsupportedFormat)?;
    // A dotfile like ".json" has no stem and carries no extension.
    if stem.is_empty() {
        return Err(ValidateError::UnsupportedFormat);
    }
    SchemaFormat::from_extension(&extension.to_ascii_lowercase())
        .ok_or(ValidateError::UnsupportedFormat)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
