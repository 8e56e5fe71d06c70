// crates/schema-registry-core/src/format.rs
// ============================================================================
// Module: Schema Format
// Description: Declared format marker for uploaded schema documents.
// Purpose: Map filename extensions to parse/serialize behavior.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Uploaded schemas declare their format through the filename extension.
//! `.json` selects strict JSON parsing; `.yaml` and `.yml` select YAML.
//! The format is recorded with the version row and reconstructs the storage
//! file name on retrieval, so `.yml` uploads are canonicalized to `.yaml`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Schema Format
// ============================================================================

/// Declared format of an uploaded schema document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaFormat {
    /// JSON document, strict parsing.
    Json,
    /// YAML document. Accepts the empty document.
    Yaml,
}

impl SchemaFormat {
    /// Maps a lowercased filename extension (without dot) to a format.
    #[must_use]
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    /// Parses a stored canonical extension, including the leading dot.
    #[must_use]
    pub fn from_stored_extension(extension: &str) -> Option<Self> {
        match extension {
            ".json" => Some(Self::Json),
            ".yaml" => Some(Self::Yaml),
            _ => None,
        }
    }

    /// Returns the canonical extension, including the leading dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => ".json",
            Self::Yaml => ".yaml",
        }
    }
}

impl fmt::Display for SchemaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
