//! Structural validation of profiles against a JSON Schema.

use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

/// Schema shipped with the crate.
pub const EMBEDDED_SCHEMA: &str = include_str!("../../fixtures/profile.schema.json");

/// Errors while loading the schema document. These are fatal to a run.
#[derive(Debug, Error)]
pub enum SchemaLoadError {
    #[error("failed to read schema {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("schema is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid JSON schema: {message}")]
    InvalidSchema { message: String },
}

/// A profile that does not have the expected shape.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("schema violation: {message}")]
    Violation { message: String },

    #[error("profile does not match the document model: {0}")]
    Shape(#[from] serde_json::Error),
}

/// Compiled profile schema.
#[derive(Debug)]
pub struct SchemaValidator {
    validator: jsonschema::Validator,
}

impl SchemaValidator {
    /// Compiles a schema document.
    pub fn new(schema: &Value) -> Result<Self, SchemaLoadError> {
        let validator =
            jsonschema::validator_for(schema).map_err(|e| SchemaLoadError::InvalidSchema {
                message: e.to_string(),
            })?;
        Ok(Self { validator })
    }

    /// Parses and compiles schema text.
    pub fn from_json(text: &str) -> Result<Self, SchemaLoadError> {
        let schema: Value = serde_json::from_str(text)?;
        Self::new(&schema)
    }

    /// Reads and compiles a schema file.
    pub fn load(path: &Path) -> Result<Self, SchemaLoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| SchemaLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// The schema shipped with the crate.
    pub fn embedded() -> Result<Self, SchemaLoadError> {
        Self::from_json(EMBEDDED_SCHEMA)
    }

    /// Checks `value` against the schema, reporting the first violation.
    pub fn validate(&self, value: &Value) -> Result<(), SchemaError> {
        match self.validator.iter_errors(value).next() {
            Some(error) => Err(SchemaError::Violation {
                message: error.to_string(),
            }),
            None => Ok(()),
        }
    }
}
