//! Decode → schema → invariants, shared by the orchestrator and `check`.

use std::path::Path;

use serde_json::Value;

use crate::domain::{Document, RawDocument, validate_invariants};
use crate::harness::outcome::FailureKind;
use crate::infra::{ProfileCodec, ProfileReadError, SchemaError, SchemaValidator, read_profile};

/// Reads the profile at `path`, decrypting it when a passphrase is given.
pub fn load_result(
    path: &Path,
    passphrase: Option<&str>,
    codec: &ProfileCodec,
) -> Result<Value, FailureKind> {
    read_profile(path, passphrase, codec).map_err(|e| match e {
        ProfileReadError::Missing { path } => FailureKind::MissingResult { path },
        ProfileReadError::Io { path, source } => FailureKind::Io { path, source },
        ProfileReadError::Decode(e) => FailureKind::Decode(e),
    })
}

/// Runs the schema check, then the invariant checks.
pub fn validate_document(schema: &SchemaValidator, value: Value) -> Result<Document, FailureKind> {
    schema.validate(&value)?;
    let raw = RawDocument::from_value(value).map_err(SchemaError::Shape)?;
    Ok(validate_invariants(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> SchemaValidator {
        SchemaValidator::embedded().unwrap()
    }

    #[test]
    fn valid_profile_becomes_document() {
        let doc = validate_document(
            &schema(),
            json!({
                "encrypted": false,
                "notes": [{
                    "id": 1, "title": "X", "status": "", "body": "",
                    "last_touched": "2015-01-22 23:15:04 -0800"
                }]
            }),
        )
        .unwrap();
        assert_eq!(doc.notes()[0].title(), "X");
    }

    #[test]
    fn schema_runs_before_invariants() {
        let err = validate_document(&schema(), json!({ "encrypted": false, "notes": [{ "id": -1 }] }))
            .unwrap_err();
        assert!(matches!(err, FailureKind::Schema(_)));
    }

    #[test]
    fn invariant_violation_is_reported() {
        let note = |id: i64| {
            json!({
                "id": id, "title": "t", "status": "", "body": "",
                "last_touched": "2015-01-22 23:15:04 -0800"
            })
        };
        let err = validate_document(
            &schema(),
            json!({ "encrypted": false, "notes": [note(2), note(1)] }),
        )
        .unwrap_err();
        assert!(matches!(err, FailureKind::Invariant(_)));
    }

    #[test]
    fn missing_result_maps_to_its_own_kind() {
        let err = load_result(
            Path::new("/nonexistent/default.json"),
            None,
            &ProfileCodec::fixture(),
        )
        .unwrap_err();
        assert!(matches!(err, FailureKind::MissingResult { .. }));
    }
}
