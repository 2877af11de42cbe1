//! Expected-versus-actual comparison of profiles.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Document, Status};

/// The comparable projection of a profile.
///
/// `last_touched` is deliberately absent: it is stamped at write time and
/// never matches across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Snapshot {
    pub encrypted: bool,
    #[serde(default)]
    pub notes: Vec<ExpectedNote>,
}

/// One note of a [`Snapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpectedNote {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub body: String,
}

impl From<&Document> for Snapshot {
    fn from(doc: &Document) -> Self {
        Self {
            encrypted: doc.encrypted(),
            notes: doc
                .notes()
                .iter()
                .map(|n| ExpectedNote {
                    id: n.id(),
                    title: n.title().to_string(),
                    status: n.status(),
                    body: n.body().to_string(),
                })
                .collect(),
        }
    }
}

/// The field that differed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Encrypted,
    NoteCount,
    Id,
    Title,
    Status,
    Body,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Encrypted => "encrypted",
            Field::NoteCount => "note count",
            Field::Id => "id",
            Field::Title => "title",
            Field::Status => "status",
            Field::Body => "body",
        };
        f.write_str(name)
    }
}

/// A mismatch between the expected snapshot and the actual profile.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", describe(.field, .note_index, .expected, .actual))]
pub struct ComparisonError {
    pub field: Field,
    /// `None` for document-level fields.
    pub note_index: Option<usize>,
    pub expected: String,
    pub actual: String,
}

fn describe(field: &Field, note_index: &Option<usize>, expected: &str, actual: &str) -> String {
    match note_index {
        Some(index) => format!("note #{index} {field}: expected {expected:?}, got {actual:?}"),
        None => format!("{field}: expected {expected}, got {actual}"),
    }
}

impl ComparisonError {
    fn new(field: Field, note_index: Option<usize>, expected: impl ToString, actual: impl ToString) -> Self {
        Self {
            field,
            note_index,
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

/// Compares a profile against its expected snapshot.
///
/// Notes are matched by position, not by id.
///
/// # Errors
///
/// Returns the first differing field.
pub fn compare(expected: &Snapshot, actual: &Document) -> Result<(), ComparisonError> {
    if expected.encrypted != actual.encrypted() {
        return Err(ComparisonError::new(
            Field::Encrypted,
            None,
            expected.encrypted,
            actual.encrypted(),
        ));
    }

    if expected.notes.len() != actual.notes().len() {
        return Err(ComparisonError::new(
            Field::NoteCount,
            None,
            expected.notes.len(),
            actual.notes().len(),
        ));
    }

    for (index, (want, got)) in expected.notes.iter().zip(actual.notes()).enumerate() {
        if want.id != got.id() {
            return Err(ComparisonError::new(Field::Id, Some(index), want.id, got.id()));
        }
        if want.title != got.title() {
            return Err(ComparisonError::new(Field::Title, Some(index), &want.title, got.title()));
        }
        if want.status != got.status() {
            return Err(ComparisonError::new(Field::Status, Some(index), want.status, got.status()));
        }
        if want.body != got.body() {
            return Err(ComparisonError::new(Field::Body, Some(index), &want.body, got.body()));
        }
    }

    Ok(())
}
