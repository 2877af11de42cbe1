//! Semantic checks on a decoded profile.
//!
//! The schema only guarantees shape. These checks enforce what the schema
//! cannot express: non-negative ids, parseable timestamps, unique ids, strictly
//! ascending order and the closed status set. Every note is checked, including
//! the first and last one, and uniqueness is computed once per document.

use std::collections::HashMap;

use chrono::DateTime;
use thiserror::Error;

use crate::domain::{Document, Note, RawDocument, RawNote, Status, TIMESTAMP_FORMAT};

/// A document invariant broken by a specific note.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("note #{note_index}: {reason}")]
pub struct InvariantError {
    /// Position of the offending note in file order.
    pub note_index: usize,
    pub reason: InvariantViolation,
}

/// Which invariant was broken.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("id is negative ({0})")]
    NegativeId(i64),

    #[error("last_touched '{value}' doesn't match time format {TIMESTAMP_FORMAT}")]
    BadTimestamp { value: String },

    #[error("id {id} already used by note #{first_index}")]
    DuplicateId { id: i64, first_index: usize },

    #[error("id is out of order ({previous} then {id})")]
    OutOfOrder { previous: i64, id: i64 },

    #[error("status '{0}' is not one of \"\", \"Started\", \"Urgent\"")]
    UnknownStatus(String),
}

impl InvariantError {
    fn at(note_index: usize, reason: InvariantViolation) -> Self {
        Self { note_index, reason }
    }
}

/// Checks every invariant and lifts the raw profile into a [`Document`].
///
/// # Errors
///
/// Returns the first [`InvariantError`] found. Duplicate ids are reported
/// before per-note problems; after that, notes are checked in file order.
pub fn validate_invariants(raw: &RawDocument) -> Result<Document, InvariantError> {
    if let Some(err) = find_duplicate_id(&raw.notes) {
        return Err(err);
    }

    let mut notes = Vec::with_capacity(raw.notes.len());
    let mut previous: Option<i64> = None;

    for (index, note) in raw.notes.iter().enumerate() {
        notes.push(check_note(index, note, previous)?);
        previous = Some(note.id);
    }

    Ok(Document::new(raw.encrypted, notes))
}

fn find_duplicate_id(notes: &[RawNote]) -> Option<InvariantError> {
    let mut seen: HashMap<i64, usize> = HashMap::with_capacity(notes.len());

    for (index, note) in notes.iter().enumerate() {
        if let Some(&first_index) = seen.get(&note.id) {
            return Some(InvariantError::at(
                index,
                InvariantViolation::DuplicateId {
                    id: note.id,
                    first_index,
                },
            ));
        }
        seen.insert(note.id, index);
    }

    None
}

fn check_note(index: usize, note: &RawNote, previous: Option<i64>) -> Result<Note, InvariantError> {
    let id = u64::try_from(note.id)
        .map_err(|_| InvariantError::at(index, InvariantViolation::NegativeId(note.id)))?;

    let last_touched = DateTime::parse_from_str(&note.last_touched, TIMESTAMP_FORMAT).map_err(|_| {
        InvariantError::at(
            index,
            InvariantViolation::BadTimestamp {
                value: note.last_touched.clone(),
            },
        )
    })?;

    if let Some(previous) = previous {
        if previous >= note.id {
            return Err(InvariantError::at(
                index,
                InvariantViolation::OutOfOrder {
                    previous,
                    id: note.id,
                },
            ));
        }
    }

    let status: Status = note.status.parse().map_err(|_| {
        InvariantError::at(index, InvariantViolation::UnknownStatus(note.status.clone()))
    })?;

    Ok(Note::new(id, &note.title, status, &note.body, last_touched))
}
