//! Profile documents as persisted by the note tool.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Layout of the `last_touched` timestamp written by the tool.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Status of a note.
///
/// The tool serializes "no status" as the empty string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[default]
    #[serde(rename = "")]
    None,
    Started,
    Urgent,
}

impl Status {
    /// Every status the tool may write.
    pub const ALL: [Status; 3] = [Status::None, Status::Started, Status::Urgent];

    /// Returns the on-disk spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::None => "",
            Status::Started => "Started",
            Status::Urgent => "Urgent",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a known status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStatusError(String);

impl fmt::Display for ParseStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown status '{}': expected \"\", \"Started\" or \"Urgent\"",
            self.0
        )
    }
}

impl std::error::Error for ParseStatusError {}

impl FromStr for Status {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseStatusError(s.to_string()))
    }
}

/// A profile exactly as decoded from disk, before any semantic checks.
///
/// Fields keep their loose on-disk types (signed ids, free-form status and
/// timestamp strings) so that invariant violations can be reported by note
/// instead of surfacing as deserialization errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDocument {
    pub encrypted: bool,
    pub notes: Vec<RawNote>,
}

/// A note exactly as decoded from disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNote {
    pub id: i64,
    pub title: String,
    pub status: String,
    pub body: String,
    pub last_touched: String,
}

impl RawDocument {
    /// Converts an already schema-checked JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

/// A profile whose notes satisfy every document invariant.
///
/// Only produced by [`crate::domain::validate_invariants`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    encrypted: bool,
    notes: Vec<Note>,
}

impl Document {
    pub(crate) fn new(encrypted: bool, notes: Vec<Note>) -> Self {
        Self { encrypted, notes }
    }

    pub fn encrypted(&self) -> bool {
        self.encrypted
    }

    /// Notes in file order (ascending by id).
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }
}

/// A validated note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    id: u64,
    title: String,
    status: Status,
    body: String,
    last_touched: DateTime<FixedOffset>,
}

impl Note {
    pub(crate) fn new(
        id: u64,
        title: impl Into<String>,
        status: Status,
        body: impl Into<String>,
        last_touched: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            status,
            body: body.into(),
            last_touched,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn last_touched(&self) -> DateTime<FixedOffset> {
        self.last_touched
    }
}
