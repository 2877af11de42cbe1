//! Core types: Document, Note, Status, Snapshot, test fixtures

mod compare;
mod document;
mod fixture;
mod invariants;

pub use compare::{ComparisonError, ExpectedNote, Field, Snapshot, compare};
pub use document::{Document, Note, ParseStatusError, RawDocument, RawNote, Status, TIMESTAMP_FORMAT};
pub use fixture::{
    EMBEDDED_SUITES, FixtureError, Step, Suite, TestCase, embedded_suites, filter_suites,
    load_suites, parse_suites,
};
pub use invariants::{InvariantError, InvariantViolation, validate_invariants};
