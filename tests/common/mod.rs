//! Test fixture utilities for integration tests.

pub mod harness;

use std::path::PathBuf;

/// Returns the path to the fixtures directory.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Returns the path to a fixture file by name.
pub fn fixture(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

/// Passphrase the encrypted fixture was written with.
#[allow(dead_code)]
pub const FIXTURE_PASSPHRASE: &str = "DEBUG";
