//! Command handlers for the CLI.

mod check;
mod completions;
mod decrypt;
mod list;
mod run;

use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;
use tracing::debug;

use crate::domain::{Suite, embedded_suites, filter_suites, load_suites};
use crate::infra::SchemaValidator;

// Re-export public items
pub use check::handle_check;
pub use completions::handle_completions;
pub use decrypt::handle_decrypt;
pub use list::handle_list;
pub use run::handle_run;

// ===========================================
// Shared Utilities
// ===========================================

/// Loads suites from `path` or the built-in fixtures, keeping only test
/// cases whose name matches `filter`.
pub(crate) fn load_suites_filtered(path: Option<&Path>, filter: Option<&str>) -> Result<Vec<Suite>> {
    let suites = match path {
        Some(path) => load_suites(path)
            .with_context(|| format!("failed to load fixtures: {}", path.display()))?,
        None => embedded_suites().context("failed to load built-in fixtures")?,
    };

    match filter {
        Some(pattern) => {
            let regex =
                Regex::new(pattern).with_context(|| format!("invalid --filter regex: {}", pattern))?;
            let filtered = filter_suites(suites, &regex);
            debug!(pattern, suites = filtered.len(), "applied test filter");
            Ok(filtered)
        }
        None => Ok(suites),
    }
}

/// Loads the schema from `path` or the built-in one.
pub(crate) fn load_schema(path: Option<&Path>) -> Result<SchemaValidator> {
    match path {
        Some(path) => SchemaValidator::load(path)
            .with_context(|| format!("failed to load schema: {}", path.display())),
        None => SchemaValidator::embedded().context("failed to load built-in schema"),
    }
}
