//! Declarative test-case fixtures.
//!
//! A fixture file is a YAML list of suites. Each test case names the command
//! steps to run against the note tool, the profile file they should leave
//! behind, and a snapshot of what that profile must contain.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::Snapshot;

/// Fixture suites shipped with the crate.
pub const EMBEDDED_SUITES: &str = include_str!("../../fixtures/suites.yaml");

/// Errors while loading or checking fixture data.
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to read fixtures from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid fixture YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("suite #{0} has an empty title")]
    EmptyTitle(usize),

    #[error("suite '{suite}' contains a test with an empty name")]
    EmptyName { suite: String },

    #[error("suite '{suite}' has more than one test named '{name}'")]
    DuplicateName { suite: String, name: String },

    #[error("test '{name}' has no command steps")]
    NoSteps { name: String },

    #[error("test '{name}' has result path {path} outside the workspace")]
    UnsafeResultPath { name: String, path: PathBuf },
}

/// A titled group of test cases.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Suite {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub tests: Vec<TestCase>,
}

/// One scenario: a sequence of tool invocations and the expected profile.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestCase {
    pub name: String,

    /// Profile selected with `-p`; `None` uses the tool's default profile.
    #[serde(default)]
    pub profile: Option<String>,

    /// Sub-folder of the workspace passed with `-f`.
    #[serde(default)]
    pub profile_folder: Option<String>,

    pub steps: Vec<Step>,

    /// Profile file to inspect, relative to the workspace.
    #[serde(rename = "result")]
    pub result_path: PathBuf,

    /// Passphrase for encrypted results.
    #[serde(default)]
    pub passphrase: Option<String>,

    pub expect: Snapshot,
}

impl TestCase {
    /// Profile selector, ignoring empty strings.
    pub fn profile(&self) -> Option<&str> {
        self.profile.as_deref().filter(|p| !p.is_empty())
    }

    /// Workspace sub-folder, ignoring empty strings.
    pub fn profile_folder(&self) -> Option<&str> {
        self.profile_folder.as_deref().filter(|f| !f.is_empty())
    }

    /// Decryption passphrase, ignoring empty strings.
    pub fn passphrase(&self) -> Option<&str> {
        self.passphrase.as_deref().filter(|p| !p.is_empty())
    }
}

/// A single invocation of the tool, with an optional stdin payload.
///
/// In YAML a step is either a bare argument list or `{ args, stdin }`.
/// Payloads that are not UTF-8 text go in `stdin_base64` instead.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "StepSpec")]
pub struct Step {
    pub args: Vec<String>,
    pub stdin: Option<Vec<u8>>,
}

impl Step {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            stdin: None,
        }
    }

    pub fn with_stdin(mut self, payload: impl Into<Vec<u8>>) -> Self {
        self.stdin = Some(payload.into());
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StepSpec {
    Bare(Vec<String>),
    Full {
        args: Vec<String>,
        #[serde(default)]
        stdin: Option<String>,
        #[serde(default)]
        stdin_base64: Option<String>,
    },
}

#[derive(Debug, Error)]
enum StepSpecError {
    #[error("step sets both stdin and stdin_base64")]
    ConflictingStdin,

    #[error("invalid stdin_base64: {0}")]
    Base64(#[from] base64::DecodeError),
}

impl TryFrom<StepSpec> for Step {
    type Error = StepSpecError;

    fn try_from(raw: StepSpec) -> Result<Self, Self::Error> {
        let (args, stdin) = match raw {
            StepSpec::Bare(args) => (args, None),
            StepSpec::Full {
                args,
                stdin,
                stdin_base64,
            } => {
                let payload = match (stdin, stdin_base64) {
                    (Some(_), Some(_)) => return Err(StepSpecError::ConflictingStdin),
                    (text, None) => text.map(String::into_bytes),
                    (None, Some(encoded)) => Some(BASE64.decode(encoded.trim())?),
                };
                (args, payload)
            }
        };
        Ok(Step { args, stdin })
    }
}

/// Parses and checks fixture YAML.
pub fn parse_suites(yaml: &str) -> Result<Vec<Suite>, FixtureError> {
    let suites: Vec<Suite> = serde_yaml::from_str(yaml)?;
    check_suites(&suites)?;
    Ok(suites)
}

/// Reads, parses and checks a fixture file.
pub fn load_suites(path: &Path) -> Result<Vec<Suite>, FixtureError> {
    let yaml = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_suites(&yaml)
}

/// The suites shipped with the crate.
pub fn embedded_suites() -> Result<Vec<Suite>, FixtureError> {
    parse_suites(EMBEDDED_SUITES)
}

/// Keeps only the test cases whose name matches `filter`, dropping suites
/// left empty.
pub fn filter_suites(suites: Vec<Suite>, filter: &Regex) -> Vec<Suite> {
    suites
        .into_iter()
        .filter_map(|mut suite| {
            suite.tests.retain(|t| filter.is_match(&t.name));
            (!suite.tests.is_empty()).then_some(suite)
        })
        .collect()
}

fn check_suites(suites: &[Suite]) -> Result<(), FixtureError> {
    for (index, suite) in suites.iter().enumerate() {
        if suite.title.trim().is_empty() {
            return Err(FixtureError::EmptyTitle(index));
        }

        let mut names = HashSet::new();
        for test in &suite.tests {
            if test.name.trim().is_empty() {
                return Err(FixtureError::EmptyName {
                    suite: suite.title.clone(),
                });
            }
            if !names.insert(test.name.as_str()) {
                return Err(FixtureError::DuplicateName {
                    suite: suite.title.clone(),
                    name: test.name.clone(),
                });
            }
            if test.steps.is_empty() {
                return Err(FixtureError::NoSteps {
                    name: test.name.clone(),
                });
            }
            if !is_contained(&test.result_path) {
                return Err(FixtureError::UnsafeResultPath {
                    name: test.name.clone(),
                    path: test.result_path.clone(),
                });
            }
        }
    }
    Ok(())
}

/// True if `path` is relative and never climbs out of its base.
fn is_contained(path: &Path) -> bool {
    let mut depth = 0usize;
    for component in path.components() {
        match component {
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            Component::ParentDir => {
                if depth == 0 {
                    return false;
                }
                depth -= 1;
            }
            Component::RootDir | Component::Prefix(_) => return false,
        }
    }
    depth > 0
}
