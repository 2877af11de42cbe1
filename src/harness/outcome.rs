//! Per-test verdicts.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::domain::{ComparisonError, InvariantError};
use crate::harness::runner::StepError;
use crate::harness::workspace::WorkspaceError;
use crate::infra::{DecodeError, SchemaError};

/// Orchestrator states a test case can fail in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Init,
    RunningSteps,
    LocatingResult,
    Validating,
    Comparing,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Init => "init",
            Stage::RunningSteps => "running steps",
            Stage::LocatingResult => "locating result",
            Stage::Validating => "validating",
            Stage::Comparing => "comparing",
        };
        f.write_str(name)
    }
}

/// Why a test case failed.
#[derive(Debug, Error)]
pub enum FailureKind {
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    #[error("step {step}: {source}")]
    Step {
        step: usize,
        #[source]
        source: StepError,
    },

    #[error("result file not found: {path}")]
    MissingResult { path: PathBuf },

    #[error("failed to read result file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Invariant(#[from] InvariantError),

    #[error(transparent)]
    Comparison(#[from] ComparisonError),
}

impl FailureKind {
    /// Short name of the error kind.
    pub fn label(&self) -> &'static str {
        match self {
            FailureKind::Workspace(_) => "workspace",
            FailureKind::Step { .. } => "step",
            FailureKind::MissingResult { .. } => "missing_result",
            FailureKind::Io { .. } => "io",
            FailureKind::Decode(_) => "decode",
            FailureKind::Schema(_) => "schema",
            FailureKind::Invariant(_) => "invariant",
            FailureKind::Comparison(_) => "comparison",
        }
    }
}

/// A failure and the state it happened in.
#[derive(Debug, Error)]
#[error("{stage}: {kind}")]
pub struct Failure {
    pub stage: Stage,
    #[source]
    pub kind: FailureKind,
}

impl Failure {
    pub fn new(stage: Stage, kind: impl Into<FailureKind>) -> Self {
        Self {
            stage,
            kind: kind.into(),
        }
    }
}

#[derive(Debug)]
pub enum Verdict {
    Passed,
    Failed(Failure),
}

impl Verdict {
    pub fn passed(&self) -> bool {
        matches!(self, Verdict::Passed)
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Verdict::Passed => None,
            Verdict::Failed(failure) => Some(failure),
        }
    }
}

/// The result of running one test case.
#[derive(Debug)]
pub struct CaseOutcome {
    pub name: String,
    pub verdict: Verdict,
    pub elapsed: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_display_names_stage_and_cause() {
        let failure = Failure::new(
            Stage::LocatingResult,
            FailureKind::MissingResult {
                path: PathBuf::from("default.json"),
            },
        );
        assert_eq!(
            failure.to_string(),
            "locating result: result file not found: default.json"
        );
        assert_eq!(failure.kind.label(), "missing_result");
    }

    #[test]
    fn verdict_accessors() {
        assert!(Verdict::Passed.passed());
        assert!(Verdict::Passed.failure().is_none());

        let failed = Verdict::Failed(Failure::new(
            Stage::RunningSteps,
            FailureKind::Step {
                step: 0,
                source: StepError::TimedOut(Duration::from_secs(1)),
            },
        ));
        assert!(!failed.passed());
        assert_eq!(failed.failure().unwrap().stage, Stage::RunningSteps);
    }

    #[test]
    fn stage_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(Stage::LocatingResult).unwrap(),
            serde_json::json!("locating_result")
        );
    }
}
