//! Output format types for CLI commands.

use clap::ValueEnum;
use serde::Serialize;

use crate::domain::Suite;
use crate::harness::{CaseOutcome, RunReport, Stage, SuiteReport, Verdict};

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for programmatic consumption
    Json,
}

/// Wrapper for serializable command output.
#[derive(Debug, Serialize)]
pub struct Output<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> Output<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Totals and per-suite results of a run.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub suites: Vec<SuiteSummary>,
}

#[derive(Debug, Serialize)]
pub struct SuiteSummary {
    pub title: String,
    pub passed: usize,
    pub failed: usize,
    pub elapsed_secs: f64,
    pub tests: Vec<CaseSummary>,
}

/// One test case. `stage`, `kind` and `message` are set only on failure.
#[derive(Debug, Serialize)]
pub struct CaseSummary {
    pub name: String,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub elapsed_secs: f64,
}

impl From<&RunReport> for RunSummary {
    fn from(report: &RunReport) -> Self {
        Self {
            total: report.total(),
            passed: report.passed(),
            failed: report.failed(),
            suites: report.suites.iter().map(SuiteSummary::from).collect(),
        }
    }
}

impl From<&SuiteReport> for SuiteSummary {
    fn from(report: &SuiteReport) -> Self {
        Self {
            title: report.title.clone(),
            passed: report.passed(),
            failed: report.failed(),
            elapsed_secs: report.elapsed.as_secs_f64(),
            tests: report.outcomes.iter().map(CaseSummary::from).collect(),
        }
    }
}

impl From<&CaseOutcome> for CaseSummary {
    fn from(outcome: &CaseOutcome) -> Self {
        let (stage, kind, message) = match &outcome.verdict {
            Verdict::Passed => (None, None, None),
            Verdict::Failed(failure) => (
                Some(failure.stage),
                Some(failure.kind.label()),
                Some(failure.kind.to_string()),
            ),
        };
        Self {
            name: outcome.name.clone(),
            passed: outcome.verdict.passed(),
            stage,
            kind,
            message,
            elapsed_secs: outcome.elapsed.as_secs_f64(),
        }
    }
}

/// A suite in listing output.
#[derive(Debug, Serialize)]
pub struct SuiteListing {
    pub title: String,
    pub description: String,
    pub tests: Vec<String>,
}

impl From<&Suite> for SuiteListing {
    fn from(suite: &Suite) -> Self {
        Self {
            title: suite.title.clone(),
            description: suite.description.clone(),
            tests: suite.tests.iter().map(|t| t.name.clone()).collect(),
        }
    }
}

/// Result of checking a single profile.
#[derive(Debug, Serialize)]
pub struct CheckResult {
    pub path: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encrypted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
