//! Runs one test case end to end.
//!
//! States: init → running steps → locating result → validating → comparing,
//! ending in passed or failed. Cleanup is the release of the workspace lease
//! and happens on every path out of [`Orchestrator::run_case`].

use std::ffi::OsString;
use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::domain::{Step, TestCase, compare};
use crate::harness::context::SuiteContext;
use crate::harness::outcome::{CaseOutcome, Failure, FailureKind, Stage, Verdict};
use crate::harness::pipeline::{load_result, validate_document};
use crate::harness::runner::{Invocation, ProcessRunner};
use crate::harness::workspace::{Workspace, WorkspaceError, list_files};

/// Drives the note tool through test cases inside an owned workspace.
pub struct Orchestrator<'ctx, R> {
    ctx: &'ctx SuiteContext,
    runner: R,
    workspace: Workspace,
}

impl<'ctx, R: ProcessRunner> Orchestrator<'ctx, R> {
    /// Creates the orchestrator and its workspace.
    ///
    /// # Errors
    ///
    /// Fails if the workspace cannot be created; a run cannot proceed
    /// without one.
    pub fn new(ctx: &'ctx SuiteContext, runner: R) -> Result<Self, WorkspaceError> {
        let workspace = Workspace::create(ctx.isolation)?;
        Ok(Self {
            ctx,
            runner,
            workspace,
        })
    }

    pub fn context(&self) -> &'ctx SuiteContext {
        self.ctx
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Runs a test case. Never fails: every error becomes a failed verdict.
    pub fn run_case(&mut self, case: &TestCase) -> CaseOutcome {
        let started = Instant::now();
        debug!(test = %case.name, stage = %Stage::Init, "starting test");

        let verdict = match self.workspace.lease() {
            Ok(lease) => match execute(self.ctx, &self.runner, case, lease.path()) {
                Ok(()) => Verdict::Passed,
                Err(failure) => Verdict::Failed(failure),
            },
            Err(e) => Verdict::Failed(Failure::new(Stage::Init, e)),
        };

        match &verdict {
            Verdict::Passed => info!(test = %case.name, "passed"),
            Verdict::Failed(failure) => warn!(test = %case.name, reason = %failure, "failed"),
        }

        CaseOutcome {
            name: case.name.clone(),
            verdict,
            elapsed: started.elapsed(),
        }
    }
}

fn execute<R: ProcessRunner>(
    ctx: &SuiteContext,
    runner: &R,
    case: &TestCase,
    dir: &Path,
) -> Result<(), Failure> {
    debug!(test = %case.name, stage = %Stage::RunningSteps);
    for (index, step) in case.steps.iter().enumerate() {
        let invocation = Invocation {
            program: ctx.executable.clone(),
            args: build_args(case, dir, step),
            stdin: step.stdin.clone(),
            timeout: ctx.timeout,
        };
        runner.run(&invocation).map_err(|source| {
            Failure::new(Stage::RunningSteps, FailureKind::Step { step: index, source })
        })?;
    }

    debug!(test = %case.name, stage = %Stage::LocatingResult);
    let result_path = dir.join(&case.result_path);
    let value = load_result(&result_path, case.passphrase(), &ctx.codec).map_err(|kind| {
        if matches!(kind, FailureKind::MissingResult { .. }) {
            debug!(present = ?list_files(dir), "workspace contents");
        }
        Failure::new(Stage::LocatingResult, kind)
    })?;

    debug!(test = %case.name, stage = %Stage::Validating);
    let document =
        validate_document(&ctx.schema, value).map_err(|kind| Failure::new(Stage::Validating, kind))?;

    debug!(test = %case.name, stage = %Stage::Comparing);
    compare(&case.expect, &document).map_err(|e| Failure::new(Stage::Comparing, e))
}

/// Builds `[-p <profile>] -f <folder> <step args...>`.
pub fn build_args(case: &TestCase, workspace_dir: &Path, step: &Step) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::with_capacity(step.args.len() + 4);

    if let Some(profile) = case.profile() {
        args.push("-p".into());
        args.push(profile.into());
    }

    let folder = match case.profile_folder() {
        Some(sub) => workspace_dir.join(sub),
        None => workspace_dir.to_path_buf(),
    };
    args.push("-f".into());
    args.push(folder.into_os_string());

    args.extend(step.args.iter().map(OsString::from));
    args
}
