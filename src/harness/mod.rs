//! Driving the note tool through test cases and judging the results.

mod context;
mod orchestrator;
mod outcome;
mod pipeline;
mod report;
mod runner;
mod workspace;

pub use context::{DEFAULT_EXECUTABLE, DEFAULT_TIMEOUT, SuiteContext};
pub use orchestrator::{Orchestrator, build_args};
pub use outcome::{CaseOutcome, Failure, FailureKind, Stage, Verdict};
pub use pipeline::{load_result, validate_document};
pub use report::{HumanReporter, NoopObserver, RunReport, SuiteObserver, SuiteReport, run_suites};
pub use runner::{Invocation, ProcessRunner, StepError, StepOutcome, SystemRunner};
pub use workspace::{Isolation, Lease, Workspace, WorkspaceError, clear_dir, list_files};
