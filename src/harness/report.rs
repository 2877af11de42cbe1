//! Running suites and reporting their outcomes.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use crate::domain::Suite;
use crate::harness::orchestrator::Orchestrator;
use crate::harness::outcome::CaseOutcome;
use crate::harness::runner::ProcessRunner;

/// Outcomes of one suite, in fixture order.
#[derive(Debug)]
pub struct SuiteReport {
    pub title: String,
    pub description: String,
    pub outcomes: Vec<CaseOutcome>,
    pub elapsed: Duration,
}

impl SuiteReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.verdict.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.passed()
    }
}

/// Outcomes of a whole run.
#[derive(Debug, Default)]
pub struct RunReport {
    pub suites: Vec<SuiteReport>,
}

impl RunReport {
    pub fn total(&self) -> usize {
        self.suites.iter().map(SuiteReport::total).sum()
    }

    pub fn passed(&self) -> usize {
        self.suites.iter().map(SuiteReport::passed).sum()
    }

    pub fn failed(&self) -> usize {
        self.suites.iter().map(SuiteReport::failed).sum()
    }

    /// True iff no test case failed.
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

/// Receives progress while suites run.
pub trait SuiteObserver {
    /// Called before the first test case of a suite.
    fn on_suite_start(&mut self, suite: &Suite) -> io::Result<()>;
    /// Called after each test case.
    fn on_case(&mut self, outcome: &CaseOutcome) -> io::Result<()>;
    /// Called after the last test case of a suite.
    fn on_suite_complete(&mut self, report: &SuiteReport) -> io::Result<()>;
    /// Called once every suite has run.
    fn on_run_complete(&mut self, report: &RunReport) -> io::Result<()>;
}

/// An observer that reports nothing.
#[derive(Default)]
pub struct NoopObserver;

impl SuiteObserver for NoopObserver {
    fn on_suite_start(&mut self, _suite: &Suite) -> io::Result<()> {
        Ok(())
    }
    fn on_case(&mut self, _outcome: &CaseOutcome) -> io::Result<()> {
        Ok(())
    }
    fn on_suite_complete(&mut self, _report: &SuiteReport) -> io::Result<()> {
        Ok(())
    }
    fn on_run_complete(&mut self, _report: &RunReport) -> io::Result<()> {
        Ok(())
    }
}

/// Writes the line-oriented pass/fail report.
pub struct HumanReporter<W> {
    out: W,
}

impl<W: Write> HumanReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> SuiteObserver for HumanReporter<W> {
    fn on_suite_start(&mut self, suite: &Suite) -> io::Result<()> {
        writeln!(self.out, "# {}", suite.title)?;
        writeln!(self.out, "#    {}", suite.description)?;
        writeln!(self.out, "#")?;
        writeln!(self.out, "# running {} tests.", suite.tests.len())?;
        writeln!(self.out)
    }

    fn on_case(&mut self, outcome: &CaseOutcome) -> io::Result<()> {
        let mark = if outcome.verdict.passed() {
            "passed"
        } else {
            "failed"
        };
        writeln!(self.out, "\ttest: {} [{}]", outcome.name, mark)?;
        self.out.flush()
    }

    fn on_suite_complete(&mut self, report: &SuiteReport) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(
            self.out,
            "[passed: {}, failed: {}, took: {:.2}s]",
            report.passed(),
            report.failed(),
            report.elapsed.as_secs_f64()
        )?;
        writeln!(self.out)
    }

    fn on_run_complete(&mut self, report: &RunReport) -> io::Result<()> {
        writeln!(
            self.out,
            "ran {} tests overall: {} passed, {} failed.",
            report.total(),
            report.passed(),
            report.failed()
        )?;
        self.out.flush()
    }
}

/// Runs every suite of the orchestrator's context in order.
///
/// Test failures are recorded in the report; only observer I/O errors are
/// returned.
pub fn run_suites<R, O>(orchestrator: &mut Orchestrator<'_, R>, observer: &mut O) -> io::Result<RunReport>
where
    R: ProcessRunner,
    O: SuiteObserver + ?Sized,
{
    let ctx = orchestrator.context();
    let mut report = RunReport::default();

    for suite in &ctx.suites {
        observer.on_suite_start(suite)?;
        let started = Instant::now();

        let mut outcomes = Vec::with_capacity(suite.tests.len());
        for case in &suite.tests {
            let outcome = orchestrator.run_case(case);
            observer.on_case(&outcome)?;
            outcomes.push(outcome);
        }

        let suite_report = SuiteReport {
            title: suite.title.clone(),
            description: suite.description.clone(),
            outcomes,
            elapsed: started.elapsed(),
        };
        observer.on_suite_complete(&suite_report)?;
        report.suites.push(suite_report);
    }

    observer.on_run_complete(&report)?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Snapshot, Step, TestCase};
    use crate::harness::context::SuiteContext;
    use crate::harness::outcome::{Failure, Stage, Verdict};
    use crate::harness::runner::{Invocation, StepError, StepOutcome};
    use crate::infra::SchemaValidator;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    /// Writes an empty plaintext profile for `ok`, fails to spawn otherwise.
    struct ScriptedRunner;

    impl ProcessRunner for ScriptedRunner {
        fn run(&self, invocation: &Invocation) -> Result<StepOutcome, StepError> {
            let folder = PathBuf::from(&invocation.args[1]);
            if invocation.args[2] == "ok" {
                std::fs::write(folder.join("default.json"), r#"{"encrypted":false,"notes":[]}"#)
                    .unwrap();
                Ok(StepOutcome { exit_code: Some(0) })
            } else {
                Err(StepError::Spawn {
                    program: invocation.program.clone(),
                    source: io::Error::from(io::ErrorKind::NotFound),
                })
            }
        }
    }

    fn case(name: &str, command: &str) -> TestCase {
        TestCase {
            name: name.to_string(),
            profile: None,
            profile_folder: None,
            steps: vec![Step::new([command])],
            result_path: PathBuf::from("default.json"),
            passphrase: None,
            expect: Snapshot::default(),
        }
    }

    fn suite(title: &str, tests: Vec<TestCase>) -> Suite {
        Suite {
            title: title.to_string(),
            description: "testing things.".to_string(),
            tests,
        }
    }

    fn outcome(name: &str, passed: bool) -> CaseOutcome {
        CaseOutcome {
            name: name.to_string(),
            verdict: if passed {
                Verdict::Passed
            } else {
                Verdict::Failed(Failure::new(
                    Stage::LocatingResult,
                    crate::harness::outcome::FailureKind::MissingResult {
                        path: PathBuf::from("x.json"),
                    },
                ))
            },
            elapsed: Duration::ZERO,
        }
    }

    #[test]
    fn counts_add_up() {
        let report = RunReport {
            suites: vec![
                SuiteReport {
                    title: "A".into(),
                    description: String::new(),
                    outcomes: vec![outcome("a", true), outcome("b", false)],
                    elapsed: Duration::ZERO,
                },
                SuiteReport {
                    title: "B".into(),
                    description: String::new(),
                    outcomes: vec![outcome("c", true)],
                    elapsed: Duration::ZERO,
                },
            ],
        };

        assert_eq!(report.total(), 3);
        assert_eq!(report.passed(), 2);
        assert_eq!(report.failed(), 1);
        assert!(!report.is_success());
        assert!(RunReport::default().is_success());
    }

    #[test]
    fn human_report_format() {
        let mut reporter = HumanReporter::new(Vec::new());
        let s = suite("GOOD TESTS", vec![case("a", "ok"), case("b", "ok")]);

        reporter.on_suite_start(&s).unwrap();
        reporter.on_case(&outcome("a", true)).unwrap();
        reporter.on_case(&outcome("b", false)).unwrap();
        let report = SuiteReport {
            title: s.title.clone(),
            description: s.description.clone(),
            outcomes: vec![outcome("a", true), outcome("b", false)],
            elapsed: Duration::from_millis(1500),
        };
        reporter.on_suite_complete(&report).unwrap();
        reporter
            .on_run_complete(&RunReport {
                suites: vec![report],
            })
            .unwrap();

        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(
            text,
            "# GOOD TESTS\n\
             #    testing things.\n\
             #\n\
             # running 2 tests.\n\
             \n\
             \ttest: a [passed]\n\
             \ttest: b [failed]\n\
             \n\
             [passed: 1, failed: 1, took: 1.50s]\n\
             \n\
             ran 2 tests overall: 1 passed, 1 failed.\n"
        );
    }

    #[test]
    fn run_suites_keeps_going_after_failures() {
        let ctx = SuiteContext::new(
            vec![
                suite("first", vec![case("good", "ok"), case("bad", "boom")]),
                suite("second", vec![case("also good", "ok")]),
            ],
            SchemaValidator::embedded().unwrap(),
        );
        let mut orchestrator = Orchestrator::new(&ctx, ScriptedRunner).unwrap();
        let mut reporter = HumanReporter::new(Vec::new());

        let report = run_suites(&mut orchestrator, &mut reporter).unwrap();

        assert_eq!(report.suites.len(), 2);
        assert_eq!(report.total(), 3);
        assert_eq!(report.failed(), 1);
        let failure = report.suites[0].outcomes[1].verdict.failure().unwrap();
        assert_eq!(failure.stage, Stage::RunningSteps);

        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(text.contains("\ttest: bad [failed]\n"));
        assert!(text.ends_with("ran 3 tests overall: 2 passed, 1 failed.\n"));
    }
}
