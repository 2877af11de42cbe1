//! Run command handler.

use std::io;

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use super::{load_schema, load_suites_filtered};
use crate::cli::RunArgs;
use crate::cli::config::Config;
use crate::cli::output::{Output, OutputFormat, RunSummary};
use crate::harness::{
    HumanReporter, NoopObserver, Orchestrator, SuiteContext, SystemRunner, run_suites,
};

pub fn handle_run(args: &RunArgs, config: &Config, format: OutputFormat) -> Result<()> {
    // 1. Load fixtures and schema once, up front
    let fixtures = config.fixtures(args.fixtures.as_ref());
    let suites = load_suites_filtered(fixtures.as_deref(), args.filter.as_deref())?;
    let schema = load_schema(config.schema(args.schema.as_ref()).as_deref())?;

    let ctx = SuiteContext::new(suites, schema)
        .with_executable(config.executable(args.executable.as_ref()))
        .with_timeout(config.timeout(args.timeout))
        .with_isolation(config.isolation(args.isolation))
        .with_codec(config.codec());

    if !ctx.executable.exists() {
        warn!(executable = %ctx.executable.display(), "note tool not found, every test will fail");
    }
    info!(
        tests = ctx.test_count(),
        executable = %ctx.executable.display(),
        isolation = ?ctx.isolation,
        "starting run"
    );

    // 2. Run every suite
    let mut orchestrator =
        Orchestrator::new(&ctx, SystemRunner).context("failed to create workspace")?;

    let report = match format {
        OutputFormat::Human => {
            let mut reporter = HumanReporter::new(io::stdout().lock());
            run_suites(&mut orchestrator, &mut reporter).context("failed to write report")?
        }
        OutputFormat::Json => {
            let report = run_suites(&mut orchestrator, &mut NoopObserver)
                .context("failed to write report")?;
            let out = Output::new(RunSummary::from(&report));
            println!("{}", serde_json::to_string_pretty(&out)?);
            report
        }
    };

    // 3. Exit code: fail if any test failed
    if !report.is_success() {
        bail!("{} of {} tests failed", report.failed(), report.total());
    }
    Ok(())
}
