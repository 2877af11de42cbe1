//! Everything a run needs, loaded once at startup.

use std::path::PathBuf;
use std::time::Duration;

use crate::domain::Suite;
use crate::harness::workspace::Isolation;
use crate::infra::{ProfileCodec, SchemaValidator};

/// Default executable, relative to the working directory.
pub const DEFAULT_EXECUTABLE: &str = "target/theca";

/// Default per-invocation timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Read-only state shared by every test case of a run.
#[derive(Debug)]
pub struct SuiteContext {
    pub suites: Vec<Suite>,
    pub schema: SchemaValidator,
    pub codec: ProfileCodec,
    pub executable: PathBuf,
    /// `None` disables the per-invocation timeout.
    pub timeout: Option<Duration>,
    pub isolation: Isolation,
}

impl SuiteContext {
    /// Context with default settings for the given suites and schema.
    pub fn new(suites: Vec<Suite>, schema: SchemaValidator) -> Self {
        Self {
            suites,
            schema,
            codec: ProfileCodec::fixture(),
            executable: PathBuf::from(DEFAULT_EXECUTABLE),
            timeout: Some(DEFAULT_TIMEOUT),
            isolation: Isolation::default(),
        }
    }

    pub fn with_executable(mut self, executable: impl Into<PathBuf>) -> Self {
        self.executable = executable.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_isolation(mut self, isolation: Isolation) -> Self {
        self.isolation = isolation;
        self
    }

    pub fn with_codec(mut self, codec: ProfileCodec) -> Self {
        self.codec = codec;
        self
    }

    /// Total number of test cases across all suites.
    pub fn test_count(&self) -> usize {
        self.suites.iter().map(|s| s.tests.len()).sum()
    }
}
