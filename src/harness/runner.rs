//! Spawning the note tool.

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{ChildStdin, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};
use wait_timeout::ChildExt;

/// One fully-resolved invocation of the tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    /// Written to the child's stdin, which is then closed. `None` leaves
    /// stdin unattached.
    pub stdin: Option<Vec<u8>>,
    /// Kill the child if it runs longer than this.
    pub timeout: Option<Duration>,
}

/// How a step ended. Exit status is recorded, never judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepOutcome {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
}

/// Errors that stop a step from completing.
#[derive(Debug, Error)]
pub enum StepError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write stdin: {0}")]
    Stdin(#[source] io::Error),

    #[error("failed waiting for process: {0}")]
    Wait(#[source] io::Error),

    #[error("timed out after {}s", .0.as_secs_f64())]
    TimedOut(Duration),
}

/// Runs tool invocations (allows faking the tool in tests).
pub trait ProcessRunner {
    fn run(&self, invocation: &Invocation) -> Result<StepOutcome, StepError>;
}

impl<R: ProcessRunner + ?Sized> ProcessRunner for &R {
    fn run(&self, invocation: &Invocation) -> Result<StepOutcome, StepError> {
        (**self).run(invocation)
    }
}

/// Runs invocations as real child processes with output discarded.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<StepOutcome, StepError> {
        let stdin = if invocation.stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        };

        let mut child = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(stdin)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| StepError::Spawn {
                program: invocation.program.clone(),
                source,
            })?;
        debug!(pid = child.id(), args = ?invocation.args, "spawned tool");

        // The payload is written on its own thread so a tool that never reads
        // stdin cannot stall the harness past the timeout.
        let writer = match (&invocation.stdin, child.stdin.take()) {
            (Some(payload), Some(pipe)) => Some(spawn_writer(pipe, payload.clone())),
            _ => None,
        };

        let waited = match invocation.timeout {
            Some(limit) => match child.wait_timeout(limit) {
                Ok(Some(status)) => Ok(status),
                Ok(None) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    warn!(program = %invocation.program.display(), ?limit, "tool timed out");
                    Err(StepError::TimedOut(limit))
                }
                Err(e) => Err(StepError::Wait(e)),
            },
            None => child.wait().map_err(StepError::Wait),
        };

        // After a timeout a surviving grandchild may still hold the pipe open,
        // so the writer is detached rather than joined.
        let status = waited?;
        if let Some(handle) = writer {
            join_writer(handle)?;
        }

        debug!(code = ?status.code(), "tool exited");
        Ok(StepOutcome {
            exit_code: status.code(),
        })
    }
}

fn spawn_writer(mut pipe: ChildStdin, payload: Vec<u8>) -> JoinHandle<io::Result<()>> {
    thread::spawn(move || match pipe.write_all(&payload) {
        // The tool exited without reading its input.
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
            debug!("tool closed stdin before reading the payload");
            Ok(())
        }
        other => other,
    })
}

fn join_writer(handle: JoinHandle<io::Result<()>>) -> Result<(), StepError> {
    match handle.join() {
        Ok(result) => result.map_err(StepError::Stdin),
        Err(_) => Err(StepError::Stdin(io::Error::other("stdin writer panicked"))),
    }
}
