//! Scoped filesystem workspaces for test cases.

use std::io;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Deserialize;
use tempfile::TempDir;
use thiserror::Error;
use tracing::{debug, warn};

/// How test cases are isolated from each other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Isolation {
    /// A new directory per test case.
    #[default]
    Fresh,
    /// One directory for the whole run, emptied after every test case.
    Shared,
}

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("failed to create workspace: {0}")]
    Create(#[source] io::Error),

    #[error("shared workspace left dirty by a previous test: {0}")]
    Dirty(#[source] io::Error),
}

/// The suite-level temporary directory owned by the orchestrator.
///
/// Removed with everything in it when dropped.
#[derive(Debug)]
pub struct Workspace {
    root: TempDir,
    isolation: Isolation,
    /// Set when a shared lease could not be emptied on release.
    dirty: bool,
}

impl Workspace {
    /// Creates the suite root.
    pub fn create(isolation: Isolation) -> Result<Self, WorkspaceError> {
        let root = tempfile::Builder::new()
            .prefix("notecheck-")
            .tempdir()
            .map_err(WorkspaceError::Create)?;
        debug!(root = %root.path().display(), ?isolation, "created workspace");
        Ok(Self {
            root,
            isolation,
            dirty: false,
        })
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn isolation(&self) -> Isolation {
        self.isolation
    }

    /// Hands out the directory for one test case.
    ///
    /// The lease borrows the workspace mutably, so at most one test case owns
    /// it at a time. Releasing the lease (on any exit path) removes
    /// everything the test case left behind. A shared root that could not be
    /// emptied last time is cleared again first, and the lease is refused if
    /// that still fails.
    pub fn lease(&mut self) -> Result<Lease<'_>, WorkspaceError> {
        match self.isolation {
            Isolation::Fresh => {
                let dir = tempfile::Builder::new()
                    .prefix("case-")
                    .tempdir_in(self.root.path())
                    .map_err(WorkspaceError::Create)?;
                Ok(Lease {
                    path: dir.path().to_path_buf(),
                    fresh: Some(dir),
                    dirty: &mut self.dirty,
                })
            }
            Isolation::Shared => {
                if self.dirty {
                    clear_dir(self.root.path()).map_err(WorkspaceError::Dirty)?;
                    self.dirty = false;
                }
                Ok(Lease {
                    path: self.root.path().to_path_buf(),
                    fresh: None,
                    dirty: &mut self.dirty,
                })
            }
        }
    }
}

/// Exclusive use of a workspace directory for one test case.
#[derive(Debug)]
pub struct Lease<'a> {
    path: PathBuf,
    fresh: Option<TempDir>,
    dirty: &'a mut bool,
}

impl Lease<'_> {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for Lease<'_> {
    fn drop(&mut self) {
        let shared = self.fresh.is_none();
        let result = match self.fresh.take() {
            Some(dir) => dir.close(),
            None => clear_dir(&self.path),
        };
        match result {
            Ok(()) => debug!(path = %self.path.display(), "released workspace"),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "workspace cleanup failed");
                if shared {
                    *self.dirty = true;
                }
            }
        }
    }
}

/// Removes every entry inside `dir`, keeping `dir` itself.
pub fn clear_dir(dir: &Path) -> io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            std::fs::remove_dir_all(entry.path())?;
        } else {
            std::fs::remove_file(entry.path())?;
        }
    }
    Ok(())
}

/// Lists files under `dir`, relative to it.
pub fn list_files(dir: &Path) -> Vec<PathBuf> {
    walkdir::WalkDir::new(dir)
        .min_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.path().strip_prefix(dir).ok().map(Path::to_path_buf))
        .collect()
}
