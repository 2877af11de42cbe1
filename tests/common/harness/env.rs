//! Isolated test environment with temp directory.

// Allow dead code since each test binary uses a different subset
#![allow(dead_code)]

use super::{FAKE_TOOL_SCRIPT, NotecheckCommand};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated test environment with a temporary directory.
///
/// The directory doubles as the config home of every command built from
/// this environment, and is cleaned up on drop.
pub struct TestEnv {
    /// The temporary directory (kept for lifetime management)
    _temp_dir: TempDir,
    /// Path to the environment root
    root: PathBuf,
}

impl TestEnv {
    /// Creates a new isolated test environment.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path().to_path_buf();
        Self {
            _temp_dir: temp_dir,
            root,
        }
    }

    /// Returns the path to the environment root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates a NotecheckCommand configured for this test environment.
    pub fn cmd(&self) -> NotecheckCommand {
        NotecheckCommand::new().config_home(&self.root)
    }

    /// Writes a file to the test environment and returns its path.
    pub fn write_file(&self, name: &str, content: impl AsRef<[u8]>) -> PathBuf {
        let path = self.root.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Installs the scripted note tool and returns its path.
    #[cfg(unix)]
    pub fn fake_tool(&self) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = self.write_file("bin/theca", FAKE_TOOL_SCRIPT);
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("Failed to make fake tool executable");
        path
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_creates_temp_directory() {
        let env = TestEnv::new();
        assert!(env.root().is_dir(), "root should be a directory");
    }

    #[test]
    fn test_env_cleanup_on_drop() {
        let path = {
            let env = TestEnv::new();
            env.root().to_path_buf()
        };
        assert!(
            !path.exists(),
            "temp directory should be cleaned up on drop"
        );
    }

    #[test]
    fn test_env_write_file_creates_parents() {
        let env = TestEnv::new();
        let path = env.write_file("a/b/c.txt", "hello");
        assert_eq!(std::fs::read_to_string(path).unwrap(), "hello");
    }

    #[cfg(unix)]
    #[test]
    fn test_env_fake_tool_writes_profile() {
        let env = TestEnv::new();
        let tool = env.fake_tool();
        let folder = env.root().join("ws");

        let status = std::process::Command::new(&tool)
            .args(["-f", &folder.to_string_lossy(), "new-profile"])
            .status()
            .unwrap();
        assert!(status.success());

        let status = std::process::Command::new(&tool)
            .args(["-f", &folder.to_string_lossy(), "add", "X", "-u"])
            .status()
            .unwrap();
        assert!(status.success());

        let profile: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(folder.join("default.json")).unwrap())
                .unwrap();
        assert_eq!(profile["notes"][0]["title"], "X");
        assert_eq!(profile["notes"][0]["status"], "Urgent");
    }
}
