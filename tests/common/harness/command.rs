//! Fluent wrapper around assert_cmd::Command.

// Allow dead code since each test binary uses a different subset
#![allow(dead_code)]

use assert_cmd::Command;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Fluent wrapper around `assert_cmd::Command` for the `notecheck` binary.
///
/// Provides a builder-style API for constructing and executing CLI commands.
pub struct NotecheckCommand {
    args: Vec<String>,
    config_home: Option<PathBuf>,
}

impl NotecheckCommand {
    /// Creates a new command for the `notecheck` binary.
    pub fn new() -> Self {
        Self {
            args: Vec::new(),
            config_home: None,
        }
    }

    /// Points the default config location at `dir` so the user's own
    /// config is never read.
    pub fn config_home(mut self, dir: &Path) -> Self {
        self.config_home = Some(dir.to_path_buf());
        self
    }

    /// Sets the `--config` option.
    pub fn config(self, path: &Path) -> Self {
        self.args(["--config", &path.to_string_lossy()])
    }

    /// Adds arguments to the command.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args
            .extend(args.into_iter().map(|s| s.as_ref().to_string()));
        self
    }

    /// Returns the current arguments (for testing).
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Runs the command and returns an Assert for making assertions.
    #[allow(deprecated)]
    pub fn assert(self) -> assert_cmd::assert::Assert {
        let mut cmd = Command::cargo_bin("notecheck").expect("Failed to find notecheck binary");
        cmd.args(&self.args);
        cmd.env_remove("RUST_LOG");
        if let Some(dir) = &self.config_home {
            cmd.env("XDG_CONFIG_HOME", dir);
            cmd.env("HOME", dir);
        }
        cmd.assert()
    }

    /// Runs the command, expects success, and returns stdout as a string.
    pub fn output_success(self) -> String {
        let output = self.assert().success().get_output().stdout.clone();
        String::from_utf8(output).expect("Output was not valid UTF-8")
    }

    /// Runs the command, expects success, and parses stdout as JSON.
    pub fn output_json<T: DeserializeOwned>(self) -> T {
        let output = self.output_success();
        serde_json::from_str(&output).expect("Failed to parse output as JSON")
    }

    /// Runs the command, expects failure, and parses stdout as JSON.
    pub fn output_json_failure<T: DeserializeOwned>(self) -> T {
        let output = self.assert().failure().get_output().stdout.clone();
        serde_json::from_slice(&output).expect("Failed to parse output as JSON")
    }

    // ===========================================
    // Command Shortcuts
    // ===========================================

    /// Configures for the `run` command.
    pub fn run(self) -> Self {
        self.args(["run"])
    }

    /// Configures for the `list` command.
    pub fn list(self) -> Self {
        self.args(["list"])
    }

    /// Configures for the `decrypt` command.
    pub fn decrypt(self, file: &Path, passphrase: &str) -> Self {
        self.args(["decrypt", &file.to_string_lossy(), "-k", passphrase])
    }

    /// Configures for the `check` command.
    pub fn check(self, file: &Path) -> Self {
        self.args(["check", &file.to_string_lossy()])
    }

    // ===========================================
    // Run Options
    // ===========================================

    /// Adds `--bin <path>`.
    pub fn bin(self, path: &Path) -> Self {
        self.args(["--bin", &path.to_string_lossy()])
    }

    /// Adds `--fixtures <path>`.
    pub fn fixtures(self, path: &Path) -> Self {
        self.args(["--fixtures", &path.to_string_lossy()])
    }

    /// Adds `--filter <regex>`.
    pub fn filter(self, pattern: &str) -> Self {
        self.args(["--filter", pattern])
    }

    /// Adds `--format json` to the command.
    pub fn format_json(self) -> Self {
        self.args(["--format", "json"])
    }
}

impl Default for NotecheckCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_runs_binary() {
        NotecheckCommand::new().args(["--help"]).assert().success();
    }

    #[test]
    fn test_command_shortcuts() {
        let cmd = NotecheckCommand::new()
            .run()
            .bin(Path::new("/bin/theca"))
            .format_json();
        let args = cmd.get_args();
        assert_eq!(args, ["run", "--bin", "/bin/theca", "--format", "json"]);
    }
}
