//! Configuration file support.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::harness::{DEFAULT_EXECUTABLE, DEFAULT_TIMEOUT, Isolation};
use crate::infra::ProfileCodec;
use crate::infra::codec::{FIXTURE_ITERATIONS, FIXTURE_SALT_SEED};

/// Application configuration loaded from config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Note tool executable
    pub executable: Option<PathBuf>,

    /// JSON Schema for profiles
    pub schema: Option<PathBuf>,

    /// Fixture file with test suites
    pub fixtures: Option<PathBuf>,

    /// Per-invocation timeout in seconds, 0 disables
    pub timeout_secs: Option<u64>,

    /// Workspace isolation between test cases
    pub isolation: Option<Isolation>,

    #[serde(default)]
    pub codec: CodecConfig,
}

/// Key derivation parameters for encrypted profiles.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CodecConfig {
    /// Seed whose hex SHA-256 digest is the salt
    pub salt_seed: Option<String>,

    /// PBKDF2 rounds
    pub iterations: Option<u32>,
}

impl Config {
    /// Load configuration from `path`, or from the default location.
    ///
    /// A missing default file yields the default config; a missing explicit
    /// file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(path) => {
                if !path.exists() {
                    bail!("config file not found: {}", path.display());
                }
                path.to_path_buf()
            }
            None => {
                let default = Self::config_path();
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };

        let contents = std::fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read config file: {}", config_path.display()))?;

        Self::parse(&contents)
            .with_context(|| format!("failed to parse config file: {}", config_path.display()))
    }

    /// Parse configuration from TOML text.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        if config.codec.iterations == Some(0) {
            bail!("codec.iterations must be at least 1");
        }
        Ok(config)
    }

    /// Returns the path to the config file.
    ///
    /// Default: `~/.config/notecheck/config.toml`
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("notecheck")
            .join("config.toml")
    }

    /// Resolve the note tool executable.
    ///
    /// Precedence order:
    /// 1. CLI `--bin` argument
    /// 2. Config file `executable` setting
    /// 3. `target/theca`
    pub fn executable(&self, cli: Option<&PathBuf>) -> PathBuf {
        cli.cloned()
            .or_else(|| self.executable.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_EXECUTABLE))
    }

    /// Resolve the schema path; `None` means the built-in schema.
    pub fn schema(&self, cli: Option<&PathBuf>) -> Option<PathBuf> {
        cli.cloned().or_else(|| self.schema.clone())
    }

    /// Resolve the fixture path; `None` means the built-in suites.
    pub fn fixtures(&self, cli: Option<&PathBuf>) -> Option<PathBuf> {
        cli.cloned().or_else(|| self.fixtures.clone())
    }

    /// Resolve the per-invocation timeout. Zero disables it.
    pub fn timeout(&self, cli_secs: Option<u64>) -> Option<Duration> {
        match cli_secs.or(self.timeout_secs) {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => Some(DEFAULT_TIMEOUT),
        }
    }

    /// Resolve the workspace isolation.
    pub fn isolation(&self, cli: Option<Isolation>) -> Isolation {
        cli.or(self.isolation).unwrap_or_default()
    }

    /// Build the profile codec from the `[codec]` table.
    pub fn codec(&self) -> ProfileCodec {
        let seed = self.codec.salt_seed.as_deref().unwrap_or(FIXTURE_SALT_SEED);
        let iterations = self.codec.iterations.unwrap_or(FIXTURE_ITERATIONS);
        ProfileCodec::with_seed(seed, iterations)
    }
}
