//! CLI command definitions and handlers

pub mod config;
pub mod handlers;
pub mod output;

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::harness::Isolation;
use output::OutputFormat;

/// notecheck - acceptance tests for the theca note tool
#[derive(Parser, Debug)]
#[command(name = "notecheck", version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.config/notecheck/config.toml)
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the test suites against the note tool
    Run(RunArgs),

    /// List suites and test cases
    List(ListArgs),

    /// Decrypt an encrypted profile and print its JSON
    Decrypt(DecryptArgs),

    /// Validate a single profile file
    Check(CheckArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Path to the note tool executable
    #[arg(long = "bin", value_name = "EXE")]
    pub executable: Option<PathBuf>,

    /// JSON Schema for profiles (default: built in)
    #[arg(long)]
    pub schema: Option<PathBuf>,

    /// Fixture file with test suites (default: built in)
    #[arg(long)]
    pub fixtures: Option<PathBuf>,

    /// Per-invocation timeout in seconds (0 disables)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Workspace isolation between test cases
    #[arg(long, value_enum)]
    pub isolation: Option<Isolation>,

    /// Only run test cases whose name matches this regex
    #[arg(long, value_name = "REGEX")]
    pub filter: Option<String>,
}

/// Arguments for the `list` command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Fixture file with test suites (default: built in)
    #[arg(long)]
    pub fixtures: Option<PathBuf>,

    /// Only list test cases whose name matches this regex
    #[arg(long, value_name = "REGEX")]
    pub filter: Option<String>,
}

/// Arguments for the `decrypt` command
#[derive(Parser, Debug)]
pub struct DecryptArgs {
    /// Encrypted profile file
    pub file: PathBuf,

    /// Passphrase
    #[arg(short = 'k', long = "key")]
    pub passphrase: String,
}

/// Arguments for the `check` command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Profile file
    pub file: PathBuf,

    /// Passphrase, for encrypted profiles
    #[arg(short = 'k', long = "key")]
    pub passphrase: Option<String>,

    /// JSON Schema for profiles (default: built in)
    #[arg(long)]
    pub schema: Option<PathBuf>,
}

/// Arguments for the `completions` command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for (bash, zsh, fish)
    #[arg(value_enum)]
    pub shell: Shell,
}
