//! notecheck - black-box acceptance tests for the theca note tool

pub mod cli;
pub mod domain;
pub mod harness;
pub mod infra;

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use cli::{
    Cli, Command,
    config::Config,
    handlers::{handle_check, handle_completions, handle_decrypt, handle_list, handle_run},
};

/// Main entry point for the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;

    match &cli.command {
        Command::Run(args) => handle_run(args, &config, cli.format),
        Command::List(args) => handle_list(args, &config, cli.format),
        Command::Decrypt(args) => handle_decrypt(args, &config),
        Command::Check(args) => handle_check(args, &config, cli.format),
        Command::Completions(args) => handle_completions(args),
    }
}

/// Log level for a `-v` count; `RUST_LOG` takes precedence.
fn default_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Logs go to stderr so stdout carries only the report.
fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbose)));

    // Ignore a second initialization.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(std::io::stderr().is_terminal())
                .with_writer(std::io::stderr),
        )
        .try_init();
}
