//! Test harness for CLI integration tests.
//!
//! Provides isolated test environments, a scripted stand-in for the note
//! tool, and CLI assertion helpers using `assert_cmd`.

mod command;
mod env;
mod fake_tool;

// Re-export main types for external use
#[allow(unused_imports)]
pub use command::NotecheckCommand;
#[allow(unused_imports)]
pub use env::TestEnv;
#[allow(unused_imports)]
pub use fake_tool::FAKE_TOOL_SCRIPT;
