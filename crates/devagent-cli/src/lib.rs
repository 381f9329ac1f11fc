// Library interface for devagent-cli so integration tests can drive the
// command parser and the session loop without a terminal.

pub mod app;
pub mod commands;

pub use commands::{handle_command, CommandResult};
