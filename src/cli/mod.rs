//! Command-line interface and argument parsing.

pub mod args;
pub mod commands;

pub use args::{Cli, CleanArgs, Commands, CompletionsArgs, RunArgs, StatusArgs};
pub use commands::{CommandDispatcher, CommandResult};
