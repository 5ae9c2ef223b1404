//! CLI subcommand implementations.

pub mod clean;
pub mod completions;
pub mod dispatcher;
pub mod run;
pub mod status;

pub use dispatcher::{CommandDispatcher, CommandResult};
