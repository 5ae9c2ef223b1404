//! Command dispatching.
//!
//! Routes CLI subcommands to their implementations and normalizes their
//! outcomes into a [`CommandResult`] with an exit code.

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands, RunArgs};
use crate::config;
use crate::error::Result;
use crate::ui::Output;

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    project_root: PathBuf,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the given project root.
    pub fn new(project_root: PathBuf) -> Self {
        Self { project_root }
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Dispatch and execute a command.
    ///
    /// A bare invocation (no subcommand) runs the provisioning pipeline
    /// with default arguments.
    pub fn dispatch(&self, cli: &Cli, output: &Output) -> Result<CommandResult> {
        let config = config::load(&self.project_root, cli.config.as_deref())?;

        match &cli.command {
            Some(Commands::Run(args)) => {
                super::run::execute(&self.project_root, config, args, output)
            }
            Some(Commands::Status(args)) => {
                super::status::execute(&self.project_root, &config, args, output)
            }
            Some(Commands::Clean(args)) => {
                super::clean::execute(&self.project_root, &config, args, output)
            }
            Some(Commands::Completions(args)) => super::completions::execute(args),
            None => super::run::execute(&self.project_root, config, &RunArgs::default(), output),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_result_success() {
        let result = CommandResult::success();
        assert!(result.success);
        assert_eq!(result.exit_code, 0);
    }

    #[test]
    fn command_result_failure() {
        let result = CommandResult::failure(2);
        assert!(!result.success);
        assert_eq!(result.exit_code, 2);
    }

    #[test]
    fn dispatcher_stores_project_root() {
        let dispatcher = CommandDispatcher::new(PathBuf::from("/work"));
        assert_eq!(dispatcher.project_root(), Path::new("/work"));
    }
}
