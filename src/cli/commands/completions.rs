//! The `completions` command: generate shell completion scripts.

use clap::CommandFactory;
use clap_complete::generate;

use crate::cli::args::{Cli, CompletionsArgs};
use crate::cli::commands::dispatcher::CommandResult;
use crate::error::Result;

/// Execute the `completions` command.
pub fn execute(args: &CompletionsArgs) -> Result<CommandResult> {
    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, "venvstage", &mut std::io::stdout());
    Ok(CommandResult::success())
}
