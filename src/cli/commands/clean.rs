//! The `clean` command: remove the environment (and optionally the archive).

use std::fs;
use std::path::Path;

use crate::cli::args::CleanArgs;
use crate::cli::commands::dispatcher::CommandResult;
use crate::config::SetupConfig;
use crate::error::Result;
use crate::ui::Output;

/// Execute the `clean` command.
pub fn execute(
    project_root: &Path,
    config: &SetupConfig,
    args: &CleanArgs,
    output: &Output,
) -> Result<CommandResult> {
    let venv_dir = project_root.join(&config.venv_name);
    if venv_dir.is_dir() {
        fs::remove_dir_all(&venv_dir)?;
        output.success(&format!("removed {}", venv_dir.display()));
    } else {
        output.println(&format!("{} does not exist, nothing to do", venv_dir.display()));
    }

    if args.archive {
        let archive_dir = project_root.join(&config.archive_dir);
        if archive_dir.is_dir() {
            fs::remove_dir_all(&archive_dir)?;
            output.success(&format!("removed {}", archive_dir.display()));
        }
    }

    Ok(CommandResult::success())
}
