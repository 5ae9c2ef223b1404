//! The `status` command: report environment and archive state.

use std::path::Path;

use serde::Serialize;

use crate::cli::args::StatusArgs;
use crate::cli::commands::dispatcher::CommandResult;
use crate::config::SetupConfig;
use crate::error::Result;
use crate::ui::Output;
use crate::venv::{self, install};

/// Machine-readable status report.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    /// Virtual environment directory.
    pub venv_path: String,

    /// Whether the directory exists.
    pub venv_exists: bool,

    /// Whether it looks like a real environment (pyvenv.cfg present).
    pub venv_valid: bool,

    /// Whether the requirements file is present at the project root.
    pub requirements_present: bool,

    /// Whether installed dependencies match the requirements fingerprint.
    pub install_current: bool,

    /// Archive directory.
    pub archive_dir: String,

    /// Whether the archive directory exists.
    pub archive_exists: bool,

    /// Per-file staging state.
    pub staged: Vec<StagedFile>,
}

/// Staging state of one payload file.
#[derive(Debug, Serialize)]
pub struct StagedFile {
    /// File name as configured.
    pub name: String,

    /// Present at the project root (not yet staged).
    pub at_root: bool,

    /// Present in the archive directory.
    pub archived: bool,
}

/// Gather the status report for a project.
pub fn gather(project_root: &Path, config: &SetupConfig) -> StatusReport {
    let venv_dir = project_root.join(&config.venv_name);
    let requirements = project_root.join(&config.requirements);
    let archive_dir = project_root.join(&config.archive_dir);

    let staged = config
        .stage
        .iter()
        .map(|file| {
            let file_name = file
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| file.to_string_lossy().to_string());
            StagedFile {
                at_root: project_root.join(file).exists(),
                archived: archive_dir.join(&file_name).exists(),
                name: file.to_string_lossy().to_string(),
            }
        })
        .collect();

    StatusReport {
        venv_path: venv_dir.to_string_lossy().to_string(),
        venv_exists: venv_dir.is_dir(),
        venv_valid: venv::is_venv(&venv_dir),
        requirements_present: requirements.is_file(),
        install_current: install::is_install_current(&venv_dir, &requirements),
        archive_dir: archive_dir.to_string_lossy().to_string(),
        archive_exists: archive_dir.is_dir(),
        staged,
    }
}

/// Execute the `status` command.
pub fn execute(
    project_root: &Path,
    config: &SetupConfig,
    args: &StatusArgs,
    output: &Output,
) -> Result<CommandResult> {
    let report = gather(project_root, config);

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).map_err(anyhow::Error::from)?
        );
        return Ok(CommandResult::success());
    }

    let theme = output.theme();
    output.header("Environment status");

    let venv_line = if report.venv_valid {
        theme.format_success(&format!("venv {}", report.venv_path))
    } else if report.venv_exists {
        theme.format_warning(&format!("venv {} (not a virtual environment)", report.venv_path))
    } else {
        theme.format_skipped(&format!("venv {} (not created)", report.venv_path))
    };
    output.println(&venv_line);

    let deps_line = if report.install_current {
        theme.format_success("dependencies up to date")
    } else if report.requirements_present {
        theme.format_warning("dependencies not installed or out of date")
    } else {
        theme.format_skipped("no requirements file")
    };
    output.println(&deps_line);

    let archive_line = if report.archive_exists {
        theme.format_success(&format!("archive {}", report.archive_dir))
    } else {
        theme.format_skipped(&format!("archive {} (not created)", report.archive_dir))
    };
    output.println(&archive_line);

    for file in &report.staged {
        let line = if file.archived {
            theme.format_success(&format!("{} (archived)", file.name))
        } else if file.at_root {
            theme.format_skipped(&format!("{} (at project root)", file.name))
        } else {
            theme.format_warning(&format!("{} (missing)", file.name))
        };
        output.println(&line);
    }

    Ok(CommandResult::success())
}
