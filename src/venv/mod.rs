//! Virtual environment management.
//!
//! A virtual environment is an isolated interpreter installation directory.
//! "Activation" in a shell mutates the caller's environment; here it is
//! modeled as an explicit overlay ([`ActivationEnv`]) applied to every child
//! process spawned after the environment is created, and "deactivation" is
//! the inverse overlay computed from the inherited environment.

pub mod install;

use crate::error::{Result, VenvStageError};
use crate::python::Interpreter;
use crate::shell::{execute, CommandLine, CommandOptions};
use std::env;
use std::path::{Path, PathBuf};

/// Marker file written by `python -m venv` into every environment.
const VENV_MARKER: &str = "pyvenv.cfg";

/// Directory holding the environment's executables.
pub fn scripts_dir(venv_dir: &Path) -> PathBuf {
    if cfg!(target_os = "windows") {
        venv_dir.join("Scripts")
    } else {
        venv_dir.join("bin")
    }
}

/// Path to the environment's interpreter.
pub fn python_path(venv_dir: &Path) -> PathBuf {
    if cfg!(target_os = "windows") {
        scripts_dir(venv_dir).join("python.exe")
    } else {
        scripts_dir(venv_dir).join("python")
    }
}

/// Check whether a directory looks like a virtual environment.
pub fn is_venv(path: &Path) -> bool {
    path.join(VENV_MARKER).is_file()
}

/// The environment currently active in the invoking shell, if any.
pub fn active_venv() -> Option<PathBuf> {
    env::var_os("VIRTUAL_ENV").map(PathBuf::from)
}

/// Remove an active environment's scripts directory from a PATH value.
///
/// This is the deactivation half of the overlay: child processes spawned
/// with the returned PATH resolve commands as if no environment were active.
pub fn deactivated_path(path: &str, active: Option<&Path>) -> String {
    let Some(active) = active else {
        return path.to_string();
    };

    let active_scripts = scripts_dir(active);
    let entries = env::split_paths(path).filter(|entry| *entry != active_scripts);
    env::join_paths(entries)
        .map(|joined| joined.to_string_lossy().to_string())
        .unwrap_or_else(|_| path.to_string())
}

/// Environment overlay that activates a virtual environment for child
/// processes: `VIRTUAL_ENV` set, scripts dir prepended to `PATH`,
/// `PYTHONHOME` removed.
#[derive(Debug, Clone)]
pub struct ActivationEnv {
    /// Absolute path of the activated environment.
    pub venv_dir: PathBuf,

    /// PATH value with the environment's scripts dir prepended.
    pub path_var: String,
}

impl ActivationEnv {
    /// Build the overlay for an environment on top of a base PATH.
    ///
    /// The base PATH should already be deactivated (see [`deactivated_path`]).
    pub fn new(venv_dir: &Path, base_path: &str) -> Self {
        let entries =
            std::iter::once(scripts_dir(venv_dir)).chain(env::split_paths(base_path));
        let path_var = env::join_paths(entries)
            .map(|joined| joined.to_string_lossy().to_string())
            .unwrap_or_else(|_| base_path.to_string());

        Self {
            venv_dir: venv_dir.to_path_buf(),
            path_var,
        }
    }

    /// Merge the overlay into command options.
    pub fn apply_to(&self, options: &mut CommandOptions) {
        options.env.insert(
            "VIRTUAL_ENV".to_string(),
            self.venv_dir.to_string_lossy().to_string(),
        );
        options.env.insert("PATH".to_string(), self.path_var.clone());
        options.env_remove.push("PYTHONHOME".to_string());
    }
}

/// Command line for creating a virtual environment.
///
/// No `--clear`: an existing directory is reused per the venv module's
/// default behavior.
pub fn create_command(interpreter: &Interpreter, venv_name: &str) -> CommandLine {
    CommandLine::new(interpreter.program.clone(), &["-m", "venv", venv_name])
}

/// Create a virtual environment in the project root.
pub fn create(
    interpreter: &Interpreter,
    project_root: &Path,
    venv_name: &str,
    options: &CommandOptions,
) -> Result<()> {
    let cmd = create_command(interpreter, venv_name);
    let mut options = options.clone();
    options.cwd = Some(project_root.to_path_buf());
    options.capture_stdout = true;
    options.capture_stderr = true;

    let result = execute(&cmd, &options)?;
    if result.success {
        Ok(())
    } else {
        Err(VenvStageError::VenvCreateFailed {
            path: project_root.join(venv_name),
            message: format!(
                "{} exited with code {:?}: {}",
                interpreter.program,
                result.exit_code,
                result.stderr.trim()
            ),
        })
    }
}
