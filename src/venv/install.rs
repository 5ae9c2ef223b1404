//! Dependency installation into a virtual environment.
//!
//! The requirements file is hashed after a successful install; when the
//! fingerprint matches on a later run the install step is reported as already
//! complete instead of re-invoking pip.

use crate::error::{Result, VenvStageError};
use crate::shell::{execute_streaming, CommandLine, CommandOptions, OutputCallback};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// Fingerprint file written inside the environment after a successful install.
const FINGERPRINT_FILE: &str = ".requirements.sha256";

/// Command line for upgrading pip inside the environment.
pub fn pip_upgrade_command(venv_python: &Path) -> CommandLine {
    CommandLine::new(
        venv_python.to_string_lossy(),
        &["-m", "pip", "install", "--upgrade", "pip"],
    )
}

/// Command line for installing from a requirements file.
pub fn pip_install_command(venv_python: &Path, requirements: &Path) -> CommandLine {
    CommandLine::new(
        venv_python.to_string_lossy(),
        &["-m", "pip", "install", "-r", &requirements.to_string_lossy()],
    )
}

/// SHA-256 fingerprint of a requirements file.
pub fn requirements_fingerprint(requirements: &Path) -> Result<String> {
    let content = fs::read(requirements)?;
    let digest = Sha256::digest(&content);
    Ok(hex::encode(digest))
}

/// Path of the stored fingerprint inside the environment.
pub fn fingerprint_path(venv_dir: &Path) -> PathBuf {
    venv_dir.join(FINGERPRINT_FILE)
}

/// Check whether the installed dependencies match the requirements file.
pub fn is_install_current(venv_dir: &Path, requirements: &Path) -> bool {
    let Ok(current) = requirements_fingerprint(requirements) else {
        return false;
    };
    fs::read_to_string(fingerprint_path(venv_dir))
        .map(|stored| stored.trim() == current)
        .unwrap_or(false)
}

/// Record the requirements fingerprint after a successful install.
pub fn record_fingerprint(venv_dir: &Path, requirements: &Path) -> Result<()> {
    let fingerprint = requirements_fingerprint(requirements)?;
    fs::write(fingerprint_path(venv_dir), fingerprint)?;
    Ok(())
}

/// Run a pip command with streaming output, mapping failure to
/// [`VenvStageError::InstallFailed`].
pub fn run_pip(
    command: &CommandLine,
    options: &CommandOptions,
    callback: OutputCallback,
) -> Result<()> {
    let result = execute_streaming(command, options, callback)?;
    if result.success {
        Ok(())
    } else {
        Err(VenvStageError::InstallFailed {
            message: format!(
                "{} exited with code {:?}: {}",
                command,
                result.exit_code,
                last_error_line(&result.stderr)
            ),
        })
    }
}

/// Last non-empty stderr line, for a compact error message.
fn last_error_line(stderr: &str) -> &str {
    stderr
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("no error output")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pip_upgrade_command_targets_venv_python() {
        let cmd = pip_upgrade_command(Path::new("slj/bin/python"));
        assert_eq!(
            cmd.to_string(),
            "slj/bin/python -m pip install --upgrade pip"
        );
    }

    #[test]
    fn pip_install_command_uses_requirements_file() {
        let cmd = pip_install_command(Path::new("slj/bin/python"), Path::new("requirements.txt"));
        assert_eq!(
            cmd.to_string(),
            "slj/bin/python -m pip install -r requirements.txt"
        );
    }

    #[test]
    fn fingerprint_is_stable() {
        let temp = tempfile::TempDir::new().unwrap();
        let req = temp.path().join("requirements.txt");
        fs::write(&req, "xxhash\nhumanize\n").unwrap();

        let a = requirements_fingerprint(&req).unwrap();
        let b = requirements_fingerprint(&req).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn fingerprint_changes_with_content() {
        let temp = tempfile::TempDir::new().unwrap();
        let req = temp.path().join("requirements.txt");

        fs::write(&req, "xxhash\n").unwrap();
        let before = requirements_fingerprint(&req).unwrap();

        fs::write(&req, "xxhash\nhumanize\n").unwrap();
        let after = requirements_fingerprint(&req).unwrap();

        assert_ne!(before, after);
    }

    #[test]
    fn fingerprint_of_missing_file_errors() {
        assert!(requirements_fingerprint(Path::new("/nonexistent/requirements.txt")).is_err());
    }

    #[test]
    fn install_current_roundtrip() {
        let temp = tempfile::TempDir::new().unwrap();
        let venv = temp.path().join("slj");
        fs::create_dir(&venv).unwrap();
        let req = temp.path().join("requirements.txt");
        fs::write(&req, "xxhash\n").unwrap();

        assert!(!is_install_current(&venv, &req));

        record_fingerprint(&venv, &req).unwrap();
        assert!(is_install_current(&venv, &req));

        fs::write(&req, "xxhash\nhumanize\n").unwrap();
        assert!(!is_install_current(&venv, &req));
    }

    #[test]
    fn install_not_current_when_requirements_missing() {
        let temp = tempfile::TempDir::new().unwrap();
        assert!(!is_install_current(
            temp.path(),
            Path::new("/nonexistent/requirements.txt")
        ));
    }

    #[test]
    fn last_error_line_skips_blanks() {
        assert_eq!(last_error_line("first\nsecond\n\n  \n"), "second");
        assert_eq!(last_error_line(""), "no error output");
    }
}
