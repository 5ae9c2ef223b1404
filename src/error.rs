//! Error types for venvstage operations.
//!
//! This module defines [`VenvStageError`], the primary error type used
//! throughout the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `VenvStageError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `VenvStageError::Other`) for unexpected errors
//! - All errors should provide actionable messages for users

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for venvstage operations.
#[derive(Debug, Error)]
pub enum VenvStageError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// No usable Python interpreter could be found.
    #[error("No Python interpreter found (tried: {tried})")]
    PythonNotFound { tried: String },

    /// Child process failed.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// Virtual environment creation failed.
    #[error("Failed to create virtual environment at {path}: {message}")]
    VenvCreateFailed { path: PathBuf, message: String },

    /// Dependency installation failed.
    #[error("Dependency installation failed: {message}")]
    InstallFailed { message: String },

    /// Moving a file into the archive directory failed.
    #[error("Failed to stage {path}: {message}")]
    StageFailed { path: PathBuf, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for venvstage operations.
pub type Result<T> = std::result::Result<T, VenvStageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_not_found_displays_path() {
        let err = VenvStageError::ConfigNotFound {
            path: PathBuf::from("/foo/.venvstage.yml"),
        };
        assert!(err.to_string().contains("/foo/.venvstage.yml"));
    }

    #[test]
    fn config_parse_error_displays_path_and_message() {
        let err = VenvStageError::ConfigParseError {
            path: PathBuf::from("/config.yml"),
            message: "invalid syntax".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/config.yml"));
        assert!(msg.contains("invalid syntax"));
    }

    #[test]
    fn python_not_found_displays_candidates() {
        let err = VenvStageError::PythonNotFound {
            tried: "python3, python".into(),
        };
        assert!(err.to_string().contains("python3, python"));
    }

    #[test]
    fn command_failed_displays_command_and_code() {
        let err = VenvStageError::CommandFailed {
            command: "python3 -m venv slj".into(),
            code: Some(1),
        };
        let msg = err.to_string();
        assert!(msg.contains("python3 -m venv slj"));
        assert!(msg.contains("1"));
    }

    #[test]
    fn venv_create_failed_displays_path() {
        let err = VenvStageError::VenvCreateFailed {
            path: PathBuf::from("slj"),
            message: "interpreter exited with code 1".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("slj"));
        assert!(msg.contains("interpreter exited"));
    }

    #[test]
    fn install_failed_displays_message() {
        let err = VenvStageError::InstallFailed {
            message: "pip exited with code 1".into(),
        };
        assert!(err.to_string().contains("pip exited with code 1"));
    }

    #[test]
    fn stage_failed_displays_path_and_message() {
        let err = VenvStageError::StageFailed {
            path: PathBuf::from("DuplicateDetective.py"),
            message: "permission denied".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("DuplicateDetective.py"));
        assert!(msg.contains("permission denied"));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: VenvStageError = io_err.into();
        assert!(matches!(err, VenvStageError::Io(_)));
    }

    #[test]
    fn result_type_alias_works() {
        fn returns_error() -> Result<()> {
            Err(VenvStageError::ConfigValidationError {
                message: "test".into(),
            })
        }
        assert!(returns_error().is_err());
    }
}
