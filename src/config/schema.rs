//! Configuration schema.
//!
//! The project config file is optional; every field has a default matching
//! the bare-invocation contract: venv `slj`, dependencies from
//! `requirements.txt`, and `DuplicateDetective.py` plus the requirements
//! file staged into `.tmp`.

use crate::error::{Result, VenvStageError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default virtual environment name.
pub const DEFAULT_VENV_NAME: &str = "slj";

/// Default requirements file.
pub const DEFAULT_REQUIREMENTS: &str = "requirements.txt";

/// Default archive directory.
pub const DEFAULT_ARCHIVE_DIR: &str = ".tmp";

/// Default payload script staged alongside the requirements file.
pub const DEFAULT_SCRIPT: &str = "DuplicateDetective.py";

/// Raw project configuration as parsed from `.venvstage.yml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Name of the virtual environment directory.
    pub venv_name: Option<String>,

    /// Interpreter override (name or path).
    pub python: Option<String>,

    /// Requirements file, relative to the project root.
    pub requirements: Option<PathBuf>,

    /// Archive directory, relative to the project root.
    pub archive_dir: Option<PathBuf>,

    /// Files to move into the archive directory.
    pub stage: Option<Vec<PathBuf>>,
}

/// Fully resolved configuration with defaults applied.
#[derive(Debug, Clone)]
pub struct SetupConfig {
    pub venv_name: String,
    pub python: Option<String>,
    pub requirements: PathBuf,
    pub archive_dir: PathBuf,
    pub stage: Vec<PathBuf>,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self::resolve(ProjectConfig::default())
    }
}

impl SetupConfig {
    /// Apply defaults to a raw project config.
    pub fn resolve(raw: ProjectConfig) -> Self {
        Self {
            venv_name: raw
                .venv_name
                .unwrap_or_else(|| DEFAULT_VENV_NAME.to_string()),
            python: raw.python,
            requirements: raw
                .requirements
                .unwrap_or_else(|| PathBuf::from(DEFAULT_REQUIREMENTS)),
            archive_dir: raw
                .archive_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ARCHIVE_DIR)),
            stage: raw.stage.unwrap_or_else(|| {
                vec![
                    PathBuf::from(DEFAULT_SCRIPT),
                    PathBuf::from(DEFAULT_REQUIREMENTS),
                ]
            }),
        }
    }

    /// Validate resolved values.
    pub fn validate(&self) -> Result<()> {
        if self.venv_name.is_empty() {
            return Err(VenvStageError::ConfigValidationError {
                message: "venv_name must not be empty".to_string(),
            });
        }
        if self.venv_name.contains(['/', '\\']) {
            return Err(VenvStageError::ConfigValidationError {
                message: format!(
                    "venv_name '{}' must be a directory name, not a path",
                    self.venv_name
                ),
            });
        }
        if self.archive_dir.as_os_str().is_empty() {
            return Err(VenvStageError::ConfigValidationError {
                message: "archive_dir must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
