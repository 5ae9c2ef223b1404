//! Configuration file discovery and loading.

use crate::config::schema::{ProjectConfig, SetupConfig};
use crate::error::{Result, VenvStageError};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file names checked at the project root, in order.
const CONFIG_NAMES: [&str; 2] = [".venvstage.yml", ".venvstage.yaml"];

/// Find the project config file, if one exists.
pub fn find_config(project_root: &Path) -> Option<PathBuf> {
    CONFIG_NAMES
        .iter()
        .map(|name| project_root.join(name))
        .find(|path| path.is_file())
}

/// Load a single config file and parse it into [`ProjectConfig`].
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<ProjectConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            VenvStageError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            VenvStageError::Io(e)
        }
    })?;

    serde_yaml::from_str(&content).map_err(|e| VenvStageError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load the resolved configuration for a project.
///
/// `explicit_path` (from `--config`) must exist; otherwise the project root
/// is searched and an absent file yields all defaults.
pub fn load(project_root: &Path, explicit_path: Option<&Path>) -> Result<SetupConfig> {
    let raw = match explicit_path {
        Some(path) => load_config_file(path)?,
        None => match find_config(project_root) {
            Some(path) => {
                tracing::debug!("loading config from {}", path.display());
                load_config_file(&path)?
            }
            None => ProjectConfig::default(),
        },
    };

    let config = SetupConfig::resolve(raw);
    config.validate()?;
    Ok(config)
}
