//! Configuration loading, parsing, and validation.

pub mod loader;
pub mod schema;

pub use loader::{find_config, load, load_config_file};
pub use schema::{
    ProjectConfig, SetupConfig, DEFAULT_ARCHIVE_DIR, DEFAULT_REQUIREMENTS, DEFAULT_SCRIPT,
    DEFAULT_VENV_NAME,
};
