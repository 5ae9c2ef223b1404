//! venvstage - Python virtual environment provisioning and file staging.
//!
//! venvstage replaces an ad-hoc `setup.sh` with a single binary that
//! provisions a Python virtual environment, installs dependencies from a
//! requirements file, and moves the payload files into a hidden archive
//! directory.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, parsing, and validation
//! - [`error`] - Error types and result aliases
//! - [`python`] - Python interpreter discovery
//! - [`shell`] - Child process execution
//! - [`stage`] - File relocation into the archive directory
//! - [`ui`] - Terminal output, theme, and spinners
//! - [`venv`] - Virtual environment creation, activation, and installs
//! - [`workflow`] - The linear provisioning pipeline

pub mod cli;
pub mod config;
pub mod error;
pub mod python;
pub mod shell;
pub mod stage;
pub mod ui;
pub mod venv;
pub mod workflow;

pub use error::{Result, VenvStageError};
