//! Child process execution and environment helpers.

pub mod command;

pub use command::{
    execute, execute_streaming, CommandLine, CommandOptions, CommandResult, OutputCallback,
    OutputLine,
};

/// Check if running in a CI environment.
///
/// Used to disable spinner animation, which garbles CI log output.
pub fn is_ci() -> bool {
    const CI_VARS: [&str; 5] = ["CI", "GITHUB_ACTIONS", "GITLAB_CI", "CIRCLECI", "TRAVIS"];
    CI_VARS.iter().any(|var| std::env::var(var).is_ok())
}
