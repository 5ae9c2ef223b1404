//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// venvstage - Python virtual environment provisioning and file staging.
#[derive(Debug, Parser)]
#[command(name = "venvstage")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides default .venvstage.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Provision the environment and stage files (default if no command specified)
    Run(RunArgs),

    /// Show environment and archive status
    Status(StatusArgs),

    /// Remove the virtual environment
    Clean(CleanArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RunArgs {
    /// Preview commands without executing
    #[arg(long)]
    pub dry_run: bool,

    /// Reinstall dependencies even if the requirements file is unchanged
    #[arg(long)]
    pub force_reinstall: bool,

    /// Stop after installation; do not move files into the archive
    #[arg(long)]
    pub skip_stage: bool,

    /// Python interpreter to seed the environment (name or path)
    #[arg(long, value_name = "PYTHON", env = "VENVSTAGE_PYTHON")]
    pub python: Option<String>,
}

/// Arguments for the `status` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `clean` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CleanArgs {
    /// Also remove the archive directory
    #[arg(long)]
    pub archive: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_verifies() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bare_invocation_has_no_subcommand() {
        let cli = Cli::parse_from(["venvstage"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn run_flags_parse() {
        let cli = Cli::parse_from([
            "venvstage",
            "run",
            "--dry-run",
            "--force-reinstall",
            "--python",
            "python3.11",
        ]);
        match cli.command {
            Some(Commands::Run(args)) => {
                assert!(args.dry_run);
                assert!(args.force_reinstall);
                assert!(!args.skip_stage);
                assert_eq!(args.python.as_deref(), Some("python3.11"));
            }
            _ => panic!("expected run subcommand"),
        }
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::parse_from(["venvstage", "status", "--json", "--quiet"]);
        assert!(cli.quiet);
        match cli.command {
            Some(Commands::Status(args)) => assert!(args.json),
            _ => panic!("expected status subcommand"),
        }
    }
}
