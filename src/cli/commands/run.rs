//! The `run` command: the provisioning pipeline.

use std::path::Path;

use crate::cli::args::RunArgs;
use crate::cli::commands::dispatcher::CommandResult;
use crate::config::SetupConfig;
use crate::error::Result;
use crate::ui::Output;
use crate::venv;
use crate::workflow::{self, SetupContext};

/// Execute the provisioning pipeline.
pub fn execute(
    project_root: &Path,
    mut config: SetupConfig,
    args: &RunArgs,
    output: &Output,
) -> Result<CommandResult> {
    if let Some(python) = &args.python {
        config.python = Some(python.clone());
    }

    let ctx = SetupContext {
        project_root: project_root.to_path_buf(),
        config,
        dry_run: args.dry_run,
        force_reinstall: args.force_reinstall,
        skip_stage: args.skip_stage,
    };

    output.header(&format!(
        "Provisioning environment '{}'",
        ctx.config.venv_name
    ));
    if ctx.dry_run {
        output.println("dry-run mode: commands are printed, nothing is executed");
    }

    let results = workflow::run_setup(&ctx, output)?;

    output.println("");
    for result in &results {
        tracing::debug!("step {}: {}", result.name, result.status());
    }
    let completed = results.iter().filter(|r| !r.skipped).count();
    let skipped = results.len() - completed;
    output.success(&format!(
        "Setup complete! {} step(s) run, {} skipped",
        completed, skipped
    ));
    if !ctx.dry_run {
        output.println(&format!("  {}", activation_hint(&ctx.config.venv_name)));
    }

    Ok(CommandResult::success())
}

/// Shell invocation that activates the environment, for the closing hint.
fn activation_hint(venv_name: &str) -> String {
    let activate = venv::scripts_dir(Path::new(venv_name)).join("activate");
    if cfg!(target_os = "windows") {
        format!("activate with: {}", activate.display())
    } else {
        format!("activate with: source {}", activate.display())
    }
}
