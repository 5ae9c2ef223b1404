//! The provisioning pipeline.
//!
//! Execution is strictly linear: deactivate any active environment, create
//! the new one, activate it, upgrade pip, install dependencies, create the
//! archive directory, and move the payload files into it. Every step returns
//! `Result`; the first failed step aborts the pipeline with a non-zero exit,
//! replacing the continue-on-error behavior a shell would give.

use crate::config::SetupConfig;
use crate::error::Result;
use crate::python::{self, Interpreter};
use crate::shell::{self, CommandLine, CommandOptions, OutputLine};
use crate::stage;
use crate::ui::{format_duration, live_output_callback, Output, ProgressSpinner};
use crate::venv::{self, install, ActivationEnv};
use std::env;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Status of a step in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// Step completed successfully.
    Completed,

    /// Step failed.
    Failed,

    /// Step was skipped (already complete or nothing to do).
    Skipped,
}

impl StepStatus {
    /// Get a display character for this status.
    pub fn display_char(&self) -> char {
        match self {
            StepStatus::Completed => '✓',
            StepStatus::Failed => '✗',
            StepStatus::Skipped => '⊘',
        }
    }
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StepStatus::Completed => "completed",
            StepStatus::Failed => "failed",
            StepStatus::Skipped => "skipped",
        };
        write!(f, "{}", s)
    }
}

/// Result of executing a pipeline step.
#[derive(Debug, Clone)]
pub struct StepResult {
    /// Step name.
    pub name: String,

    /// Whether the step succeeded (skipped counts as success).
    pub success: bool,

    /// Execution duration.
    pub duration: Duration,

    /// Whether the step was skipped.
    pub skipped: bool,

    /// Human-readable detail (e.g., "already satisfied").
    pub detail: Option<String>,
}

impl StepResult {
    /// Create a success result.
    pub fn success(name: &str, duration: Duration, detail: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            success: true,
            duration,
            skipped: false,
            detail,
        }
    }

    /// Create a skipped result.
    pub fn skipped(name: &str, detail: &str) -> Self {
        Self {
            name: name.to_string(),
            success: true,
            duration: Duration::ZERO,
            skipped: true,
            detail: Some(detail.to_string()),
        }
    }

    /// Get the status of this result.
    pub fn status(&self) -> StepStatus {
        if self.skipped {
            StepStatus::Skipped
        } else if self.success {
            StepStatus::Completed
        } else {
            StepStatus::Failed
        }
    }

    /// Generate a summary line for display.
    pub fn summary_line(&self) -> String {
        let status = self.status();
        match status {
            StepStatus::Completed => format!(
                "{} {} ({})",
                status.display_char(),
                self.name,
                format_duration(self.duration)
            ),
            StepStatus::Skipped => {
                let detail = self.detail.as_deref().unwrap_or("skipped");
                format!("{} {} ({})", status.display_char(), self.name, detail)
            }
            StepStatus::Failed => format!("{} {}", status.display_char(), self.name),
        }
    }
}

/// Resolved inputs for a pipeline run.
#[derive(Debug, Clone)]
pub struct SetupContext {
    /// Directory containing the requirements file and payload script.
    pub project_root: PathBuf,

    /// Resolved configuration.
    pub config: SetupConfig,

    /// Print planned commands without executing anything.
    pub dry_run: bool,

    /// Reinstall dependencies even when the fingerprint matches.
    pub force_reinstall: bool,

    /// Stop after installation; leave files in place.
    pub skip_stage: bool,
}

impl SetupContext {
    /// Absolute path of the virtual environment directory.
    pub fn venv_dir(&self) -> PathBuf {
        self.project_root.join(&self.config.venv_name)
    }

    /// Absolute path of the requirements file.
    pub fn requirements_path(&self) -> PathBuf {
        self.project_root.join(&self.config.requirements)
    }

    /// Absolute path of the archive directory.
    pub fn archive_dir(&self) -> PathBuf {
        self.project_root.join(&self.config.archive_dir)
    }
}

struct StepRunner<'a> {
    output: &'a Output,
    show_spinners: bool,
}

enum StepOutcome {
    Done(Option<String>),
    Skipped(String),
}

impl<'a> StepRunner<'a> {
    fn new(output: &'a Output, dry_run: bool) -> Self {
        Self {
            output,
            show_spinners: output.mode().shows_spinners() && !dry_run && !shell::is_ci(),
        }
    }

    /// Run one step behind a spinner, translating the outcome into a
    /// [`StepResult`] and finishing the spinner accordingly.
    fn run<F>(&self, name: &str, description: &str, body: F) -> Result<StepResult>
    where
        F: FnOnce(&ProgressSpinner) -> Result<StepOutcome>,
    {
        let spinner = if self.show_spinners {
            ProgressSpinner::new(&format!("{} - {}", name, description))
        } else {
            ProgressSpinner::hidden()
        };

        let start = Instant::now();
        let theme = self.output.theme();

        match body(&spinner) {
            Ok(StepOutcome::Done(detail)) => {
                let duration = start.elapsed();
                let msg = format!("{} ({})", name, format_duration(duration));
                if self.show_spinners {
                    spinner.finish_success(theme, &msg);
                } else {
                    self.output.println(&theme.format_success(&msg));
                }
                Ok(StepResult::success(name, duration, detail))
            }
            Ok(StepOutcome::Skipped(detail)) => {
                let msg = format!("{} ({})", name, detail);
                if self.show_spinners {
                    spinner.finish_skipped(theme, &msg);
                } else {
                    self.output.println(&theme.format_skipped(&msg));
                }
                Ok(StepResult::skipped(name, &detail))
            }
            Err(e) => {
                if self.show_spinners {
                    spinner.finish_error(theme, name);
                }
                Err(e)
            }
        }
    }
}

/// Run the full provisioning pipeline.
///
/// Returns the per-step results, or the first step error.
pub fn run_setup(ctx: &SetupContext, output: &Output) -> Result<Vec<StepResult>> {
    let runner = StepRunner::new(output, ctx.dry_run);
    let mut results = Vec::new();

    // Step 1: deactivate any active environment. The overlay is computed
    // from the inherited environment; nothing is mutated in this process.
    let inherited_path = env::var("PATH").unwrap_or_default();
    let active = venv::active_venv();
    let base_path = venv::deactivated_path(&inherited_path, active.as_deref());

    results.push(runner.run("deactivate", "release any active environment", |_| {
        match &active {
            Some(path) => {
                tracing::debug!("deactivating {}", path.display());
                Ok(StepOutcome::Done(Some(format!(
                    "deactivated {}",
                    path.display()
                ))))
            }
            None => Ok(StepOutcome::Skipped("no active environment".to_string())),
        }
    })?);

    let mut base_options = CommandOptions::default();
    base_options.cwd = Some(ctx.project_root.clone());
    base_options
        .env
        .insert("PATH".to_string(), base_path.clone());
    base_options.env_remove.push("VIRTUAL_ENV".to_string());
    base_options.env_remove.push("PYTHONHOME".to_string());

    // Step 2: create the virtual environment.
    let interpreter = if ctx.dry_run {
        Interpreter::unprobed(ctx.config.python.as_deref())
    } else {
        python::discover(ctx.config.python.as_deref())?
    };
    let venv_dir = ctx.venv_dir();

    results.push(runner.run(
        "create-venv",
        &format!("create environment '{}'", ctx.config.venv_name),
        |_| {
            let cmd = venv::create_command(&interpreter, &ctx.config.venv_name);
            if ctx.dry_run {
                preview(output, &cmd);
                return Ok(StepOutcome::Done(None));
            }
            venv::create(
                &interpreter,
                &ctx.project_root,
                &ctx.config.venv_name,
                &base_options,
            )?;
            Ok(StepOutcome::Done(Some(format!(
                "created {}",
                venv_dir.display()
            ))))
        },
    )?);

    // Step 3: activate. Subsequent child processes see VIRTUAL_ENV, the
    // venv's scripts dir at the front of PATH, and no PYTHONHOME.
    let activation = ActivationEnv::new(&venv_dir, &base_path);
    let mut activated_options = base_options.clone();
    activation.apply_to(&mut activated_options);

    results.push(runner.run("activate", "build activation environment", |_| {
        Ok(StepOutcome::Done(Some(format!(
            "VIRTUAL_ENV={}",
            venv_dir.display()
        ))))
    })?);

    let venv_python = venv::python_path(&venv_dir);

    // Step 4: upgrade pip inside the environment.
    results.push(runner.run("upgrade-pip", "upgrade pip to latest", |spinner| {
        let cmd = install::pip_upgrade_command(&venv_python);
        if ctx.dry_run {
            preview(output, &cmd);
            return Ok(StepOutcome::Done(None));
        }
        install::run_pip(
            &cmd,
            &activated_options,
            pip_callback(output, spinner, "upgrade-pip - upgrade pip to latest"),
        )?;
        Ok(StepOutcome::Done(None))
    })?);

    // Step 5: install dependencies. A missing requirements file skips the
    // step (environment creation does not depend on it); a matching
    // fingerprint skips the reinstall unless forced.
    let requirements = ctx.requirements_path();
    results.push(runner.run("install-deps", "install requirements", |spinner| {
        let cmd = install::pip_install_command(&venv_python, &ctx.config.requirements);
        if ctx.dry_run {
            preview(output, &cmd);
            return Ok(StepOutcome::Done(None));
        }
        if !requirements.is_file() {
            tracing::warn!("requirements file {} not found", requirements.display());
            return Ok(StepOutcome::Skipped(format!(
                "{} not found",
                ctx.config.requirements.display()
            )));
        }
        if !ctx.force_reinstall && install::is_install_current(&venv_dir, &requirements) {
            return Ok(StepOutcome::Skipped("already satisfied".to_string()));
        }
        install::run_pip(
            &cmd,
            &activated_options,
            pip_callback(output, spinner, "install-deps - install requirements"),
        )?;
        install::record_fingerprint(&venv_dir, &requirements)?;
        Ok(StepOutcome::Done(None))
    })?);

    // Step 6: create the archive directory.
    let archive_dir = ctx.archive_dir();
    results.push(runner.run("archive-dir", "create archive directory", |_| {
        if ctx.dry_run {
            output
                .println(&output.theme().format_command(&format!(
                    "mkdir -p {}",
                    ctx.config.archive_dir.display()
                )));
            return Ok(StepOutcome::Done(None));
        }
        stage::ensure_archive_dir(&archive_dir)?;
        Ok(StepOutcome::Done(None))
    })?);

    // Step 7: move the payload files.
    if ctx.skip_stage {
        results.push(StepResult::skipped("stage-files", "skipped by flag"));
        output
            .println(&output.theme().format_skipped("stage-files (skipped by flag)"));
        return Ok(results);
    }

    let sources: Vec<PathBuf> = ctx
        .config
        .stage
        .iter()
        .map(|file| ctx.project_root.join(file))
        .collect();

    results.push(runner.run("stage-files", "move files into archive", |_| {
        if ctx.dry_run {
            for source in &sources {
                output.println(&output.theme().format_command(&format!(
                    "mv {} {}",
                    source.display(),
                    archive_dir.display()
                )));
            }
            return Ok(StepOutcome::Done(None));
        }

        let outcomes = stage::stage_files(&sources, &archive_dir)?;
        let mut moved = 0;
        for outcome in &outcomes {
            match outcome {
                stage::StageOutcome::Moved { from, .. } => {
                    tracing::debug!("staged {}", from.display());
                    moved += 1;
                }
                stage::StageOutcome::MissingSource { path } => {
                    output.warning(&format!("{} not found, nothing to stage", path.display()));
                }
            }
        }
        if moved == 0 {
            Ok(StepOutcome::Skipped("nothing to move".to_string()))
        } else {
            Ok(StepOutcome::Done(Some(format!("{} file(s) moved", moved))))
        }
    })?);

    Ok(results)
}

/// Print a planned command in dry-run mode.
fn preview(output: &Output, cmd: &CommandLine) {
    output.println(&output.theme().format_command(&cmd.to_string()));
}

/// Streaming callback for pip: raw lines in verbose mode, live spinner
/// tail otherwise.
fn pip_callback(
    output: &Output,
    spinner: &ProgressSpinner,
    base_message: &str,
) -> crate::shell::OutputCallback {
    if output.mode().shows_command_output() {
        Box::new(|line: OutputLine| match line {
            OutputLine::Stdout(s) => println!("{}", s),
            OutputLine::Stderr(s) => eprintln!("{}", s),
        })
    } else {
        live_output_callback(spinner.bar_clone(), base_message.to_string(), 3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::OutputMode;
    use std::fs;

    fn quiet_output() -> Output {
        Output::new(OutputMode::Silent, false)
    }

    fn context(root: &std::path::Path) -> SetupContext {
        SetupContext {
            project_root: root.to_path_buf(),
            config: SetupConfig::default(),
            dry_run: true,
            force_reinstall: false,
            skip_stage: false,
        }
    }

    #[test]
    fn step_result_status_mapping() {
        let done = StepResult::success("create-venv", Duration::from_secs(1), None);
        assert_eq!(done.status(), StepStatus::Completed);

        let skipped = StepResult::skipped("install-deps", "already satisfied");
        assert_eq!(skipped.status(), StepStatus::Skipped);
        assert!(skipped.success);
    }

    #[test]
    fn summary_line_includes_detail_for_skipped() {
        let skipped = StepResult::skipped("install-deps", "already satisfied");
        let line = skipped.summary_line();
        assert!(line.contains("install-deps"));
        assert!(line.contains("already satisfied"));
    }

    #[test]
    fn summary_line_includes_duration_for_completed() {
        let done = StepResult::success("create-venv", Duration::from_millis(2400), None);
        let line = done.summary_line();
        assert!(line.contains("create-venv"));
        assert!(line.contains("2.4s"));
    }

    #[test]
    fn context_paths_are_rooted() {
        let ctx = context(std::path::Path::new("/work"));
        assert_eq!(ctx.venv_dir(), PathBuf::from("/work/slj"));
        assert_eq!(
            ctx.requirements_path(),
            PathBuf::from("/work/requirements.txt")
        );
        assert_eq!(ctx.archive_dir(), PathBuf::from("/work/.tmp"));
    }

    #[test]
    fn dry_run_executes_all_steps_without_mutation() {
        let temp = tempfile::TempDir::new().unwrap();
        fs::write(temp.path().join("requirements.txt"), "xxhash\n").unwrap();
        fs::write(temp.path().join("DuplicateDetective.py"), "print()\n").unwrap();

        let ctx = context(temp.path());
        let results = run_setup(&ctx, &quiet_output()).unwrap();

        assert_eq!(results.len(), 7);
        assert!(results.iter().all(|r| r.success));
        // Nothing was created or moved.
        assert!(!temp.path().join("slj").exists());
        assert!(!temp.path().join(".tmp").exists());
        assert!(temp.path().join("requirements.txt").exists());
    }

    #[test]
    fn dry_run_works_in_empty_directory() {
        let temp = tempfile::TempDir::new().unwrap();
        let ctx = context(temp.path());
        let results = run_setup(&ctx, &quiet_output()).unwrap();
        assert!(results.iter().all(|r| r.success));
    }

    #[test]
    fn skip_stage_short_circuits_final_step() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut ctx = context(temp.path());
        ctx.skip_stage = true;

        let results = run_setup(&ctx, &quiet_output()).unwrap();
        let last = results.last().unwrap();
        assert_eq!(last.name, "stage-files");
        assert!(last.skipped);
    }
}
