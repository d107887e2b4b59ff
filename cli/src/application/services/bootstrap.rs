//! Application service — environment bootstrap and front-end launch.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.
//!
//! The run is an ordered list of [`Step`]s. [`run_pipeline`] drives them and
//! applies each step's [`Policy`]; [`Bootstrap`] knows how to execute each
//! step against the ports.

use std::ffi::OsString;
use std::path::Path;
use std::process::ExitStatus;
use std::time::Duration;

use anyhow::Result;

use crate::application::ports::{CommandRunner, LocalFs, ProgressReporter, ToolLocator};
use crate::application::services::model_runtime::ModelRuntime;
use crate::domain::{
    Activation, BootstrapError, BootstrapReport, LauncherConfig, ModelListing, Platform, Policy,
    Step, StepOutcome,
};

// ── Driver ────────────────────────────────────────────────────────────────────

/// Something that can run a single named step.
#[allow(async_fn_in_trait)]
pub trait StepExecutor {
    async fn execute(&mut self, step: Step) -> Result<StepOutcome, BootstrapError>;
}

/// Run `steps` in order, stopping at the first fatal failure.
///
/// Errors from `NonFatal` steps are reported as warnings and recorded as
/// [`StepOutcome::Warned`].
///
/// # Errors
///
/// Returns the error of the first `Fatal` step that fails.
pub async fn run_pipeline(
    steps: &[Step],
    executor: &mut impl StepExecutor,
    reporter: &impl ProgressReporter,
) -> Result<BootstrapReport, BootstrapError> {
    let mut report = BootstrapReport::default();
    for &step in steps {
        tracing::debug!(%step, "running step");
        match executor.execute(step).await {
            Ok(outcome) => {
                tracing::debug!(%step, ?outcome, "step finished");
                report.record(step, outcome);
            }
            Err(e) if step.policy() == Policy::NonFatal => {
                tracing::debug!(%step, error = %e, "non-fatal step failed");
                reporter.warn(&e.to_string());
                report.record(step, StepOutcome::Warned(e.to_string()));
            }
            Err(e) => {
                tracing::debug!(%step, error = %e, "fatal step failed");
                return Err(e);
            }
        }
    }
    Ok(report)
}

// ── Bootstrap use-case ────────────────────────────────────────────────────────

pub struct BootstrapOptions<'a, P: ProgressReporter> {
    pub reporter: &'a P,
    pub config: &'a LauncherConfig,
    /// Stop after the model check instead of launching the front-end.
    pub launch: bool,
    pub platform: Platform,
    /// `PATH` the launched children inherit, before activation.
    pub current_path: Option<OsString>,
}

/// Prepare the environment and launch the front-end.
///
/// # Errors
///
/// Returns the first fatal step failure.
pub async fn run_bootstrap<R, T, F, P>(
    runner: &R,
    locator: &T,
    fs: &F,
    opts: BootstrapOptions<'_, P>,
) -> Result<BootstrapReport, BootstrapError>
where
    R: CommandRunner,
    T: ToolLocator,
    F: LocalFs,
    P: ProgressReporter,
{
    let steps: &[Step] = if opts.launch {
        &Step::ALL[..]
    } else {
        &Step::PREPARE[..]
    };
    let reporter = opts.reporter;
    let mut bootstrap = Bootstrap::new(runner, locator, fs, opts);
    run_pipeline(steps, &mut bootstrap, reporter).await
}

/// Executes bootstrap steps against the ports, carrying state between them.
pub struct Bootstrap<'a, R, T, F, P: ProgressReporter> {
    runner: &'a R,
    locator: &'a T,
    fs: &'a F,
    reporter: &'a P,
    config: &'a LauncherConfig,
    activation: Activation,
    current_path: Option<OsString>,
    child_env: Vec<(String, String)>,
    /// `Some(true)` once the model is known to be installed, `None` if unknown.
    model_present: Option<bool>,
}

impl<'a, R, T, F, P> Bootstrap<'a, R, T, F, P>
where
    R: CommandRunner,
    T: ToolLocator,
    F: LocalFs,
    P: ProgressReporter,
{
    pub fn new(runner: &'a R, locator: &'a T, fs: &'a F, opts: BootstrapOptions<'a, P>) -> Self {
        let BootstrapOptions {
            reporter,
            config,
            platform,
            current_path,
            ..
        } = opts;
        Self {
            runner,
            locator,
            fs,
            reporter,
            config,
            activation: Activation::new(&config.environment.dir, platform),
            current_path,
            child_env: Vec::new(),
            model_present: None,
        }
    }

    async fn ensure_environment(&self) -> Result<StepOutcome, BootstrapError> {
        let dir = &self.config.environment.dir;
        if self.fs.exists(dir) {
            self.reporter
                .info(&format!("using existing environment {}", dir.display()));
            return Ok(StepOutcome::Skipped("environment already exists".to_string()));
        }
        self.reporter
            .step(&format!("creating environment {}...", dir.display()));
        let python = &self.config.environment.python;
        let dir_arg = dir.to_string_lossy();
        let status = self
            .runner
            .run_status(python, &["-m", "venv", &dir_arg])
            .await;
        check(Step::EnsureEnvironment, python, status)?;
        self.reporter.success("environment created");
        Ok(StepOutcome::Done)
    }

    fn activate(&mut self) -> StepOutcome {
        self.child_env = self.activation.env_vars(self.current_path.as_ref());
        tracing::debug!(bin_dir = %self.activation.bin_dir.display(), "environment activated");
        StepOutcome::Done
    }

    async fn upgrade_installer(&self) -> Result<StepOutcome, BootstrapError> {
        self.reporter.step("upgrading pip...");
        let python = self.activation.python.to_string_lossy();
        let status = self
            .runner
            .run_status_with_env(
                &python,
                &["-m", "pip", "install", "--upgrade", "pip"],
                &self.child_env,
            )
            .await;
        check(Step::UpgradeInstaller, &python, status)?;
        Ok(StepOutcome::Done)
    }

    async fn install_manifest(&self) -> Result<StepOutcome, BootstrapError> {
        let manifest = &self.config.installer.manifest;
        if !self.fs.exists(manifest) {
            self.reporter.info(&format!(
                "{} not found, skipping dependency install",
                manifest.display()
            ));
            return Ok(StepOutcome::Skipped(format!(
                "{} not found",
                manifest.display()
            )));
        }
        self.reporter.step(&format!(
            "installing dependencies from {}...",
            manifest.display()
        ));
        let manifest_arg = manifest.to_string_lossy();
        self.pip(Step::InstallManifest, &["install", "-r", &manifest_arg])
            .await?;
        self.reporter.success("dependencies installed");
        Ok(StepOutcome::Done)
    }

    async fn ensure_package(&self) -> Result<StepOutcome, BootstrapError> {
        let package = &self.config.installer.fallback_package;
        self.reporter
            .step(&format!("ensuring {package} is installed..."));
        self.pip(Step::EnsurePackage, &["install", package]).await?;
        Ok(StepOutcome::Done)
    }

    async fn pip(&self, step: Step, args: &[&str]) -> Result<(), BootstrapError> {
        let pip = self.activation.pip.to_string_lossy();
        let status = self
            .runner
            .run_status_with_env(&pip, args, &self.child_env)
            .await;
        check(step, &pip, status)
    }

    fn check_runtime(&self) -> Result<StepOutcome, BootstrapError> {
        let command = &self.config.runtime.command;
        match self.locator.locate(command) {
            Some(path) => {
                self.reporter
                    .success(&format!("{command} found at {}", path.display()));
                Ok(StepOutcome::Done)
            }
            None => Err(BootstrapError::RuntimeMissing {
                command: command.clone(),
            }),
        }
    }

    fn model_runtime(&self) -> ModelRuntime<'_, R> {
        ModelRuntime::new(
            self.runner,
            &self.config.runtime.command,
            Duration::from_secs(self.config.runtime.list_timeout_secs),
        )
    }

    async fn query_models(&mut self) -> StepOutcome {
        let model = &self.config.runtime.model;
        self.reporter.step(&format!("checking for model {model}..."));
        let listing = self.model_runtime().list_models().await;
        match &listing {
            ModelListing::Unreachable(reason) => {
                let command = &self.config.runtime.command;
                self.reporter.warn(&format!(
                    "cannot list {command} models (is '{command} serve' running?): {reason}"
                ));
                self.model_present = None;
                StepOutcome::Warned(reason.clone())
            }
            ModelListing::Listed(_) if listing.contains(model) => {
                self.reporter.success(&format!("model {model} is available"));
                self.model_present = Some(true);
                StepOutcome::Done
            }
            ModelListing::Listed(_) => {
                self.reporter
                    .warn(&format!("model {model} not found locally"));
                self.model_present = Some(false);
                StepOutcome::Done
            }
        }
    }

    async fn pull_model(&self) -> Result<StepOutcome, BootstrapError> {
        match self.model_present {
            Some(true) => Ok(StepOutcome::Skipped("model already available".to_string())),
            None => Ok(StepOutcome::Skipped("model list unavailable".to_string())),
            Some(false) => {
                let model = &self.config.runtime.model;
                self.reporter
                    .step(&format!("pulling {model} (this may take a while)..."));
                let status = self.model_runtime().pull(model).await;
                check(Step::PullModel, &self.config.runtime.command, status)?;
                self.reporter.success(&format!("model {model} pulled"));
                Ok(StepOutcome::Done)
            }
        }
    }

    fn guidance(&self) -> StepOutcome {
        let frontend = &self.config.frontend;
        if !self.fs.exists(Path::new(&frontend.entry_point)) {
            self.reporter.warn(&format!(
                "{} does not exist; the front-end will likely fail to start",
                frontend.entry_point
            ));
        }
        self.reporter.info(&format!(
            "starting the chatbot; open {} in your browser",
            frontend.url
        ));
        self.reporter.info("press Ctrl+C to stop");
        StepOutcome::Done
    }

    async fn launch(&self) -> Result<StepOutcome, BootstrapError> {
        let frontend = &self.config.frontend;
        let launcher = self.activation.executable(&frontend.launcher);
        let launcher = launcher.to_string_lossy();
        let status = self
            .runner
            .run_status_with_env(
                &launcher,
                &["run", &frontend.entry_point],
                &self.child_env,
            )
            .await
            .map_err(|source| BootstrapError::Spawn {
                step: Step::Launch,
                program: launcher.to_string(),
                source,
            })?;
        Ok(StepOutcome::Exited(exit_code(status)))
    }
}

impl<R, T, F, P> StepExecutor for Bootstrap<'_, R, T, F, P>
where
    R: CommandRunner,
    T: ToolLocator,
    F: LocalFs,
    P: ProgressReporter,
{
    async fn execute(&mut self, step: Step) -> Result<StepOutcome, BootstrapError> {
        match step {
            Step::EnsureEnvironment => self.ensure_environment().await,
            Step::Activate => Ok(self.activate()),
            Step::UpgradeInstaller => self.upgrade_installer().await,
            Step::InstallManifest => self.install_manifest().await,
            Step::EnsurePackage => self.ensure_package().await,
            Step::CheckRuntime => self.check_runtime(),
            Step::QueryModels => Ok(self.query_models().await),
            Step::PullModel => self.pull_model().await,
            Step::Guidance => Ok(self.guidance()),
            Step::Launch => self.launch().await,
        }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Map a finished child to success or the matching fatal error.
fn check(step: Step, program: &str, status: Result<ExitStatus>) -> Result<(), BootstrapError> {
    let status = status.map_err(|source| BootstrapError::Spawn {
        step,
        program: program.to_string(),
        source,
    })?;
    if status.success() {
        return Ok(());
    }
    match status.code() {
        Some(code) => Err(BootstrapError::CommandFailed {
            step,
            program: program.to_string(),
            code,
        }),
        None => Err(BootstrapError::Terminated {
            step,
            program: program.to_string(),
        }),
    }
}

/// Exit status to report for the launched process (`128 + signal` when killed).
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}
