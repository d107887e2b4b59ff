//! Tests for the `bootstrap` application service.
//!
//! Every step runs against recording fakes, so each branch of the run can be
//! checked by the commands it issued and the messages it reported.

#![allow(clippy::expect_used)]

use std::ffi::OsString;

use chatbot_launcher::application::services::bootstrap::{BootstrapOptions, run_bootstrap};
use chatbot_launcher::domain::{
    BootstrapError, BootstrapReport, LauncherConfig, Platform, Step, StepOutcome,
};

use crate::helpers::{
    FakeFs, FakeLocator, FakeRunner, Level, ListBehaviour, OLLAMA, PYTHON, RecordingReporter,
    VENV_PIP, VENV_PYTHON, VENV_STREAMLIT, config,
};

const ENTRY_POINT: &str = "streamlit/s_app.py";

async fn bootstrap(
    runner: &FakeRunner,
    locator: &FakeLocator,
    fs: &FakeFs,
    reporter: &RecordingReporter,
    cfg: &LauncherConfig,
    launch: bool,
) -> Result<BootstrapReport, BootstrapError> {
    run_bootstrap(
        runner,
        locator,
        fs,
        BootstrapOptions {
            reporter,
            config: cfg,
            launch,
            platform: Platform::Unix,
            current_path: Some(OsString::from("/usr/bin:/bin")),
        },
    )
    .await
}

/// Run with the default config, an existing environment and launch enabled.
async fn run_existing_env(
    runner: &FakeRunner,
    locator: &FakeLocator,
    reporter: &RecordingReporter,
) -> Result<BootstrapReport, BootstrapError> {
    let fs = FakeFs::with(&["venv", "requirements.txt", ENTRY_POINT]);
    bootstrap(runner, locator, &fs, reporter, &config(), true).await
}

fn launch_args(runner: &FakeRunner) -> Vec<Vec<String>> {
    runner.calls_to(VENV_STREAMLIT)
}

// ── Environment ensure ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_missing_environment_is_created() {
    let runner = FakeRunner::with_models(&["llama3.2:latest"]);
    let reporter = RecordingReporter::default();
    let report = bootstrap(
        &runner,
        &FakeLocator::with_ollama(),
        &FakeFs::default(),
        &reporter,
        &config(),
        true,
    )
    .await
    .expect("run succeeds");

    assert!(runner.was_called_with(PYTHON, &["-m", "venv", "venv"]));
    assert_eq!(report.outcome(Step::EnsureEnvironment), Some(&StepOutcome::Done));
    assert!(reporter.any(Level::Success, "environment created"));
}

#[tokio::test]
async fn test_existing_environment_is_not_recreated() {
    let runner = FakeRunner::with_models(&["llama3.2:latest"]);
    let reporter = RecordingReporter::default();
    let report = run_existing_env(&runner, &FakeLocator::with_ollama(), &reporter)
        .await
        .expect("run succeeds");

    assert!(runner.calls_to(PYTHON).is_empty(), "venv must not be recreated");
    assert!(matches!(
        report.outcome(Step::EnsureEnvironment),
        Some(StepOutcome::Skipped(_))
    ));
}

#[tokio::test]
async fn test_second_run_skips_creation() {
    let locator = FakeLocator::with_ollama();
    let first = FakeRunner::with_models(&["llama3.2:latest"]);
    bootstrap(
        &first,
        &locator,
        &FakeFs::default(),
        &RecordingReporter::default(),
        &config(),
        true,
    )
    .await
    .expect("first run");
    assert_eq!(first.calls_to(PYTHON).len(), 1);

    let second = FakeRunner::with_models(&["llama3.2:latest"]);
    bootstrap(
        &second,
        &locator,
        &FakeFs::with(&["venv"]),
        &RecordingReporter::default(),
        &config(),
        true,
    )
    .await
    .expect("second run");
    assert!(second.calls_to(PYTHON).is_empty());
}

#[tokio::test]
async fn test_environment_creation_failure_is_fatal() {
    let runner = FakeRunner::with_models(&["llama3.2:latest"]).exiting(PYTHON, 1);
    let err = bootstrap(
        &runner,
        &FakeLocator::with_ollama(),
        &FakeFs::default(),
        &RecordingReporter::default(),
        &config(),
        true,
    )
    .await
    .expect_err("venv creation fails");

    assert_eq!(err.step(), Some(Step::EnsureEnvironment));
    assert_eq!(err.exit_code(), 1);
    assert_eq!(runner.calls().len(), 1, "nothing runs after the failure");
}

// ── Activation and installer ─────────────────────────────────────────────────

#[tokio::test]
async fn test_installer_runs_from_environment_with_activation_env() {
    let runner = FakeRunner::with_models(&["llama3.2:latest"]);
    run_existing_env(&runner, &FakeLocator::with_ollama(), &RecordingReporter::default())
        .await
        .expect("run succeeds");

    let upgrade = runner
        .calls()
        .into_iter()
        .find(|c| c.program == VENV_PYTHON)
        .expect("pip upgrade issued");
    assert_eq!(upgrade.args, ["-m", "pip", "install", "--upgrade", "pip"]);
    assert!(upgrade.env.contains(&("VIRTUAL_ENV".to_string(), "venv".to_string())));
    assert!(
        upgrade
            .env
            .contains(&("PATH".to_string(), "venv/bin:/usr/bin:/bin".to_string()))
    );
}

#[tokio::test]
async fn test_installer_upgrade_failure_is_fatal() {
    let runner = FakeRunner::with_models(&["llama3.2:latest"]).exiting(VENV_PYTHON, 4);
    let err = run_existing_env(&runner, &FakeLocator::with_ollama(), &RecordingReporter::default())
        .await
        .expect_err("upgrade fails");

    assert_eq!(err.step(), Some(Step::UpgradeInstaller));
    assert_eq!(err.exit_code(), 4);
    assert!(runner.calls_to(VENV_PIP).is_empty());
}

// ── Manifest and fallback package ────────────────────────────────────────────

#[tokio::test]
async fn test_manifest_installed_before_fallback_package() {
    let runner = FakeRunner::with_models(&["llama3.2:latest"]);
    run_existing_env(&runner, &FakeLocator::with_ollama(), &RecordingReporter::default())
        .await
        .expect("run succeeds");

    assert_eq!(
        runner.calls_to(VENV_PIP),
        vec![
            vec!["install".to_string(), "-r".to_string(), "requirements.txt".to_string()],
            vec!["install".to_string(), "streamlit".to_string()],
        ]
    );
}

#[tokio::test]
async fn test_missing_manifest_is_skipped_but_fallback_installed() {
    let runner = FakeRunner::with_models(&["llama3.2:latest"]);
    let reporter = RecordingReporter::default();
    let report = bootstrap(
        &runner,
        &FakeLocator::with_ollama(),
        &FakeFs::with(&["venv"]),
        &reporter,
        &config(),
        true,
    )
    .await
    .expect("run succeeds");

    assert!(reporter.any(Level::Info, "requirements.txt not found"));
    assert!(
        runner
            .calls_to(VENV_PIP)
            .iter()
            .all(|args| !args.contains(&"-r".to_string())),
        "installer must not be given a manifest"
    );
    assert!(runner.was_called_with(VENV_PIP, &["install", "streamlit"]));
    assert!(matches!(
        report.outcome(Step::InstallManifest),
        Some(StepOutcome::Skipped(_))
    ));
}

#[tokio::test]
async fn test_manifest_install_failure_propagates_exit_code() {
    let runner = FakeRunner::with_models(&["llama3.2:latest"]).exiting(VENV_PIP, 2);
    let err = run_existing_env(&runner, &FakeLocator::with_ollama(), &RecordingReporter::default())
        .await
        .expect_err("pip fails");

    assert!(matches!(
        err,
        BootstrapError::CommandFailed {
            step: Step::InstallManifest,
            code: 2,
            ..
        }
    ));
    assert!(runner.calls_to(OLLAMA).is_empty());
    assert!(launch_args(&runner).is_empty());
}

// ── Runtime presence ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_missing_runtime_exits_one_before_model_check_and_launch() {
    let runner = FakeRunner::with_models(&["llama3.2:latest"]);
    let err = run_existing_env(&runner, &FakeLocator::empty(), &RecordingReporter::default())
        .await
        .expect_err("runtime missing");

    assert!(matches!(err, BootstrapError::RuntimeMissing { ref command } if command == "ollama"));
    assert_eq!(err.exit_code(), 1);
    assert!(runner.calls_to(OLLAMA).is_empty(), "no list or pull");
    assert!(launch_args(&runner).is_empty(), "no launch");
}

// ── Model presence ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_present_model_is_not_pulled() {
    let runner = FakeRunner::with_models(&["llama3.2:latest", "my-finetuned:latest"]);
    let reporter = RecordingReporter::default();
    let report = run_existing_env(&runner, &FakeLocator::with_ollama(), &reporter)
        .await
        .expect("run succeeds");

    assert!(reporter.any(Level::Success, "model llama3.2 is available"));
    assert_eq!(runner.calls_to(OLLAMA), vec![vec!["list".to_string()]]);
    assert!(matches!(
        report.outcome(Step::PullModel),
        Some(StepOutcome::Skipped(_))
    ));
}

#[tokio::test]
async fn test_absent_model_is_pulled_by_exact_id() {
    let runner = FakeRunner::with_models(&["mistral:latest"]);
    let reporter = RecordingReporter::default();
    let report = run_existing_env(&runner, &FakeLocator::with_ollama(), &reporter)
        .await
        .expect("run succeeds");

    assert!(reporter.any(Level::Warn, "model llama3.2 not found locally"));
    assert!(runner.was_called_with(OLLAMA, &["pull", "llama3.2"]));
    assert_eq!(report.outcome(Step::PullModel), Some(&StepOutcome::Done));
}

#[tokio::test]
async fn test_pull_uses_configured_model() {
    let runner = FakeRunner::with_models(&[]);
    let mut cfg = config();
    cfg.runtime.model = "qwen2.5:7b".to_string();
    bootstrap(
        &runner,
        &FakeLocator::with_ollama(),
        &FakeFs::with(&["venv"]),
        &RecordingReporter::default(),
        &cfg,
        true,
    )
    .await
    .expect("run succeeds");

    assert!(runner.was_called_with(OLLAMA, &["pull", "qwen2.5:7b"]));
}

#[tokio::test]
async fn test_pull_failure_is_fatal() {
    let runner = FakeRunner::with_models(&[]).exiting(OLLAMA, 1);
    let err = run_existing_env(&runner, &FakeLocator::with_ollama(), &RecordingReporter::default())
        .await
        .expect_err("pull fails");

    assert_eq!(err.step(), Some(Step::PullModel));
    assert!(launch_args(&runner).is_empty());
}

#[tokio::test]
async fn test_unreachable_runtime_warns_and_still_launches() {
    let runner = FakeRunner::new(ListBehaviour::SpawnFails);
    let reporter = RecordingReporter::default();
    let report = run_existing_env(&runner, &FakeLocator::with_ollama(), &reporter)
        .await
        .expect("list failure is not fatal");

    assert!(reporter.any(Level::Warn, "cannot list ollama models"));
    assert!(matches!(
        report.outcome(Step::QueryModels),
        Some(StepOutcome::Warned(_))
    ));
    assert!(!runner.was_called_with(OLLAMA, &["pull", "llama3.2"]));
    assert_eq!(launch_args(&runner).len(), 1);
}

#[tokio::test]
async fn test_list_error_exit_reports_runtime_stderr() {
    let runner = FakeRunner::new(ListBehaviour::ExitsWith(
        1,
        "Error: could not connect to ollama app, is it running?".to_string(),
    ));
    let reporter = RecordingReporter::default();
    let report = run_existing_env(&runner, &FakeLocator::with_ollama(), &reporter)
        .await
        .expect("list failure is not fatal");

    assert!(reporter.any(Level::Warn, "could not connect to ollama app"));
    assert_eq!(report.warnings().len(), 1);
    assert_eq!(launch_args(&runner).len(), 1);
}

// ── Launch ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_launch_argument_is_exact_on_every_branch() {
    let scenarios = [
        FakeRunner::with_models(&["llama3.2:latest"]),
        FakeRunner::with_models(&[]),
        FakeRunner::new(ListBehaviour::SpawnFails),
        FakeRunner::new(ListBehaviour::ExitsWith(1, String::new())),
    ];
    for runner in &scenarios {
        run_existing_env(runner, &FakeLocator::with_ollama(), &RecordingReporter::default())
            .await
            .expect("run succeeds");
        assert_eq!(
            launch_args(runner),
            vec![vec!["run".to_string(), ENTRY_POINT.to_string()]]
        );
    }
}

#[tokio::test]
async fn test_launch_uses_configured_entry_point_verbatim() {
    let runner = FakeRunner::with_models(&["llama3.2"]);
    let mut cfg = config();
    cfg.frontend.entry_point = "./apps/finance chatbot/s_app.py".to_string();
    bootstrap(
        &runner,
        &FakeLocator::with_ollama(),
        &FakeFs::with(&["venv"]),
        &RecordingReporter::default(),
        &cfg,
        true,
    )
    .await
    .expect("run succeeds");

    assert_eq!(
        launch_args(&runner),
        vec![vec![
            "run".to_string(),
            "./apps/finance chatbot/s_app.py".to_string()
        ]]
    );
}

#[tokio::test]
async fn test_launch_runs_last_with_activation_env() {
    let runner = FakeRunner::with_models(&["llama3.2:latest"]);
    run_existing_env(&runner, &FakeLocator::with_ollama(), &RecordingReporter::default())
        .await
        .expect("run succeeds");

    let last = runner.calls().pop().expect("at least one call");
    assert_eq!(last.program, VENV_STREAMLIT);
    assert!(last.env.iter().any(|(k, v)| k == "VIRTUAL_ENV" && v == "venv"));
}

#[tokio::test]
async fn test_exit_code_is_launched_process_status() {
    let runner = FakeRunner::with_models(&["llama3.2:latest"]).exiting(VENV_STREAMLIT, 3);
    let report = run_existing_env(&runner, &FakeLocator::with_ollama(), &RecordingReporter::default())
        .await
        .expect("non-zero launch is still a completed run");

    assert_eq!(report.outcome(Step::Launch), Some(&StepOutcome::Exited(3)));
    assert_eq!(report.exit_code(), 3);
}

#[tokio::test]
async fn test_launch_spawn_failure_is_fatal() {
    let runner = FakeRunner::with_models(&["llama3.2:latest"]).unspawnable(VENV_STREAMLIT);
    let err = run_existing_env(&runner, &FakeLocator::with_ollama(), &RecordingReporter::default())
        .await
        .expect_err("launcher missing");

    assert!(matches!(err, BootstrapError::Spawn { step: Step::Launch, .. }));
    assert_eq!(err.exit_code(), 1);
}

#[tokio::test]
async fn test_guidance_precedes_launch() {
    let runner = FakeRunner::with_models(&["llama3.2:latest"]);
    let reporter = RecordingReporter::default();
    let report = run_existing_env(&runner, &FakeLocator::with_ollama(), &reporter)
        .await
        .expect("run succeeds");

    assert!(reporter.any(Level::Info, "http://localhost:8501"));
    assert!(reporter.any(Level::Info, "Ctrl+C"));
    assert!(reporter.messages(Level::Warn).is_empty());
    let order: Vec<Step> = report.steps.iter().map(|(s, _)| *s).collect();
    assert_eq!(order, Step::ALL);
}

#[tokio::test]
async fn test_missing_entry_point_warns_but_launches() {
    let runner = FakeRunner::with_models(&["llama3.2:latest"]);
    let reporter = RecordingReporter::default();
    bootstrap(
        &runner,
        &FakeLocator::with_ollama(),
        &FakeFs::with(&["venv"]),
        &reporter,
        &config(),
        true,
    )
    .await
    .expect("run succeeds");

    assert!(reporter.any(Level::Warn, "streamlit/s_app.py does not exist"));
    assert_eq!(launch_args(&runner).len(), 1);
}

#[tokio::test]
async fn test_no_launch_stops_after_model_check() {
    let runner = FakeRunner::with_models(&[]);
    let report = bootstrap(
        &runner,
        &FakeLocator::with_ollama(),
        &FakeFs::with(&["venv"]),
        &RecordingReporter::default(),
        &config(),
        false,
    )
    .await
    .expect("run succeeds");

    assert!(runner.was_called_with(OLLAMA, &["pull", "llama3.2"]));
    assert!(launch_args(&runner).is_empty());
    assert_eq!(report.outcome(Step::Guidance), None);
    assert_eq!(report.exit_code(), 0);
}
