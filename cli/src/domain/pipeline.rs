//! Pipeline vocabulary: named steps, their failure policy, and outcomes.

use std::fmt;

/// A named bootstrap step, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    EnsureEnvironment,
    Activate,
    UpgradeInstaller,
    InstallManifest,
    EnsurePackage,
    CheckRuntime,
    QueryModels,
    PullModel,
    Guidance,
    Launch,
}

/// How the driver treats an error returned by a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Stop the run.
    Fatal,
    /// Record a warning and continue.
    NonFatal,
}

impl Step {
    /// Every step, in the order the driver runs them.
    pub const ALL: [Step; 10] = [
        Step::EnsureEnvironment,
        Step::Activate,
        Step::UpgradeInstaller,
        Step::InstallManifest,
        Step::EnsurePackage,
        Step::CheckRuntime,
        Step::QueryModels,
        Step::PullModel,
        Step::Guidance,
        Step::Launch,
    ];

    /// Steps run when the front-end launch is not wanted.
    pub const PREPARE: [Step; 8] = [
        Step::EnsureEnvironment,
        Step::Activate,
        Step::UpgradeInstaller,
        Step::InstallManifest,
        Step::EnsurePackage,
        Step::CheckRuntime,
        Step::QueryModels,
        Step::PullModel,
    ];

    #[must_use]
    pub fn policy(self) -> Policy {
        match self {
            Step::QueryModels => Policy::NonFatal,
            _ => Policy::Fatal,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Step::EnsureEnvironment => "ensure-environment",
            Step::Activate => "activate",
            Step::UpgradeInstaller => "upgrade-installer",
            Step::InstallManifest => "install-manifest",
            Step::EnsurePackage => "ensure-package",
            Step::CheckRuntime => "check-runtime",
            Step::QueryModels => "query-models",
            Step::PullModel => "pull-model",
            Step::Guidance => "guidance",
            Step::Launch => "launch",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of a step that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Done,
    Skipped(String),
    Warned(String),
    /// The launched process finished with this exit status.
    Exited(i32),
}

/// Everything a finished run did, in order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BootstrapReport {
    pub steps: Vec<(Step, StepOutcome)>,
}

impl BootstrapReport {
    pub fn record(&mut self, step: Step, outcome: StepOutcome) {
        self.steps.push((step, outcome));
    }

    #[must_use]
    pub fn outcome(&self, step: Step) -> Option<&StepOutcome> {
        self.steps.iter().find(|(s, _)| *s == step).map(|(_, o)| o)
    }

    /// Exit status for the whole run: the launched process's status, or `0`.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self.outcome(Step::Launch) {
            Some(StepOutcome::Exited(code)) => *code,
            _ => 0,
        }
    }

    #[must_use]
    pub fn warnings(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter_map(|(_, o)| match o {
                StepOutcome::Warned(msg) => Some(msg.as_str()),
                _ => None,
            })
            .collect()
    }
}
