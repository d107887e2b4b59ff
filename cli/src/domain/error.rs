//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs` or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::pipeline::Step;

// ── Bootstrap errors ──────────────────────────────────────────────────────────

/// Fatal failures that end a bootstrap run.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("'{command}' is not installed or not on PATH. Install it from https://ollama.com/download and re-run.")]
    RuntimeMissing { command: String },

    #[error("{step}: '{program}' exited with status {code}")]
    CommandFailed {
        step: Step,
        program: String,
        code: i32,
    },

    #[error("{step}: '{program}' was terminated by a signal")]
    Terminated { step: Step, program: String },

    #[error("{step}: cannot run '{program}': {source}")]
    Spawn {
        step: Step,
        program: String,
        #[source]
        source: anyhow::Error,
    },
}

impl BootstrapError {
    /// Process exit status this error maps to.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::CommandFailed { code, .. } => *code,
            Self::RuntimeMissing { .. } | Self::Terminated { .. } | Self::Spawn { .. } => 1,
        }
    }

    /// The step that failed, when the failure belongs to one.
    #[must_use]
    pub fn step(&self) -> Option<Step> {
        match self {
            Self::RuntimeMissing { .. } => Some(Step::CheckRuntime),
            Self::CommandFailed { step, .. }
            | Self::Terminated { step, .. }
            | Self::Spawn { step, .. } => Some(*step),
        }
    }
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file {} not found", path.display())]
    NotFound { path: PathBuf },

    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}
