//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};
use std::time::Duration;

use anyhow::Result;

use crate::domain::LauncherConfig;

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
    /// Run a program with inherited stdio and return only its exit status.
    ///
    /// No timeout: installs, downloads and the front-end run until done.
    async fn run_status(&self, program: &str, args: &[&str]) -> Result<ExitStatus> {
        self.run_status_with_env(program, args, &[]).await
    }
    /// Like `run_status`, with extra environment variables for the child.
    async fn run_status_with_env(
        &self,
        program: &str,
        args: &[&str],
        env: &[(String, String)],
    ) -> Result<ExitStatus>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait — no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
    /// Emit an informational message.
    fn info(&self, message: &str);
}

// ── Host Lookup Ports ─────────────────────────────────────────────────────────

/// Resolves command names against the system `PATH`.
pub trait ToolLocator {
    /// Full path of `command`, or `None` when it is not installed.
    fn locate(&self, command: &str) -> Option<PathBuf>;
}

/// Read-only filesystem queries used by the pipeline.
pub trait LocalFs {
    /// Whether `path` exists (file or directory).
    fn exists(&self, path: &Path) -> bool;
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Abstracts loading launcher configuration.
pub trait ConfigStore {
    /// Load the configuration, falling back to defaults when no file applies.
    ///
    /// # Errors
    ///
    /// Returns an error if a selected file cannot be read or parsed.
    fn load(&self) -> Result<LauncherConfig>;
    /// The file this store reads from, if any.
    fn path(&self) -> Option<PathBuf>;
}
