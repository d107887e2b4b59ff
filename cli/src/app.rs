//! Application context — unified state passed to the command handler.
//!
//! `AppContext` owns the output context, the loaded configuration and the
//! production port implementations, so the command handler only wires them
//! into the bootstrap service.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::services::config_service::{ConfigOverrides, load_config};
use crate::domain::LauncherConfig;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::YamlConfigStore;
use crate::infra::fs::LocalFs;
use crate::infra::locator::PathLocator;
use crate::output::OutputContext;

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Explicit config file.
    pub config: Option<PathBuf>,
    /// Model override.
    pub model: Option<String>,
}

/// Unified application context.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Validated launcher configuration.
    pub config: LauncherConfig,
    /// Process runner for every external tool.
    pub runner: TokioCommandRunner,
    /// `PATH` lookup for the model runtime.
    pub locator: PathLocator,
    /// Existence checks for the environment, manifest and entry point.
    pub fs: LocalFs,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory is unavailable or the
    /// configuration cannot be loaded.
    pub fn new(flags: &AppFlags) -> Result<Self> {
        let cwd = std::env::current_dir().context("cannot determine working directory")?;
        let store = YamlConfigStore::resolve(flags.config.clone(), &cwd);
        let config = load_config(
            &store,
            ConfigOverrides {
                model: flags.model.clone(),
            },
        )?;

        Ok(Self {
            output: OutputContext::new(flags.no_color, flags.quiet),
            config,
            runner: TokioCommandRunner::default(),
            locator: PathLocator,
            fs: LocalFs,
        })
    }
}
