//! Domain types and validators for launcher configuration.
//!
//! Pure functions only — no I/O, no async, no filesystem access.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Defaults ─────────────────────────────────────────────────────────────────

pub const DEFAULT_ENV_DIR: &str = "venv";
pub const DEFAULT_MANIFEST: &str = "requirements.txt";
pub const DEFAULT_FALLBACK_PACKAGE: &str = "streamlit";
pub const DEFAULT_RUNTIME_COMMAND: &str = "ollama";
pub const DEFAULT_MODEL: &str = "llama3.2";
pub const DEFAULT_LIST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_FRONTEND_LAUNCHER: &str = "streamlit";
pub const DEFAULT_ENTRY_POINT: &str = "streamlit/s_app.py";
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:8501";

#[cfg(windows)]
pub const DEFAULT_PYTHON: &str = "python";
#[cfg(not(windows))]
pub const DEFAULT_PYTHON: &str = "python3";

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration, usually read from `launcher.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct LauncherConfig {
    pub environment: EnvironmentConfig,
    pub installer: InstallerConfig,
    pub runtime: RuntimeConfig,
    pub frontend: FrontendConfig,
}

/// Where the virtual environment lives and which interpreter creates it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Environment directory, relative to the working directory.
    pub dir: PathBuf,
    /// Interpreter used to create the environment.
    pub python: String,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_ENV_DIR),
            python: DEFAULT_PYTHON.to_string(),
        }
    }
}

/// Dependency installation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct InstallerConfig {
    /// Optional manifest; skipped when it does not exist.
    pub manifest: PathBuf,
    /// Package installed unconditionally after the manifest.
    pub fallback_package: String,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            manifest: PathBuf::from(DEFAULT_MANIFEST),
            fallback_package: DEFAULT_FALLBACK_PACKAGE.to_string(),
        }
    }
}

/// Model runtime (Ollama) settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Runtime CLI looked up on `PATH`.
    pub command: String,
    /// Model identifier that must be available locally.
    pub model: String,
    /// Upper bound for the `list` query, in seconds.
    pub list_timeout_secs: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            command: DEFAULT_RUNTIME_COMMAND.to_string(),
            model: DEFAULT_MODEL.to_string(),
            list_timeout_secs: DEFAULT_LIST_TIMEOUT_SECS,
        }
    }
}

/// Front-end application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FrontendConfig {
    /// Launcher executable inside the environment.
    pub launcher: String,
    /// Entry-point script passed verbatim to `<launcher> run`.
    pub entry_point: String,
    /// Address shown in the operator guidance.
    pub url: String,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            launcher: DEFAULT_FRONTEND_LAUNCHER.to_string(),
            entry_point: DEFAULT_ENTRY_POINT.to_string(),
            url: DEFAULT_FRONTEND_URL.to_string(),
        }
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

impl LauncherConfig {
    /// Check every field the pipeline relies on.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_path("environment.dir", &self.environment.dir)?;
        require("environment.python", &self.environment.python)?;
        require_path("installer.manifest", &self.installer.manifest)?;
        require("installer.fallback_package", &self.installer.fallback_package)?;
        require("runtime.command", &self.runtime.command)?;
        validate_model_id(&self.runtime.model)?;
        if self.runtime.list_timeout_secs == 0 {
            return Err(invalid("runtime.list_timeout_secs", "must be greater than zero"));
        }
        require("frontend.launcher", &self.frontend.launcher)?;
        require("frontend.entry_point", &self.frontend.entry_point)?;
        Ok(())
    }
}

/// Validate a model identifier such as `llama3.2` or `qwen2.5:7b`.
///
/// # Errors
///
/// Returns an error if the identifier is empty or contains whitespace.
pub fn validate_model_id(model: &str) -> Result<(), ConfigError> {
    if model.is_empty() {
        return Err(invalid("runtime.model", "must not be empty"));
    }
    if model.chars().any(char::is_whitespace) {
        return Err(invalid("runtime.model", "must not contain whitespace"));
    }
    Ok(())
}

fn require(key: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(invalid(key, "must not be empty"));
    }
    Ok(())
}

fn require_path(key: &str, value: &std::path::Path) -> Result<(), ConfigError> {
    if value.as_os_str().is_empty() {
        return Err(invalid(key, "must not be empty"));
    }
    Ok(())
}

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
