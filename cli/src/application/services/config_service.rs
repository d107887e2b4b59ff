//! Application service — configuration use-cases.

use anyhow::{Context, Result};

use crate::application::ports::ConfigStore;
use crate::domain::LauncherConfig;
use crate::domain::config::validate_model_id;

/// Values given on the command line that take precedence over the file.
#[derive(Debug, Default)]
pub struct ConfigOverrides {
    pub model: Option<String>,
}

/// Load configuration, apply overrides, and validate the result.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded or a value is invalid.
pub fn load_config(store: &impl ConfigStore, overrides: ConfigOverrides) -> Result<LauncherConfig> {
    let mut config = store.load()?;
    if let Some(model) = overrides.model {
        validate_model_id(&model).context("--model")?;
        config.runtime.model = model;
    }
    match store.path() {
        Some(path) => config
            .validate()
            .with_context(|| format!("invalid configuration in {}", path.display()))?,
        None => config.validate()?,
    }
    tracing::debug!(?config, "configuration loaded");
    Ok(config)
}
