//! Infrastructure implementation of the `ConfigStore` port.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::domain::LauncherConfig;
use crate::domain::error::ConfigError;

/// File picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "launcher.yaml";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Source {
    /// Named with `--config` or `CHATBOT_LAUNCHER_CONFIG`; must exist.
    Explicit(PathBuf),
    /// `launcher.yaml` found in the working directory.
    Discovered(PathBuf),
    Defaults,
}

/// Production implementation of `ConfigStore` that reads a YAML file.
#[derive(Debug, Clone)]
pub struct YamlConfigStore {
    source: Source,
}

impl YamlConfigStore {
    /// Pick the config file: the explicit path if given, else
    /// `<dir>/launcher.yaml` if present, else built-in defaults.
    #[must_use]
    pub fn resolve(explicit: Option<PathBuf>, dir: &Path) -> Self {
        let source = match explicit {
            Some(path) => Source::Explicit(path),
            None => {
                let candidate = dir.join(DEFAULT_CONFIG_FILE);
                if candidate.is_file() {
                    Source::Discovered(candidate)
                } else {
                    Source::Defaults
                }
            }
        };
        Self { source }
    }

    fn read(path: &Path) -> Result<LauncherConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<LauncherConfig> {
        match &self.source {
            Source::Explicit(path) if !path.exists() => Err(ConfigError::NotFound {
                path: path.clone(),
            }
            .into()),
            Source::Explicit(path) | Source::Discovered(path) => Ok(Self::read(path)?),
            Source::Defaults => Ok(LauncherConfig::default()),
        }
    }

    fn path(&self) -> Option<PathBuf> {
        match &self.source {
            Source::Explicit(path) | Source::Discovered(path) => Some(path.clone()),
            Source::Defaults => None,
        }
    }
}
