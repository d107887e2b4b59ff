//! Virtual environment layout and activation.
//!
//! Activation is computed, not applied: the resolved executables and the
//! variables a child needs are returned as a value and passed to each
//! invocation. Nothing here touches the current process environment.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Host platform conventions for a virtual environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Unix,
    Windows,
}

impl Platform {
    #[must_use]
    pub fn current() -> Self {
        if cfg!(windows) { Self::Windows } else { Self::Unix }
    }

    fn bin_dir(self) -> &'static str {
        match self {
            Self::Unix => "bin",
            Self::Windows => "Scripts",
        }
    }

    fn exe(self, name: &str) -> String {
        match self {
            Self::Unix => name.to_string(),
            Self::Windows => format!("{name}.exe"),
        }
    }

    fn path_separator(self) -> &'static str {
        match self {
            Self::Unix => ":",
            Self::Windows => ";",
        }
    }
}

/// Resolved paths and variables that make a child run inside the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    pub root: PathBuf,
    pub bin_dir: PathBuf,
    pub python: PathBuf,
    pub pip: PathBuf,
    platform: Platform,
}

impl Activation {
    #[must_use]
    pub fn new(root: &Path, platform: Platform) -> Self {
        let bin_dir = root.join(platform.bin_dir());
        Self {
            root: root.to_path_buf(),
            python: bin_dir.join(platform.exe("python")),
            pip: bin_dir.join(platform.exe("pip")),
            bin_dir,
            platform,
        }
    }

    /// Path of an executable installed into the environment.
    #[must_use]
    pub fn executable(&self, name: &str) -> PathBuf {
        self.bin_dir.join(self.platform.exe(name))
    }

    /// `VIRTUAL_ENV` and `PATH` for a child, given the caller's current `PATH`.
    #[must_use]
    pub fn env_vars(&self, current_path: Option<&OsString>) -> Vec<(String, String)> {
        let bin = self.bin_dir.display().to_string();
        let path = match current_path {
            Some(p) if !p.is_empty() => {
                format!("{bin}{}{}", self.platform.path_separator(), p.to_string_lossy())
            }
            _ => bin,
        };
        vec![
            ("VIRTUAL_ENV".to_string(), self.root.display().to_string()),
            ("PATH".to_string(), path),
        ]
    }
}
