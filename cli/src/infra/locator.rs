//! `PATH` lookup for external tools, backed by the `which` crate.

use std::path::PathBuf;

use crate::application::ports::ToolLocator;

/// Production `ToolLocator` — searches the current process `PATH`.
pub struct PathLocator;

impl ToolLocator for PathLocator {
    fn locate(&self, command: &str) -> Option<PathBuf> {
        match which::which(command) {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::debug!(command, error = %e, "command not found on PATH");
                None
            }
        }
    }
}
