//! Application service — model runtime client.
//!
//! Wraps the runtime CLI (`<command> list`, `<command> pull <model>`) behind
//! the `CommandRunner` port. Listing never fails: every problem becomes
//! `ModelListing::Unreachable` so the caller decides how loud to be.

use std::process::ExitStatus;
use std::time::Duration;

use anyhow::Result;

use crate::application::ports::CommandRunner;
use crate::domain::ModelListing;

pub struct ModelRuntime<'a, R: CommandRunner> {
    runner: &'a R,
    command: &'a str,
    list_timeout: Duration,
}

impl<'a, R: CommandRunner> ModelRuntime<'a, R> {
    #[must_use]
    pub fn new(runner: &'a R, command: &'a str, list_timeout: Duration) -> Self {
        Self {
            runner,
            command,
            list_timeout,
        }
    }

    /// Ask the runtime which models are installed.
    pub async fn list_models(&self) -> ModelListing {
        match self
            .runner
            .run_with_timeout(self.command, &["list"], self.list_timeout)
            .await
        {
            Ok(output) if output.status.success() => {
                ModelListing::Listed(String::from_utf8_lossy(&output.stdout).into_owned())
            }
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                let reason = match stderr.trim() {
                    "" => format!("'{} list' exited with {}", self.command, output.status),
                    msg => msg.to_string(),
                };
                ModelListing::Unreachable(reason)
            }
            Err(e) => ModelListing::Unreachable(format!("{e:#}")),
        }
    }

    /// Download `model`, streaming the runtime's progress to the terminal.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime cannot be spawned.
    pub async fn pull(&self, model: &str) -> Result<ExitStatus> {
        self.runner.run_status(self.command, &["pull", model]).await
    }
}
