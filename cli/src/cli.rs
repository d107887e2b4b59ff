//! CLI argument parsing with clap derive

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser};

use crate::app::{AppContext, AppFlags};
use crate::commands;

/// Set up the local chatbot environment and launch its web front-end.
///
/// With no arguments: create the virtual environment if needed, install
/// dependencies, make sure the Ollama model is available, then run the
/// Streamlit app in the foreground.
#[derive(Parser, Debug)]
#[command(name = "chatbot-launcher", version)]
pub struct Cli {
    /// Path to a YAML config file (default: ./launcher.yaml if present)
    #[arg(long, env = "CHATBOT_LAUNCHER_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Model to check for and pull, overriding the config file
    #[arg(long, env = "CHATBOT_LAUNCHER_MODEL", value_name = "ID")]
    pub model: Option<String>,

    /// Prepare the environment and model, but do not launch the front-end
    #[arg(long)]
    pub no_launch: bool,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Execute the bootstrap and return the process exit status.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid or a fatal step fails.
    pub async fn run(self) -> Result<i32> {
        let Cli {
            config,
            model,
            no_launch,
            quiet,
            no_color,
            ..
        } = self;
        let app = AppContext::new(&AppFlags {
            no_color,
            quiet,
            config,
            model,
        })?;
        commands::bootstrap::run(&app, !no_launch).await
    }
}
