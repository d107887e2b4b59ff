//! Default command — bootstrap the environment and launch the front-end.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::bootstrap::{BootstrapOptions, run_bootstrap};
use crate::domain::Platform;
use crate::output::TerminalReporter;

/// Run every step and return the exit status for the process.
///
/// # Errors
///
/// Returns the first fatal step failure; callers map it to an exit status
/// with [`crate::domain::BootstrapError::exit_code`].
pub async fn run(app: &AppContext, launch: bool) -> Result<i32> {
    let ctx = &app.output;
    let config = &app.config;
    ctx.header("chatbot launcher");
    ctx.kv("environment", &config.environment.dir.display().to_string());
    ctx.kv("model", &config.runtime.model);
    ctx.kv("front-end", &config.frontend.entry_point);

    let reporter = TerminalReporter::new(ctx);
    let report = run_bootstrap(
        &app.runner,
        &app.locator,
        &app.fs,
        BootstrapOptions {
            reporter: &reporter,
            config,
            launch,
            platform: Platform::current(),
            current_path: std::env::var_os("PATH"),
        },
    )
    .await?;

    if !launch {
        ctx.success("environment ready; skipping launch (--no-launch)");
    }
    Ok(report.exit_code())
}
