//! Diagnostic logging on stderr via `tracing-subscriber`.
//!
//! Operator-facing messages go through `OutputContext`; this is for `-v`
//! troubleshooting only. `RUST_LOG` overrides the verbosity flag.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter directive for a `-v` count.
#[must_use]
pub fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "chatbot_launcher=warn",
        1 => "chatbot_launcher=debug,warn",
        _ => "chatbot_launcher=trace,info",
    }
}

/// Install the global subscriber. Later calls are ignored.
pub fn init_cli_logger(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init();
}
