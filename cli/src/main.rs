//! Chatbot launcher - bootstrap the local chatbot demo and start its front-end

use chatbot_launcher::cli::Cli;
use chatbot_launcher::domain::BootstrapError;
use chatbot_launcher::logging;
use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_cli_logger(cli.verbose);
    match cli.run().await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            let code = e
                .downcast_ref::<BootstrapError>()
                .map_or(1, BootstrapError::exit_code);
            std::process::exit(code);
        }
    }
}
