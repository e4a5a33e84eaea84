//! topic-admin CLI entry point.

use clap::Parser;

use topic_admin::cli::{Cli, Commands};
use topic_admin::infrastructure::logging::LoggerImpl;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let _logger = match LoggerImpl::init(&cli.log_config()) {
        Ok(logger) => Some(logger),
        Err(err) => {
            eprintln!("Warning: logging disabled: {err:#}");
            None
        }
    };

    let result = match cli.command {
        Commands::Config(args) => topic_admin::cli::commands::config::execute(args, cli.json).await,
        Commands::Topic(args) => topic_admin::cli::commands::topic::execute(args, cli.json).await,
    };

    if let Err(err) = result {
        topic_admin::cli::handle_error(err, cli.json);
    }
}
