//! Sherlock CLI entry point.

use clap::Parser;

use sherlock::cli::{commands, handle_error, Cli, Commands};
use sherlock::infrastructure::config::ConfigLoader;
use sherlock::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    let loaded = match cli.config.as_deref() {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(err) => handle_error(err, json),
    };

    // Keeps the file writer alive until exit.
    let _logger = match LoggerImpl::init(&LogConfig::from(&config.logging)) {
        Ok(logger) => Some(logger),
        Err(err) => {
            eprintln!("warning: logging disabled: {err:#}");
            None
        }
    };

    let result = match cli.command {
        Commands::Thresholds => commands::thresholds::execute(json),
        Commands::Score(args) => commands::score::execute(args, &config, json).await,
        Commands::Investigate(args) => commands::investigate::execute(args, &config, json).await,
        Commands::Report(args) => commands::report::execute(args, json).await,
        Commands::Awareness(args) => commands::awareness::execute(args, &config, json).await,
    };

    if let Err(err) = result {
        handle_error(err, json);
    }
}
