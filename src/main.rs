//! Taskroll CLI entry point.

use clap::Parser;

use taskroll::cli::commands::{self, load_config};
use taskroll::cli::{handle_error, Cli, Commands};
use taskroll::domain::models::Config;
use taskroll::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let (config, config_error) = match load_config(cli.config.as_deref()) {
        Ok(config) => (config, None),
        Err(err) => (Config::default(), Some(err)),
    };

    let _logger = match LoggerImpl::init(&LogConfig::from(&config.logging)) {
        Ok(logger) => Some(logger),
        Err(err) => {
            eprintln!("warning: logging disabled: {err:#}");
            None
        }
    };

    if let Some(err) = config_error {
        handle_error(err.context("Failed to load configuration"), cli.json);
    }

    let result = match cli.command {
        Commands::Init(args) => commands::init::execute(args, cli.json).await,
        Commands::Import(args) => commands::import::execute(args, &config, cli.json).await,
        Commands::Report(args) => commands::report::execute(args, &config, cli.json).await,
        Commands::Show(args) => commands::show::execute(args, &config, cli.json).await,
        Commands::Runs(args) => commands::runs::execute(args, &config, cli.json).await,
    };

    if let Err(err) = result {
        handle_error(err, cli.json);
    }
}
