//! Rentdesk - application entry point.

use clap::Parser;

use common::logging::init_tracing;
use rentdesk_api::{
    cli::{Cli, Commands},
    commands, ApiConfig,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut config = match ApiConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    config.logging.verbose = cli.verbose;
    init_tracing(&config.logging);
    tracing::debug!(?config, "Configuration loaded");

    let result = match cli.command {
        Commands::Serve(args) => commands::serve::execute(args, config).await,
        Commands::Origins(args) => commands::origins::execute(args, &config),
        Commands::Openapi => commands::openapi::execute(),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {}", e);
        std::process::exit(1);
    }
}
