mod cli;
mod commands;
mod render;

use crate::cli::Cli;
use crate::commands::Context;
use clap::Parser;
use log::error;
use panel_console::ConsoleConfig;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::init_from_env(env_logger::Env::default().default_filter_or(level));

    // Load configuration
    let mut config = match ConsoleConfig::new() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };
    cli.apply_overrides(&mut config);

    let ctx = match Context::new(&config, cli.format) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Failed to initialize client: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = commands::run(cli.command, &ctx).await {
        eprintln!("✗ {}", e);
        std::process::exit(1);
    }
}
