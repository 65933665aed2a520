use anyhow::Result;
use clap::Parser;
use std::path::Path;

mod cli;
mod commands;

use cost_estimator::{config, init_tracing};

/// Log level for non-interactive commands; falls back to "info" when the
/// configuration cannot be loaded (the command itself reports why)
fn log_level(config_path: &Path) -> String {
    config::load_config(config_path)
        .map(|cfg| cfg.logging.level)
        .unwrap_or_else(|_| "info".to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = cli::Cli::parse();

    // The form sets up its own file logging once it owns the terminal
    let command = args.get_command();
    if !matches!(command, cli::Commands::Run) {
        init_tracing(&log_level(&args.config));
    }

    // Dispatch to appropriate command handler
    match command {
        cli::Commands::Run => commands::run::execute(&args.config).await?,
        cli::Commands::Quote { rows } => commands::quote::execute(&args.config, rows).await?,
        cli::Commands::Catalog => commands::catalog::execute(&args.config).await?,
        cli::Commands::Config { action } => match action {
            cli::ConfigCommands::Show => commands::config::show(&args.config)?,
            cli::ConfigCommands::Validate => commands::config::validate(&args.config)?,
        },
        cli::Commands::Version => {
            println!("Cost Estimator v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
