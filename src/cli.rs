use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::quote::RowSpec;

#[derive(Parser, Debug)]
#[command(name = "cost-estimator", version, about = "Cloud cost estimation form")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "estimator.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Open the interactive estimation form (default)
    Run,

    /// Price resources without the form
    Quote {
        /// Resource row as TYPE:SKU:REGION[:QTY[:HOURS]] (repeatable)
        #[arg(short, long = "row", required = true)]
        rows: Vec<RowSpec>,
    },

    /// List resource types, SKUs and regions from the pricing catalog
    Catalog,

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Display the effective configuration
    Show,

    /// Validate configuration file
    Validate,
}

impl Cli {
    /// Get the command to execute, defaulting to Run if none provided
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Run)
    }
}
