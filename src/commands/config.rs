use anyhow::Result;
use colored::Colorize;
use cost_estimator::config;
use std::path::Path;
use tracing::info;

/// Execute the config show command
///
/// Displays the effective configuration after defaults, file and environment
/// have been merged
pub fn show(path: &Path) -> Result<()> {
    println!("{}", "Loading configuration...".yellow());
    info!(path = %path.display(), "Loading configuration for display");

    let cfg = config::load_config(path)?;

    println!("{}", "Current Configuration:".green().bold());
    println!();

    let toml_string = toml::to_string_pretty(&cfg)?;
    println!("{}", toml_string);

    info!("Configuration displayed successfully");
    Ok(())
}

/// Execute the config validate command
pub fn validate(path: &Path) -> Result<()> {
    println!("{}", "Validating configuration...".yellow());
    info!(path = %path.display(), "Validating configuration file");

    let cfg = config::load_config(path)?;

    println!("{}", "✓ Configuration is valid".green());
    println!();
    println!("{}", "Summary:".bold());
    println!("  {}: {:?}", "Catalog".cyan(), cfg.catalog_source());
    println!("  {}: {}", "Calculation".cyan(), cfg.calculation_url());
    println!(
        "  {}: {}",
        "Timeout".cyan(),
        match cfg.calculation_timeout() {
            Some(timeout) => format!("{}s", timeout.as_secs()),
            None => "none".to_string(),
        }
    );
    println!("  {}: {}", "Log Level".cyan(), cfg.logging.level);

    info!("Configuration validation successful");
    Ok(())
}
