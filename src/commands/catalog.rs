//! Catalog command implementation
//!
//! Loads the pricing catalog the same way the form does and lists its
//! resource types, SKUs and region multipliers.

use anyhow::Result;
use colored::Colorize;
use cost_estimator::{
    catalog::{CatalogLoader, PricingCatalog, SkuDescriptor},
    config,
};
use std::path::Path;

pub async fn execute(config_path: &Path) -> Result<()> {
    let cfg = config::load_config(config_path)?;
    let loader = CatalogLoader::new(cfg.catalog_source());

    let Some(catalog) = loader.load().await else {
        anyhow::bail!(
            "Pricing catalog could not be loaded from {:?}",
            loader.source()
        );
    };

    print_catalog(&catalog);
    Ok(())
}

fn print_catalog(catalog: &PricingCatalog) {
    for resource_type in catalog.resource_types() {
        println!("{}", resource_type.to_uppercase().cyan().bold());
        for entry in catalog.skus(resource_type) {
            println!(
                "  {:<24} {:<20} {}",
                entry.key,
                entry.descriptor.label(&entry.key),
                price_text(&entry.descriptor).dimmed()
            );
        }
    }

    println!();
    println!("{}", "Regions".cyan().bold());
    for region in catalog.regions() {
        let multiplier = catalog.region_multiplier(region).unwrap_or(1.0);
        println!("  {:<24} x{}", region, multiplier);
    }
}

fn price_text(descriptor: &SkuDescriptor) -> String {
    let mut parts = Vec::new();
    if let Some(hourly) = descriptor.hourly {
        parts.push(format!("{}/hour", hourly));
    }
    if let Some(per_gb) = descriptor.monthly_per_gb {
        parts.push(format!("{}/GB-month", per_gb));
    }
    if let Some(monthly) = descriptor.monthly {
        parts.push(format!("{}/month", monthly));
    }
    parts.join(", ")
}
