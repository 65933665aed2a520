//! Quote command implementation
//!
//! Headless counterpart of the form: rows given on the command line go
//! through the same row manager, calculation client and results view, and
//! the rendered results are printed to stdout.

use anyhow::Result;
use colored::Colorize;
use cost_estimator::{
    catalog::{CatalogLoader, PricingCatalog},
    client::CalculationClient,
    config,
    results::ResultsView,
    rows::{ResourceType, RowManager},
};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

/// One `--row TYPE:SKU:REGION[:QTY[:HOURS]]` argument
#[derive(Debug, Clone, PartialEq)]
pub struct RowSpec {
    pub resource_type: ResourceType,
    pub sku: Option<String>,
    pub region: Option<String>,
    pub quantity: Option<String>,
    pub hours: Option<String>,
}

impl FromStr for RowSpec {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut parts = s.split(':');
        let resource_type: ResourceType = parts
            .next()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| "Row spec must start with a resource type".to_string())?
            .parse()?;

        let mut next_part = || {
            parts
                .next()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
        };
        let spec = RowSpec {
            resource_type,
            sku: next_part(),
            region: next_part(),
            quantity: next_part(),
            hours: next_part(),
        };

        if parts.next().is_some() {
            return Err(format!(
                "Too many fields in row spec '{}'. Expected TYPE:SKU:REGION[:QTY[:HOURS]]",
                s
            ));
        }
        Ok(spec)
    }
}

/// Execute the quote command
pub async fn execute(config_path: &Path, specs: Vec<RowSpec>) -> Result<()> {
    let cfg = config::load_config(config_path)?;

    let catalog = CatalogLoader::new(cfg.catalog_source())
        .load()
        .await
        .map(Arc::new);
    if catalog.is_none() {
        println!(
            "{}",
            "Pricing catalog unavailable; SKU choices are empty".yellow()
        );
    }

    let rows = build_rows(catalog, &specs)?;
    let request = rows.collect_rows()?;

    let client = CalculationClient::new(cfg.calculation_url(), cfg.calculation_timeout())?;
    let result = client.submit(&request).await?;

    let mut view = ResultsView::new();
    view.apply(&result);
    print_results(&view);

    Ok(())
}

fn build_rows(
    catalog: Option<Arc<PricingCatalog>>,
    specs: &[RowSpec],
) -> Result<RowManager> {
    let mut rows = RowManager::new(catalog);

    for spec in specs {
        let id = rows.add_row();
        rows.set_type(id, spec.resource_type)?;
        if let Some(sku) = &spec.sku {
            rows.set_sku(id, sku)?;
        }
        if let Some(region) = &spec.region {
            rows.set_region(id, region)?;
        }
        if let Some(quantity) = &spec.quantity {
            rows.set_quantity(id, quantity.as_str())?;
        }
        if let Some(hours) = &spec.hours {
            rows.set_hours(id, hours.as_str())?;
        }
    }

    Ok(rows)
}

/// Plain-text report lines for a rendered result
fn report_lines(view: &ResultsView) -> Vec<String> {
    let mut lines = vec![format!(
        "{:<8} {:<20} {:<14} {:>8} {:>8} {:>12}",
        "TYPE", "SKU", "REGION", "QTY", "HOURS", "COST"
    )];

    for row in view.table() {
        lines.push(format!(
            "{:<8} {:<20} {:<14} {:>8} {:>8} {:>12}",
            row.resource_type, row.sku, row.region, row.quantity, row.hours, row.cost
        ));
    }

    if let Some(total) = view.total() {
        lines.push(format!("{:>75}", format!("TOTAL {}", total)));
    }

    if let Some(chart) = view.chart() {
        lines.push(String::new());
        for (index, slice) in chart.slices.iter().enumerate() {
            lines.push(format!(
                "{:<30} {:>10.2} {:>6.1}%",
                slice.label,
                slice.value,
                chart.share(index).unwrap_or(0.0)
            ));
        }
    }

    lines
}

fn print_results(view: &ResultsView) {
    println!();
    println!("{}", "Itemized Costs".green().bold());
    for line in report_lines(view) {
        println!("{}", line);
    }

    if let Some(savings) = view.savings_estimate() {
        println!();
        println!("{} {}", "Potential savings:".cyan(), savings.green());
    }
    for hint in view.hints() {
        println!("  • {}", hint.dimmed());
    }

    if let Some(summary) = view.summary() {
        println!();
        println!("{}", "AI Summary".green().bold());
        println!("{}", summary);
    }
}
