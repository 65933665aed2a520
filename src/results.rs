//! Projection of a calculation result into displayable pieces
//!
//! Costs are always shown in USD with two decimals, whatever region the item
//! was priced in.

use crate::models::{CalculationResult, LineItem};

/// Shown when the backend returns no AI summary
pub const NO_SUMMARY_PLACEHOLDER: &str =
    "No AI summary available. If you configured Azure OpenAI keys, the backend will generate suggestions.";

/// Two fixed decimals, rounded once from the exact binary value
///
/// Values lying exactly halfway between two cents (odd multiples of 1/8,
/// e.g. 0.125) round away from zero; `{:.2}` alone would round them to even.
pub fn fixed_cents(value: f64) -> String {
    let eighths = value * 8.0;
    if eighths.fract() == 0.0 && eighths % 2.0 != 0.0 {
        // value * 100 is exact here
        return format!("{:.2}", (value * 100.0).round() / 100.0);
    }
    format!("{:.2}", value)
}

/// Round to cents the same way costs are displayed
pub fn round_cents(value: f64) -> f64 {
    fixed_cents(value).parse().unwrap_or(value)
}

/// Format a cost as "$" plus two fixed decimals
pub fn format_currency(value: f64) -> String {
    format!("${}", fixed_cents(value))
}

/// One line of the results table, already formatted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub resource_type: String,
    pub sku: String,
    pub region: String,
    pub quantity: String,
    pub hours: String,
    pub cost: String,
}

impl TableRow {
    fn from_item(item: &LineItem) -> Self {
        Self {
            resource_type: item.resource_type.clone().unwrap_or_default(),
            sku: item.sku.clone().unwrap_or_default(),
            region: item.region.clone().unwrap_or_default(),
            quantity: item.quantity.to_string(),
            hours: item.hours_per_month.to_string(),
            cost: format_currency(item.cost),
        }
    }

    pub fn cells(&self) -> [&str; 6] {
        [
            self.resource_type.as_str(),
            self.sku.as_str(),
            self.region.as_str(),
            self.quantity.as_str(),
            self.hours.as_str(),
            self.cost.as_str(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
}

/// Pie chart data, one slice per line item
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PieChart {
    pub slices: Vec<PieSlice>,
}

impl PieChart {
    pub fn from_items(items: &[LineItem]) -> Self {
        let slices = items
            .iter()
            .map(|item| PieSlice {
                label: format!(
                    "{} ({})",
                    item.sku.as_deref().unwrap_or_default(),
                    item.resource_type.as_deref().unwrap_or_default()
                ),
                value: round_cents(item.cost),
            })
            .collect();
        Self { slices }
    }

    pub fn total(&self) -> f64 {
        self.slices.iter().map(|s| s.value).sum()
    }

    /// Percentage of the whole taken by slice `index`
    pub fn share(&self, index: usize) -> Option<f64> {
        let slice = self.slices.get(index)?;
        let total = self.total();
        if total > 0.0 {
            Some(slice.value / total * 100.0)
        } else {
            Some(0.0)
        }
    }
}

/// Rendered state of the results area
///
/// Empty until the first successful calculation. Each [`ResultsView::apply`]
/// rebuilds everything; the previous chart is dropped, never patched.
#[derive(Debug, Clone, Default)]
pub struct ResultsView {
    table: Vec<TableRow>,
    chart: Option<PieChart>,
    summary: Option<String>,
    total: Option<String>,
    savings_estimate: Option<String>,
    hints: Vec<String>,
    generation: u64,
}

impl ResultsView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, result: &CalculationResult) {
        self.table = result.items.iter().map(TableRow::from_item).collect();

        // Replace the chart wholesale so no stale slices survive
        self.chart = Some(PieChart::from_items(&result.items));
        self.generation += 1;

        self.summary = Some(
            result
                .ai_summary
                .as_deref()
                .filter(|s| !s.is_empty())
                .unwrap_or(NO_SUMMARY_PLACEHOLDER)
                .to_string(),
        );

        self.total = result.total.map(format_currency);
        self.savings_estimate = result
            .savings_estimate
            .filter(|s| *s > 0.0)
            .map(format_currency);
        self.hints = result
            .hints
            .iter()
            .map(|hint| match hint.estimated_savings_percent {
                Some(pct) => format!(
                    "{}: {} (~{}%)",
                    hint.sku.as_deref().unwrap_or("-"),
                    hint.suggestion,
                    pct
                ),
                None => format!("{}: {}", hint.sku.as_deref().unwrap_or("-"), hint.suggestion),
            })
            .collect();

        tracing::debug!(
            rows = self.table.len(),
            generation = self.generation,
            "Results rendered"
        );
    }

    pub fn has_results(&self) -> bool {
        self.summary.is_some()
    }

    pub fn table(&self) -> &[TableRow] {
        &self.table
    }

    pub fn chart(&self) -> Option<&PieChart> {
        self.chart.as_ref()
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn total(&self) -> Option<&str> {
        self.total.as_deref()
    }

    pub fn savings_estimate(&self) -> Option<&str> {
        self.savings_estimate.as_deref()
    }

    pub fn hints(&self) -> &[String] {
        &self.hints
    }

    /// Number of charts built so far
    pub fn chart_generation(&self) -> u64 {
        self.generation
    }
}
