//! Wire types for the calculation endpoint

use serde::{Deserialize, Serialize};

use crate::rows::ResourceType;

/// One flattened resource row as sent to the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRequest {
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub sku: String,
    pub region: String,
    pub quantity: u32,
    pub hours_per_month: u32,
}

/// Body of `POST /api/calc`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculationRequest {
    pub resources: Vec<ResourceRequest>,
}

/// One priced entry of a calculation result
///
/// `type` is kept as a plain string: the backend echoes whatever it was sent
/// and may answer `null` for fields it could not resolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(rename = "type", default)]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    pub quantity: f64,
    pub hours_per_month: f64,
    pub cost: f64,
}

/// Rule-based optimization hint emitted alongside the items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationHint {
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    pub suggestion: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_savings_percent: Option<f64>,
}

/// Response of `POST /api/calc`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<OptimizationHint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub savings_estimate: Option<f64>,
}
