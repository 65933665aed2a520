//! Pricing catalog model and loader
//!
//! The catalog is a static JSON document fetched once at startup. It maps each
//! resource type to its purchasable SKUs and carries a table of region price
//! multipliers. A failed load never aborts the caller: [`CatalogLoader::load`]
//! logs the failure and yields `None`, and the rest of the application falls
//! back to [`FALLBACK_REGION`] with no SKU choices.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

use crate::error::{EstimatorError, Result};

/// Region offered when no catalog is available
pub const FALLBACK_REGION: &str = "eastus";

const REGION_MULTIPLIERS_KEY: &str = "region_multipliers";

/// Descriptor of one purchasable SKU
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkuDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    /// Hourly unit price (vm)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hourly: Option<f64>,
    /// Monthly price per GB (storage)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_per_gb: Option<f64>,
    /// Flat monthly price (sqldb)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly: Option<f64>,
}

impl SkuDescriptor {
    /// Display label, or the SKU key when no (non-empty) label is set
    pub fn label<'a>(&'a self, key: &'a str) -> &'a str {
        match self.display.as_deref() {
            Some(display) if !display.is_empty() => display,
            _ => key,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkuEntry {
    pub key: String,
    pub descriptor: SkuDescriptor,
}

/// Read-only pricing catalog, in document order
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct PricingCatalog {
    types: Vec<(String, Vec<SkuEntry>)>,
    /// `None` when the document has no region table at all
    region_multipliers: Option<Vec<(String, f64)>>,
}

impl PricingCatalog {
    /// Parse a catalog document
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// SKUs listed under a resource type; empty if the type is absent
    pub fn skus(&self, resource_type: &str) -> &[SkuEntry] {
        self.types
            .iter()
            .find(|(name, _)| name == resource_type)
            .map(|(_, skus)| skus.as_slice())
            .unwrap_or(&[])
    }

    pub fn sku(&self, resource_type: &str, key: &str) -> Option<&SkuDescriptor> {
        self.skus(resource_type)
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| &entry.descriptor)
    }

    pub fn resource_types(&self) -> impl Iterator<Item = &str> {
        self.types.iter().map(|(name, _)| name.as_str())
    }

    /// Whether the document carries a region table, even an empty one
    pub fn has_region_table(&self) -> bool {
        self.region_multipliers.is_some()
    }

    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.region_multipliers
            .iter()
            .flatten()
            .map(|(name, _)| name.as_str())
    }

    pub fn region_multiplier(&self, region: &str) -> Option<f64> {
        self.region_multipliers
            .iter()
            .flatten()
            .find(|(name, _)| name == region)
            .map(|(_, multiplier)| *multiplier)
    }
}

impl TryFrom<Map<String, Value>> for PricingCatalog {
    type Error = String;

    fn try_from(document: Map<String, Value>) -> std::result::Result<Self, Self::Error> {
        let mut catalog = PricingCatalog::default();

        for (key, value) in document {
            if key == REGION_MULTIPLIERS_KEY {
                let regions = match value {
                    Value::Object(regions) => regions,
                    Value::Null => continue,
                    other => {
                        return Err(format!(
                            "{} must be an object, got {}",
                            REGION_MULTIPLIERS_KEY, other
                        ))
                    }
                };
                let mut table = Vec::with_capacity(regions.len());
                for (region, multiplier) in regions {
                    match multiplier.as_f64() {
                        Some(multiplier) => table.push((region, multiplier)),
                        None => tracing::warn!(
                            region = %region,
                            value = %multiplier,
                            "Skipping non-numeric region multiplier"
                        ),
                    }
                }
                catalog.region_multipliers = Some(table);
                continue;
            }

            let Value::Object(skus) = value else {
                tracing::debug!(key = %key, "Skipping non-object catalog entry");
                continue;
            };

            let entries = skus
                .into_iter()
                .map(|(sku, descriptor)| SkuEntry {
                    descriptor: serde_json::from_value(descriptor).unwrap_or_default(),
                    key: sku,
                })
                .collect();
            catalog.types.push((key, entries));
        }

        Ok(catalog)
    }
}

/// Where the catalog document lives
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogSource {
    Http(String),
    File(PathBuf),
}

/// One-shot catalog loader
pub struct CatalogLoader {
    client: Client,
    source: CatalogSource,
}

impl CatalogLoader {
    pub fn new(source: CatalogSource) -> Self {
        Self {
            client: Client::new(),
            source,
        }
    }

    pub fn source(&self) -> &CatalogSource {
        &self.source
    }

    /// Load the catalog, degrading to `None` on any failure
    ///
    /// The failure is logged and never returned to the caller.
    pub async fn load(&self) -> Option<PricingCatalog> {
        match self.try_load().await {
            Ok(catalog) => {
                tracing::info!(
                    source = ?self.source,
                    types = catalog.types.len(),
                    regions = catalog.regions().count(),
                    "Pricing catalog loaded"
                );
                Some(catalog)
            }
            Err(e) => {
                tracing::error!(
                    source = ?self.source,
                    error = %e,
                    kind = e.kind(),
                    "Failed loading pricing catalog"
                );
                None
            }
        }
    }

    async fn try_load(&self) -> Result<PricingCatalog> {
        let body = match &self.source {
            CatalogSource::Http(url) => {
                let response = self.client.get(url).send().await?;
                let status = response.status();
                if !status.is_success() {
                    let body = response.text().await.unwrap_or_default();
                    return Err(EstimatorError::UpstreamStatus { status, body });
                }
                response.text().await?
            }
            CatalogSource::File(path) => tokio::fs::read_to_string(path).await?,
        };

        PricingCatalog::from_json(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "vm": {
            "standard_b2s": {"display": "B2s", "hourly": 0.0416},
            "standard_b1s": {"display": "B1s", "hourly": 0.0104},
            "standard_d2s_v3": {"hourly": 0.096}
        },
        "storage": {"hot": {"display": "Hot LRS", "monthly_per_gb": 0.0184}},
        "currency": "USD",
        "region_multipliers": {"westeurope": 1.1, "eastus": 1}
    }"#;

    #[test]
    fn test_catalog_preserves_document_order() {
        let catalog = PricingCatalog::from_json(SAMPLE).unwrap();

        let keys: Vec<&str> = catalog.skus("vm").iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["standard_b2s", "standard_b1s", "standard_d2s_v3"]);

        let regions: Vec<&str> = catalog.regions().collect();
        assert_eq!(regions, vec!["westeurope", "eastus"]);
    }

    #[test]
    fn test_catalog_skips_non_object_entries() {
        let catalog = PricingCatalog::from_json(SAMPLE).unwrap();
        let types: Vec<&str> = catalog.resource_types().collect();
        assert_eq!(types, vec!["vm", "storage"]);
    }

    #[test]
    fn test_missing_type_yields_no_skus() {
        let catalog = PricingCatalog::from_json(SAMPLE).unwrap();
        assert!(catalog.skus("sqldb").is_empty());
    }

    #[test]
    fn test_label_falls_back_to_key() {
        let catalog = PricingCatalog::from_json(SAMPLE).unwrap();
        let descriptor = catalog.sku("vm", "standard_d2s_v3").unwrap();
        assert_eq!(descriptor.label("standard_d2s_v3"), "standard_d2s_v3");

        let empty = SkuDescriptor {
            display: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(empty.label("k"), "k");
    }

    #[test]
    fn test_region_multiplier_lookup() {
        let catalog = PricingCatalog::from_json(SAMPLE).unwrap();
        assert_eq!(catalog.region_multiplier("westeurope"), Some(1.1));
        assert_eq!(catalog.region_multiplier("eastus"), Some(1.0));
        assert_eq!(catalog.region_multiplier("mars"), None);
    }

    #[test]
    fn test_non_numeric_multiplier_is_skipped() {
        let catalog = PricingCatalog::from_json(
            r#"{"vm": {"b1s": {}}, "region_multipliers": {"eastus": null, "westus": "one", "centralindia": 0.95}}"#,
        )
        .unwrap();
        assert_eq!(catalog.skus("vm").len(), 1);
        assert_eq!(catalog.regions().collect::<Vec<_>>(), vec!["centralindia"]);
        assert_eq!(catalog.region_multiplier("eastus"), None);
    }

    #[test]
    fn test_region_table_presence() {
        let empty = PricingCatalog::from_json(r#"{"region_multipliers": {}}"#).unwrap();
        assert!(empty.has_region_table());
        assert_eq!(empty.regions().count(), 0);

        let absent = PricingCatalog::from_json(r#"{"vm": {}}"#).unwrap();
        assert!(!absent.has_region_table());
    }

    #[test]
    fn test_non_object_document_is_rejected() {
        assert!(PricingCatalog::from_json("[1, 2, 3]").is_err());
    }

    #[tokio::test]
    async fn test_missing_file_degrades_to_none() {
        let loader = CatalogLoader::new(CatalogSource::File(PathBuf::from(
            "/nonexistent/pricing.json",
        )));
        assert!(loader.load().await.is_none());
    }
}
