//! Resource row view models
//!
//! Each row the user adds is kept as a [`ResourceRow`] in an explicit list
//! owned by [`RowManager`]. The terminal form is a projection of that list, so
//! every operation here can be exercised without a terminal.
//!
//! A row's SKU options always belong to its current type: changing the type
//! rebuilds the option set and drops the previous SKU choice.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::catalog::{PricingCatalog, FALLBACK_REGION};
use crate::error::{EstimatorError, Result};
use crate::models::{CalculationRequest, ResourceRequest};

pub const DEFAULT_QUANTITY: u32 = 1;
pub const DEFAULT_HOURS: u32 = 720;

/// Opaque, time-based row identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RowId(pub u64);

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle returned when a row is created
pub type RowHandle = RowId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Vm,
    Storage,
    Sqldb,
}

impl ResourceType {
    pub const ALL: [ResourceType; 3] = [ResourceType::Vm, ResourceType::Storage, ResourceType::Sqldb];

    /// Catalog / wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vm => "vm",
            Self::Storage => "storage",
            Self::Sqldb => "sqldb",
        }
    }

    /// Option text shown in the form
    pub fn label(&self) -> &'static str {
        match self {
            Self::Vm => "VM",
            Self::Storage => "STORAGE",
            Self::Sqldb => "SQLDB",
        }
    }

    /// Next type in option order (wrapping)
    pub fn next(&self) -> Self {
        match self {
            Self::Vm => Self::Storage,
            Self::Storage => Self::Sqldb,
            Self::Sqldb => Self::Vm,
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "vm" => Ok(Self::Vm),
            "storage" => Ok(Self::Storage),
            "sqldb" => Ok(Self::Sqldb),
            _ => Err(format!(
                "Invalid resource type: '{}'. Must be one of: vm, storage, sqldb",
                s
            )),
        }
    }
}

/// Editable fields of a row, in form order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowField {
    Type,
    Sku,
    Region,
    Quantity,
    Hours,
}

impl RowField {
    pub const ALL: [RowField; 5] = [
        RowField::Type,
        RowField::Sku,
        RowField::Region,
        RowField::Quantity,
        RowField::Hours,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Sku => "sku",
            Self::Region => "region",
            Self::Quantity => "quantity",
            Self::Hours => "hours",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Self::Type => Self::Sku,
            Self::Sku => Self::Region,
            Self::Region => Self::Quantity,
            Self::Quantity => Self::Hours,
            Self::Hours => Self::Type,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Self::Type => Self::Hours,
            Self::Sku => Self::Type,
            Self::Region => Self::Sku,
            Self::Quantity => Self::Region,
            Self::Hours => Self::Quantity,
        }
    }

    /// Whether the field is a choice list rather than free text
    pub fn is_choice(&self) -> bool {
        matches!(self, Self::Type | Self::Sku | Self::Region)
    }
}

impl fmt::Display for RowField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One entry of a choice list: submitted value plus shown text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub text: String,
}

impl SelectOption {
    fn plain(value: &str) -> Self {
        Self {
            value: value.to_string(),
            text: value.to_string(),
        }
    }
}

/// Build the SKU choices for a type
///
/// Without a catalog the list is empty; a type missing from the catalog also
/// yields an empty list.
pub fn populate_sku_options(
    catalog: Option<&PricingCatalog>,
    resource_type: ResourceType,
) -> Vec<SelectOption> {
    let Some(catalog) = catalog else {
        return Vec::new();
    };

    catalog
        .skus(resource_type.as_str())
        .iter()
        .map(|entry| SelectOption {
            value: entry.key.clone(),
            text: entry.descriptor.label(&entry.key).to_string(),
        })
        .collect()
}

/// Build the region choices
///
/// Without a catalog, or with a catalog that has no region table, the single
/// fallback region is offered. An empty region table yields no choices.
pub fn populate_region_options(catalog: Option<&PricingCatalog>) -> Vec<SelectOption> {
    match catalog {
        Some(c) if c.has_region_table() => c.regions().map(SelectOption::plain).collect(),
        _ => vec![SelectOption::plain(FALLBACK_REGION)],
    }
}

/// View model of one resource row
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceRow {
    id: RowId,
    resource_type: ResourceType,
    sku_options: Vec<SelectOption>,
    sku: Option<String>,
    region_options: Vec<SelectOption>,
    region: Option<String>,
    quantity: String,
    hours: String,
}

impl ResourceRow {
    fn new(id: RowId, catalog: Option<&PricingCatalog>) -> Self {
        let region_options = populate_region_options(catalog);
        let region = region_options.first().map(|o| o.value.clone());

        let mut row = Self {
            id,
            resource_type: ResourceType::Vm,
            sku_options: Vec::new(),
            sku: None,
            region_options,
            region,
            quantity: DEFAULT_QUANTITY.to_string(),
            hours: DEFAULT_HOURS.to_string(),
        };
        row.apply_type(ResourceType::Vm, catalog);
        row
    }

    fn apply_type(&mut self, resource_type: ResourceType, catalog: Option<&PricingCatalog>) {
        self.resource_type = resource_type;
        self.sku_options = populate_sku_options(catalog, resource_type);
        self.sku = self.sku_options.first().map(|o| o.value.clone());
    }

    pub fn id(&self) -> RowId {
        self.id
    }

    pub fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    pub fn sku_options(&self) -> &[SelectOption] {
        &self.sku_options
    }

    pub fn sku(&self) -> Option<&str> {
        self.sku.as_deref()
    }

    /// Shown text of the selected SKU
    pub fn sku_text(&self) -> Option<&str> {
        let sku = self.sku.as_deref()?;
        self.sku_options
            .iter()
            .find(|o| o.value == sku)
            .map(|o| o.text.as_str())
    }

    pub fn region_options(&self) -> &[SelectOption] {
        &self.region_options
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// Raw quantity input text
    pub fn quantity(&self) -> &str {
        &self.quantity
    }

    /// Raw hours-per-month input text
    pub fn hours(&self) -> &str {
        &self.hours
    }

    /// Flatten the row into its wire shape
    pub fn to_request(&self) -> Result<ResourceRequest> {
        Ok(ResourceRequest {
            resource_type: self.resource_type,
            sku: self.sku.clone().unwrap_or_default(),
            region: self.region.clone().unwrap_or_default(),
            quantity: parse_count(&self.quantity, DEFAULT_QUANTITY, self.id, RowField::Quantity)?,
            hours_per_month: parse_count(&self.hours, DEFAULT_HOURS, self.id, RowField::Hours)?,
        })
    }
}

/// Empty input means the default; anything else must be a positive integer
fn parse_count(raw: &str, default: u32, row: RowId, field: RowField) -> Result<u32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(default);
    }

    match trimmed.parse::<u32>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(EstimatorError::InvalidNumber {
            row,
            field,
            value: raw.to_string(),
        }),
    }
}

fn next_option(options: &[SelectOption], current: Option<&str>) -> Option<String> {
    if options.is_empty() {
        return None;
    }
    let next = current
        .and_then(|c| options.iter().position(|o| o.value == c))
        .map(|i| (i + 1) % options.len())
        .unwrap_or(0);
    Some(options[next].value.clone())
}

/// Ordered list of resource rows bound to one catalog
pub struct RowManager {
    catalog: Option<Arc<PricingCatalog>>,
    rows: Vec<ResourceRow>,
    last_id: u64,
}

impl RowManager {
    pub fn new(catalog: Option<Arc<PricingCatalog>>) -> Self {
        Self {
            catalog,
            rows: Vec::new(),
            last_id: 0,
        }
    }

    pub fn catalog(&self) -> Option<&PricingCatalog> {
        self.catalog.as_deref()
    }

    pub fn rows(&self) -> &[ResourceRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, id: RowId) -> Option<&ResourceRow> {
        self.rows.iter().find(|r| r.id == id)
    }

    /// Add a row with a fresh time-based identifier
    pub fn add_row(&mut self) -> RowHandle {
        let now = chrono::Utc::now().timestamp_millis().max(0) as u64;
        self.create_row(RowId(now))
    }

    /// Append a row with default selections
    ///
    /// Identifiers stay unique within the manager: an id that is already
    /// taken (or older than the last one handed out) is bumped past it.
    pub fn create_row(&mut self, id: RowId) -> RowHandle {
        let id = if self.rows.iter().any(|r| r.id == id) || id.0 <= self.last_id {
            self.next_free_id()
        } else {
            id
        };
        self.last_id = self.last_id.max(id.0);

        let row = ResourceRow::new(id, self.catalog.as_deref());
        tracing::debug!(
            row = %id,
            sku = ?row.sku,
            region = ?row.region,
            "Resource row created"
        );
        self.rows.push(row);
        id
    }

    fn next_free_id(&self) -> RowId {
        match self.last_id.checked_add(1) {
            Some(next) => RowId(next),
            // Ids are exhausted at the top; reuse the lowest one not in use
            None => (0..=u64::MAX)
                .map(RowId)
                .find(|candidate| self.rows.iter().all(|r| r.id != *candidate))
                .unwrap_or(RowId(0)),
        }
    }

    /// Detach a row; siblings keep their identifiers and values
    pub fn remove_row(&mut self, id: RowHandle) -> Result<ResourceRow> {
        let index = self.index_of(id)?;
        tracing::debug!(row = %id, "Resource row removed");
        Ok(self.rows.remove(index))
    }

    /// Switch the row's type and rebuild its SKU choices
    pub fn set_type(&mut self, id: RowId, resource_type: ResourceType) -> Result<()> {
        let catalog = self.catalog.clone();
        let row = self.row_mut(id)?;
        row.apply_type(resource_type, catalog.as_deref());
        Ok(())
    }

    pub fn set_sku(&mut self, id: RowId, sku: &str) -> Result<()> {
        let row = self.row_mut(id)?;
        if !row.sku_options.iter().any(|o| o.value == sku) {
            return Err(EstimatorError::UnknownOption {
                row: id,
                field: RowField::Sku,
                value: sku.to_string(),
            });
        }
        row.sku = Some(sku.to_string());
        Ok(())
    }

    pub fn set_region(&mut self, id: RowId, region: &str) -> Result<()> {
        let row = self.row_mut(id)?;
        if !row.region_options.iter().any(|o| o.value == region) {
            return Err(EstimatorError::UnknownOption {
                row: id,
                field: RowField::Region,
                value: region.to_string(),
            });
        }
        row.region = Some(region.to_string());
        Ok(())
    }

    /// Store raw quantity text; it is validated when rows are collected
    pub fn set_quantity(&mut self, id: RowId, text: impl Into<String>) -> Result<()> {
        self.row_mut(id)?.quantity = text.into();
        Ok(())
    }

    /// Store raw hours text; it is validated when rows are collected
    pub fn set_hours(&mut self, id: RowId, text: impl Into<String>) -> Result<()> {
        self.row_mut(id)?.hours = text.into();
        Ok(())
    }

    /// Move a choice field to its next option (wrapping)
    pub fn cycle_choice(&mut self, id: RowId, field: RowField) -> Result<()> {
        match field {
            RowField::Type => {
                let next = self.row_mut(id)?.resource_type.next();
                self.set_type(id, next)
            }
            RowField::Sku => {
                let row = self.row_mut(id)?;
                row.sku = next_option(&row.sku_options, row.sku.as_deref());
                Ok(())
            }
            RowField::Region => {
                let row = self.row_mut(id)?;
                row.region = next_option(&row.region_options, row.region.as_deref());
                Ok(())
            }
            RowField::Quantity | RowField::Hours => Ok(()),
        }
    }

    /// Read every attached row, in order, into a request payload
    pub fn collect_rows(&self) -> Result<CalculationRequest> {
        let resources = self
            .rows
            .iter()
            .map(ResourceRow::to_request)
            .collect::<Result<Vec<_>>>()?;
        Ok(CalculationRequest { resources })
    }

    fn index_of(&self, id: RowId) -> Result<usize> {
        self.rows
            .iter()
            .position(|r| r.id == id)
            .ok_or(EstimatorError::UnknownRow(id))
    }

    fn row_mut(&mut self, id: RowId) -> Result<&mut ResourceRow> {
        let index = self.index_of(id)?;
        Ok(&mut self.rows[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Arc<PricingCatalog> {
        Arc::new(
            PricingCatalog::from_json(
                r#"{
                    "vm": {"b1s": {"display": "B1s"}, "d2s": {"display": "D2s v3"}},
                    "storage": {"hot": {"display": "Hot LRS"}, "cool": {}},
                    "sqldb": {"s0": {"display": "S0"}},
                    "region_multipliers": {"eastus": 1, "westeurope": 1.1}
                }"#,
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_populate_sku_options_for_every_type() {
        let catalog = catalog();
        for resource_type in ResourceType::ALL {
            let options = populate_sku_options(Some(&catalog), resource_type);
            let expected: Vec<&str> = catalog
                .skus(resource_type.as_str())
                .iter()
                .map(|e| e.key.as_str())
                .collect();
            let values: Vec<&str> = options.iter().map(|o| o.value.as_str()).collect();
            assert_eq!(values, expected);
        }

        let storage = populate_sku_options(Some(&catalog), ResourceType::Storage);
        assert_eq!(storage[0].text, "Hot LRS");
        assert_eq!(storage[1].text, "cool");
    }

    #[test]
    fn test_populate_sku_options_without_catalog() {
        assert!(populate_sku_options(None, ResourceType::Vm).is_empty());
    }

    #[test]
    fn test_region_options_fall_back_without_catalog() {
        let options = populate_region_options(None);
        assert_eq!(options, vec![SelectOption::plain(FALLBACK_REGION)]);
    }

    #[test]
    fn test_create_row_defaults() {
        let mut manager = RowManager::new(Some(catalog()));
        let id = manager.create_row(RowId(100));
        let row = manager.get(id).unwrap();

        assert_eq!(row.resource_type(), ResourceType::Vm);
        assert_eq!(row.sku(), Some("b1s"));
        assert_eq!(row.sku_text(), Some("B1s"));
        assert_eq!(row.region(), Some("eastus"));
        assert_eq!(row.quantity(), "1");
        assert_eq!(row.hours(), "720");
    }

    #[test]
    fn test_create_row_without_catalog() {
        let mut manager = RowManager::new(None);
        let id = manager.create_row(RowId(1));

        let request = manager.collect_rows().unwrap();
        let resource = &request.resources[0];
        assert_eq!(manager.get(id).unwrap().sku(), None);
        assert_eq!(resource.sku, "");
        assert_eq!(resource.region, "eastus");
    }

    #[test]
    fn test_set_type_replaces_sku_options() {
        let mut manager = RowManager::new(Some(catalog()));
        let id = manager.create_row(RowId(1));
        manager.set_sku(id, "d2s").unwrap();

        manager.set_type(id, ResourceType::Sqldb).unwrap();
        let row = manager.get(id).unwrap();
        let values: Vec<&str> = row.sku_options().iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, vec!["s0"]);
        assert_eq!(row.sku(), Some("s0"));
    }

    #[test]
    fn test_set_sku_rejects_option_of_other_type() {
        let mut manager = RowManager::new(Some(catalog()));
        let id = manager.create_row(RowId(1));

        let err = manager.set_sku(id, "hot").unwrap_err();
        assert!(matches!(err, EstimatorError::UnknownOption { field: RowField::Sku, .. }));
        assert_eq!(manager.get(id).unwrap().sku(), Some("b1s"));
    }

    #[test]
    fn test_collect_rows_empty() {
        let manager = RowManager::new(Some(catalog()));
        assert!(manager.collect_rows().unwrap().resources.is_empty());
    }

    #[test]
    fn test_collect_rows_in_order() {
        let mut manager = RowManager::new(Some(catalog()));
        let first = manager.create_row(RowId(1));
        let second = manager.create_row(RowId(2));
        manager.set_type(second, ResourceType::Storage).unwrap();
        manager.set_quantity(second, "250").unwrap();
        manager.set_region(first, "westeurope").unwrap();

        let resources = manager.collect_rows().unwrap().resources;
        assert_eq!(resources.len(), 2);
        assert_eq!(resources[0].region, "westeurope");
        assert_eq!(resources[1].resource_type, ResourceType::Storage);
        assert_eq!(resources[1].sku, "hot");
        assert_eq!(resources[1].quantity, 250);
    }

    #[test]
    fn test_empty_fields_use_defaults() {
        let mut manager = RowManager::new(Some(catalog()));
        let id = manager.create_row(RowId(1));
        manager.set_quantity(id, "").unwrap();
        manager.set_hours(id, "  ").unwrap();

        let resource = &manager.collect_rows().unwrap().resources[0];
        assert_eq!(resource.quantity, 1);
        assert_eq!(resource.hours_per_month, 720);
    }

    #[test]
    fn test_invalid_numbers_are_rejected() {
        let mut manager = RowManager::new(Some(catalog()));
        let id = manager.create_row(RowId(7));

        for bad in ["abc", "0", "-3", "1.5"] {
            manager.set_hours(id, bad).unwrap();
            let err = manager.collect_rows().unwrap_err();
            match err {
                EstimatorError::InvalidNumber { row, field, value } => {
                    assert_eq!(row, RowId(7));
                    assert_eq!(field, RowField::Hours);
                    assert_eq!(value, bad);
                }
                other => panic!("Expected InvalidNumber, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_remove_row_leaves_siblings_untouched() {
        let mut manager = RowManager::new(Some(catalog()));
        let a = manager.create_row(RowId(1));
        let b = manager.create_row(RowId(2));
        let c = manager.create_row(RowId(3));
        manager.set_quantity(c, "5").unwrap();

        manager.remove_row(b).unwrap();

        let ids: Vec<RowId> = manager.rows().iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec![a, c]);
        let resources = manager.collect_rows().unwrap().resources;
        assert_eq!(resources.len(), 2);
        assert_eq!(resources[1].quantity, 5);

        assert!(matches!(manager.remove_row(b), Err(EstimatorError::UnknownRow(_))));
    }

    #[test]
    fn test_row_ids_stay_unique() {
        let mut manager = RowManager::new(None);
        let first = manager.create_row(RowId(10));
        let duplicate = manager.create_row(RowId(10));
        let a = manager.add_row();
        let b = manager.add_row();

        assert_ne!(first, duplicate);
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn test_row_ids_past_the_top_stay_unique() {
        let mut manager = RowManager::new(None);
        let top = manager.create_row(RowId(u64::MAX));
        let next = manager.create_row(RowId(5));
        let another = manager.create_row(RowId(5));

        assert_eq!(top, RowId(u64::MAX));
        assert_ne!(next, top);
        assert_ne!(another, next);
        assert_ne!(another, top);
        assert_eq!(manager.len(), 3);
    }

    #[test]
    fn test_empty_region_table_gives_no_regions() {
        let catalog = PricingCatalog::from_json(
            r#"{"vm": {"b1s": {}}, "region_multipliers": {}}"#,
        )
        .unwrap();
        assert!(populate_region_options(Some(&catalog)).is_empty());

        let mut manager = RowManager::new(Some(Arc::new(catalog)));
        let id = manager.create_row(RowId(1));
        assert_eq!(manager.get(id).unwrap().region(), None);
        let resources = manager.collect_rows().unwrap().resources;
        assert_eq!(resources[0].region, "");
        assert_eq!(resources[0].sku, "b1s");
    }

    #[test]
    fn test_missing_region_table_falls_back() {
        let catalog = PricingCatalog::from_json(r#"{"vm": {"b1s": {}}}"#).unwrap();
        assert_eq!(
            populate_region_options(Some(&catalog)),
            vec![SelectOption::plain(FALLBACK_REGION)]
        );
    }

    #[test]
    fn test_cycle_choice_wraps() {
        let mut manager = RowManager::new(Some(catalog()));
        let id = manager.create_row(RowId(1));

        manager.cycle_choice(id, RowField::Sku).unwrap();
        assert_eq!(manager.get(id).unwrap().sku(), Some("d2s"));
        manager.cycle_choice(id, RowField::Sku).unwrap();
        assert_eq!(manager.get(id).unwrap().sku(), Some("b1s"));

        manager.cycle_choice(id, RowField::Type).unwrap();
        assert_eq!(manager.get(id).unwrap().resource_type(), ResourceType::Storage);
        assert_eq!(manager.get(id).unwrap().sku(), Some("hot"));
    }

    #[test]
    fn test_resource_type_parsing() {
        assert_eq!("VM".parse::<ResourceType>().unwrap(), ResourceType::Vm);
        assert_eq!("sqldb".parse::<ResourceType>().unwrap(), ResourceType::Sqldb);
        assert!("gpu".parse::<ResourceType>().is_err());
    }
}
