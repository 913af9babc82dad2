use serde::{Deserialize, Serialize};
use validator::Validate;

use super::null_as_default;
use crate::resource::{Resource, ResourceKind};
use crate::validation::validate_required_text;

/// Stocked tea line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stock: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub threshold: i32,
}

impl InventoryItem {
    /// Stock has dropped below the reorder threshold.
    pub fn is_low_stock(&self) -> bool {
        self.stock < self.threshold
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct InventoryForm {
    #[serde(default)]
    #[validate(custom = "validate_required_text")]
    pub name: String,
    #[serde(default)]
    #[validate(required, range(min = 0, message = "Stock cannot be negative"))]
    pub stock: Option<i32>,
    #[serde(default)]
    #[validate(required, range(min = 0, message = "Threshold cannot be negative"))]
    pub threshold: Option<i32>,
}

impl Resource for InventoryItem {
    const KIND: ResourceKind = ResourceKind::Inventory;
    type Form = InventoryForm;

    fn id(&self) -> &str {
        &self.id
    }

    fn to_form(&self) -> InventoryForm {
        InventoryForm {
            name: self.name.clone(),
            stock: Some(self.stock),
            threshold: Some(self.threshold),
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name]
    }

    fn summary_line(&self) -> String {
        let flag = if self.is_low_stock() { " (low stock)" } else { "" };
        format!(
            "{} | {} | stock {} / threshold {}{}",
            self.id, self.name, self.stock, self.threshold, flag
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InventorySummary {
    pub total_items: usize,
    pub total_stock: i64,
    pub low_stock: Vec<InventoryItem>,
}

impl InventorySummary {
    pub fn from_items(items: &[InventoryItem]) -> Self {
        Self {
            total_items: items.len(),
            total_stock: items.iter().map(|item| i64::from(item.stock)).sum(),
            low_stock: items.iter().filter(|item| item.is_low_stock()).cloned().collect(),
        }
    }
}
