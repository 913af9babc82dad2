use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{null_as_default, ActivityStatus};
use crate::resource::{Resource, ResourceKind};
use crate::validation::validate_required_text;

/// Tea-leaf supplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(
        default,
        rename = "supplierID",
        alias = "supplierId",
        deserialize_with = "null_as_default"
    )]
    pub supplier_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(default)]
    pub status: Option<ActivityStatus>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub orders: i32,
}

impl Supplier {
    pub fn is_active(&self) -> bool {
        self.status == Some(ActivityStatus::Active)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SupplierForm {
    #[serde(default)]
    #[validate(custom = "validate_required_text")]
    pub name: String,
    #[serde(default, rename = "supplierID", alias = "supplierId")]
    #[validate(custom = "validate_required_text")]
    pub supplier_id: String,
    #[serde(default)]
    #[validate(custom = "validate_required_text")]
    pub location: String,
    #[serde(default)]
    #[validate(required)]
    pub status: Option<ActivityStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, message = "Orders cannot be negative"))]
    pub orders: Option<i32>,
}

impl Resource for Supplier {
    const KIND: ResourceKind = ResourceKind::Suppliers;
    type Form = SupplierForm;

    fn id(&self) -> &str {
        &self.id
    }

    fn to_form(&self) -> SupplierForm {
        SupplierForm {
            name: self.name.clone(),
            supplier_id: self.supplier_id.clone(),
            location: self.location.clone(),
            status: self.status,
            orders: Some(self.orders),
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name, &self.supplier_id, &self.location]
    }

    fn summary_line(&self) -> String {
        let status = self.status.map(|s| s.to_string()).unwrap_or_else(|| "-".into());
        format!(
            "{} | {} ({}) | {} | {} | {} orders",
            self.id, self.name, self.supplier_id, self.location, status, self.orders
        )
    }
}

/// Figures shown above the supplier list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SupplierSummary {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub total_orders: i64,
}

impl SupplierSummary {
    pub fn from_suppliers(suppliers: &[Supplier]) -> Self {
        let active = suppliers.iter().filter(|s| s.is_active()).count();
        Self {
            total: suppliers.len(),
            active,
            inactive: suppliers.len() - active,
            total_orders: suppliers.iter().map(|s| i64::from(s.orders)).sum(),
        }
    }
}
