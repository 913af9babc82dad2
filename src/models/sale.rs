use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

use super::{date_format, decimal_null_as_zero, null_as_default};
use crate::resource::{Resource, ResourceKind};
use crate::validation::{validate_positive_decimal, validate_required_text};

/// A recorded sale of one product line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub product: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub quantity: i32,
    #[serde(
        default,
        serialize_with = "rust_decimal::serde::float::serialize",
        deserialize_with = "decimal_null_as_zero"
    )]
    pub amount: Decimal,
    #[serde(default, with = "date_format::option")]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SaleForm {
    #[serde(default)]
    #[validate(custom = "validate_required_text")]
    pub product: String,
    #[serde(default)]
    #[validate(required, range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: Option<i32>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[validate(required, custom = "validate_positive_decimal")]
    pub amount: Option<Decimal>,
    #[serde(default, with = "date_format::option")]
    #[validate(required)]
    pub date: Option<NaiveDate>,
}

impl Resource for Sale {
    const KIND: ResourceKind = ResourceKind::Sales;
    type Form = SaleForm;

    fn id(&self) -> &str {
        &self.id
    }

    fn to_form(&self) -> SaleForm {
        SaleForm {
            product: self.product.clone(),
            quantity: Some(self.quantity),
            amount: Some(self.amount),
            date: self.date,
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.product]
    }

    fn summary_line(&self) -> String {
        let date = self
            .date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        format!(
            "{} | {} | {} x {} | {}",
            self.id, date, self.quantity, self.product, self.amount
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SalesSummary {
    pub count: usize,
    pub total_quantity: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    /// Revenue per product name.
    pub by_product: BTreeMap<String, Decimal>,
}

impl SalesSummary {
    pub fn from_sales(sales: &[Sale]) -> Self {
        let mut by_product: BTreeMap<String, Decimal> = BTreeMap::new();
        for sale in sales {
            *by_product.entry(sale.product.clone()).or_default() += sale.amount;
        }
        Self {
            count: sales.len(),
            total_quantity: sales.iter().map(|s| i64::from(s.quantity)).sum(),
            total_amount: sales.iter().map(|s| s.amount).sum(),
            by_product,
        }
    }
}
