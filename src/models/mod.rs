//! Record types for every back-office collection, with their forms.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumIter, EnumString};

pub mod employee;
pub mod inventory;
pub mod product;
pub mod quality;
pub mod sale;
pub mod supplier;
pub mod user;

pub use employee::{Employee, EmployeeForm};
pub use inventory::{InventoryForm, InventoryItem, InventorySummary};
pub use product::{Product, ProductCategory, ProductForm};
pub use quality::{QualityCheck, QualityCheckForm, QualityStatus, QualitySummary};
pub use sale::{Sale, SaleForm, SalesSummary};
pub use supplier::{Supplier, SupplierForm, SupplierSummary};
pub use user::{SystemUser, SystemUserForm};

/// Active/Inactive flag shared by suppliers and system users.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum ActivityStatus {
    Active,
    Inactive,
}

/// Reads an explicit `null` the same as a missing key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Money read as a JSON number or numeric string, with `null` read as zero.
pub(crate) fn decimal_null_as_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(rust_decimal::serde::float_option::deserialize(deserializer)?.unwrap_or_default())
}

/// Calendar dates as `YYYY-MM-DD`. Reads also accept full timestamps
/// (`2025-01-10T00:00:00.000Z`) and keep only the date part.
pub(crate) mod date_format {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn parse(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
        let date_part = raw.trim().split('T').next().unwrap_or_default();
        NaiveDate::parse_from_str(date_part, FORMAT)
    }

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(
            date: &Option<NaiveDate>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match date {
                Some(date) => super::serialize(date, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveDate>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) if raw.trim().is_empty() => Ok(None),
                Some(raw) => parse(&raw).map(Some).map_err(serde::de::Error::custom),
                None => Ok(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::str::FromStr;

    #[test]
    fn date_format_accepts_timestamps() {
        let expected = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        assert_eq!(date_format::parse("2025-01-10").unwrap(), expected);
        assert_eq!(date_format::parse("2025-01-10T00:00:00.000Z").unwrap(), expected);
        assert!(date_format::parse("10/01/2025").is_err());
    }

    #[test]
    fn null_fields_read_as_defaults() {
        let employee: Employee = serde_json::from_value(serde_json::json!({
            "_id": "e1", "name": "Amal", "employeeId": "E1", "role": null, "contact": null
        }))
        .unwrap();
        assert_eq!(employee.role, "");
        assert_eq!(employee.contact, "");

        let sale: Sale = serde_json::from_value(serde_json::json!({
            "_id": "s1", "product": null, "quantity": null, "amount": null, "date": null
        }))
        .unwrap();
        assert_eq!(sale.quantity, 0);
        assert_eq!(sale.amount, Decimal::ZERO);
        assert_eq!(sale.date, None);
    }

    #[test]
    fn activity_status_parses_any_case() {
        assert_eq!(ActivityStatus::from_str("inactive").unwrap(), ActivityStatus::Inactive);
        assert_eq!(ActivityStatus::Active.to_string(), "Active");
    }
}
