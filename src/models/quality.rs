use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use validator::Validate;

use super::{date_format, null_as_default};
use crate::resource::{Resource, ResourceKind};
use crate::validation::{validate_batch_number, validate_not_in_past};

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum QualityStatus {
    #[default]
    Passed,
    Failed,
}

/// Inspection result for one production batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityCheck {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub batch_number: String,
    #[serde(default, with = "date_format::option")]
    pub inspection_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: QualityStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct QualityCheckForm {
    #[serde(default)]
    #[validate(custom = "validate_batch_number")]
    pub batch_number: String,
    #[serde(default, with = "date_format::option")]
    #[validate(required, custom = "validate_not_in_past")]
    pub inspection_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: QualityStatus,
}

impl Resource for QualityCheck {
    const KIND: ResourceKind = ResourceKind::Quality;
    type Form = QualityCheckForm;

    fn id(&self) -> &str {
        &self.id
    }

    fn to_form(&self) -> QualityCheckForm {
        QualityCheckForm {
            batch_number: self.batch_number.clone(),
            inspection_date: self.inspection_date,
            status: self.status,
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.batch_number]
    }

    fn summary_line(&self) -> String {
        let date = self
            .inspection_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        format!("{} | {} | {} | {}", self.id, self.batch_number, date, self.status)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QualitySummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

impl QualitySummary {
    pub fn from_checks(checks: &[QualityCheck]) -> Self {
        let passed = checks
            .iter()
            .filter(|check| check.status == QualityStatus::Passed)
            .count();
        Self {
            total: checks.len(),
            passed,
            failed: checks.len() - passed,
        }
    }
}
