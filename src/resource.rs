use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt::Debug;
use std::path::PathBuf;
use strum::{AsRefStr, Display, EnumIter, EnumString};
use validator::{Validate, ValidationErrors};

use crate::client::ApiClient;
use crate::errors::{AdminError, AdminResult};

/// The record collections managed from the back office.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ResourceKind {
    Employees,
    Suppliers,
    Inventory,
    Quality,
    Sales,
    Products,
    Users,
}

impl ResourceKind {
    /// Singular, human-facing name of one record.
    pub fn record_label(&self) -> &'static str {
        match self {
            Self::Employees => "employee",
            Self::Suppliers => "supplier",
            Self::Inventory => "inventory item",
            Self::Quality => "quality check",
            Self::Sales => "sale",
            Self::Products => "product",
            Self::Users => "user",
        }
    }
}

/// How a panel brings its collection back in line after a successful write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncPolicy {
    /// Patch the local collection with the record the server returned.
    #[default]
    Patch,
    /// Re-fetch the whole collection.
    Reload,
}

/// A backend record type that a [`ResourcePanel`](crate::panel::ResourcePanel)
/// can list and edit.
#[async_trait]
pub trait Resource: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    const KIND: ResourceKind;

    /// How the panel syncs its collection after a write.
    const SYNC: SyncPolicy = SyncPolicy::Patch;

    /// Editable values for create/update; serialised as the request body.
    type Form: Validate
        + Serialize
        + DeserializeOwned
        + Default
        + Clone
        + Debug
        + Send
        + Sync;

    /// Server-assigned identifier.
    fn id(&self) -> &str;

    /// Copy of this record's editable fields.
    fn to_form(&self) -> Self::Form;

    /// Fields matched by the panel search box.
    fn search_fields(&self) -> Vec<&str>;

    /// One-line rendering for listings.
    fn summary_line(&self) -> String {
        let mut parts = vec![self.id()];
        parts.extend(self.search_fields());
        parts.join(" | ")
    }

    fn check(form: &Self::Form) -> Result<(), ValidationErrors> {
        form.validate()
    }

    /// Copies form fields that are skipped by serde, so they survive a
    /// JSON merge of new field values.
    fn carry_local_fields(_from: &Self::Form, _into: &mut Self::Form) {}

    /// Attaches a local image file to be uploaded on save.
    fn attach_image(_form: &mut Self::Form, path: PathBuf) -> AdminResult<()> {
        Err(AdminError::InvalidInput(format!(
            "{} records cannot carry an image ({})",
            Self::KIND.record_label(),
            path.display()
        )))
    }

    /// Runs after validation and before the create/update request.
    async fn prepare(_form: &mut Self::Form, _client: &ApiClient) -> AdminResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn kinds_parse_from_cli_names() {
        assert_eq!(ResourceKind::from_str("employees").unwrap(), ResourceKind::Employees);
        assert_eq!(ResourceKind::from_str("quality").unwrap(), ResourceKind::Quality);
        assert!(ResourceKind::from_str("orders").is_err());
    }

    #[test]
    fn every_kind_round_trips_through_display() {
        for kind in ResourceKind::iter() {
            assert_eq!(ResourceKind::from_str(&kind.to_string()).unwrap(), kind);
        }
    }
}
