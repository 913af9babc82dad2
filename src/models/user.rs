use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{null_as_default, ActivityStatus};
use crate::resource::{Resource, ResourceKind, SyncPolicy};
use crate::validation::validate_required_text;

/// Back-office login account. The password is never read back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemUser {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default)]
    pub status: Option<ActivityStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SystemUserForm {
    #[serde(default)]
    #[validate(custom = "validate_required_text")]
    pub name: String,
    #[serde(default)]
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ActivityStatus>,
    /// Sent only when set; an edit without it keeps the stored password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: Option<String>,
}

impl Resource for SystemUser {
    const KIND: ResourceKind = ResourceKind::Users;
    // The user endpoints return only an acknowledgement on write.
    const SYNC: SyncPolicy = SyncPolicy::Reload;
    type Form = SystemUserForm;

    fn id(&self) -> &str {
        &self.id
    }

    fn to_form(&self) -> SystemUserForm {
        SystemUserForm {
            name: self.name.clone(),
            email: self.email.clone(),
            status: self.status,
            password: None,
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name, &self.email]
    }
}
