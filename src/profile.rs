use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::client::ApiClient;
use crate::errors::AdminResult;
use crate::resource::ResourceKind;
use crate::session::{SessionStore, StoredSession};
use crate::validation::validate_required_text;

/// Account details of the signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// Changes to the signed-in user's account. The password is only sent when
/// it is being changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Validate)]
pub struct ProfileUpdate {
    #[validate(custom = "validate_required_text")]
    pub name: String,
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: Option<String>,
}

impl ProfileUpdate {
    /// Starts from the current profile so unchanged fields are resent as-is.
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            name: profile.name.clone(),
            email: profile.email.clone(),
            password: None,
        }
    }
}

fn users_path(client: &ApiClient) -> &str {
    client.config().resources.path(ResourceKind::Users)
}

pub async fn fetch(client: &ApiClient, session: &StoredSession) -> AdminResult<Profile> {
    client
        .get_json(users_path(client), &["user", session.id.as_str()])
        .await
}

pub async fn update(
    client: &ApiClient,
    session: &StoredSession,
    changes: &ProfileUpdate,
) -> AdminResult<()> {
    changes.validate()?;
    client
        .put_json(users_path(client), &["user", session.id.as_str()], changes)
        .await?;
    info!(user = %session.id, password_changed = changes.password.is_some(), "Profile updated");
    Ok(())
}

/// Deletes the account and signs out.
pub async fn delete_account(
    client: &ApiClient,
    store: &SessionStore,
    session: &StoredSession,
) -> AdminResult<()> {
    client.delete_path(users_path(client), &[session.id.as_str()]).await?;
    store.clear()?;
    info!(user = %session.id, "Account deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unchanged_password_is_not_sent() {
        let profile = Profile {
            id: "u1".into(),
            name: "Nimali".into(),
            email: "nimali@teaestate.lk".into(),
            role: None,
        };
        let changes = ProfileUpdate::from_profile(&profile);
        assert!(changes.validate().is_ok());
        assert_eq!(
            serde_json::to_value(&changes).unwrap(),
            json!({"name": "Nimali", "email": "nimali@teaestate.lk"})
        );
    }

    #[test]
    fn short_new_password_is_rejected() {
        let changes = ProfileUpdate {
            name: "Nimali".into(),
            email: "nimali@teaestate.lk".into(),
            password: Some("abc".into()),
        };
        let errors = changes.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }
}
