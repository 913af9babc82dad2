mod common;

use assert_matches::assert_matches;
use chrono::Utc;
use serde_json::json;
use tea_admin::{
    profile::{self, ProfileUpdate},
    session::{self, SessionStore},
    shell::{NavigationShell, ProfileMenuAction, Route},
    AdminError,
};
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use common::TestBackend;

fn store_in(dir: &TempDir) -> SessionStore {
    SessionStore::new(dir.path().join("session.json"))
}

#[tokio::test]
async fn login_persists_session_with_server_expiry() {
    let backend = TestBackend::start().await;
    Mock::given(method("POST"))
        .and(path("/api/user/login"))
        .and(body_json(json!({"email": "nimali@teaestate.lk", "password": "secret1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": {"_id": "u1", "name": "Nimali", "email": "nimali@teaestate.lk", "role": "admin"},
            "token": "jwt-token",
            "expiresAt": "2099-01-01T00:00:00Z"
        })))
        .expect(1)
        .mount(&backend.server)
        .await;

    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let session = session::login(&backend.client, &store, "nimali@teaestate.lk", "secret1")
        .await
        .unwrap();

    assert_eq!(session.token.as_deref(), Some("jwt-token"));
    assert_eq!(store.current().unwrap(), Some(session));
}

#[tokio::test]
async fn login_without_expiry_uses_configured_ttl() {
    let backend = TestBackend::start_with(|config| config.session_ttl_secs = 120).await;
    Mock::given(method("POST"))
        .and(path("/api/user/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "u2", "name": "Kasun", "email": "kasun@teaestate.lk"
        })))
        .mount(&backend.server)
        .await;

    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let before = Utc::now();
    let session = session::login(&backend.client, &store, "kasun@teaestate.lk", "pw1234")
        .await
        .unwrap();

    let ttl = session.expires_at - before;
    assert!(ttl.num_seconds() >= 119 && ttl.num_seconds() <= 121, "ttl {:?}", ttl);
    assert!(store.current_at(before + chrono::Duration::seconds(200)).unwrap().is_none());
}

#[tokio::test]
async fn rejected_login_leaves_no_session() {
    let backend = TestBackend::start().await;
    Mock::given(method("POST"))
        .and(path("/api/user/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid credentials"})),
        )
        .mount(&backend.server)
        .await;

    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let err = session::login(&backend.client, &store, "x@y.lk", "wrong1")
        .await
        .unwrap_err();

    assert_matches!(err, AdminError::HttpStatus { ref message, .. } if message == "Invalid credentials");
    assert!(store.load().unwrap().is_none());
}

#[tokio::test]
async fn profile_update_sends_password_only_when_changed() {
    let backend = TestBackend::start().await;
    Mock::given(method("POST"))
        .and(path("/api/user/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "u1", "name": "Nimali", "email": "nimali@teaestate.lk"
        })))
        .mount(&backend.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/user/user/u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "u1", "name": "Nimali", "email": "nimali@teaestate.lk"
        })))
        .mount(&backend.server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/user/user/u1"))
        .and(body_json(json!({"name": "Nimali S.", "email": "nimali@teaestate.lk"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "updated"})))
        .expect(1)
        .mount(&backend.server)
        .await;

    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let session = session::login(&backend.client, &store, "nimali@teaestate.lk", "secret1")
        .await
        .unwrap();

    let current = profile::fetch(&backend.client, &session).await.unwrap();
    let mut changes = ProfileUpdate::from_profile(&current);
    changes.name = "Nimali S.".into();
    profile::update(&backend.client, &session, &changes).await.unwrap();

    changes.password = Some("123".into());
    let err = profile::update(&backend.client, &session, &changes)
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn deleting_account_clears_session() {
    let backend = TestBackend::start().await;
    Mock::given(method("POST"))
        .and(path("/api/user/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "u9", "name": "Temp", "email": "temp@teaestate.lk"
        })))
        .mount(&backend.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/user/u9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "deleted"})))
        .expect(1)
        .mount(&backend.server)
        .await;

    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let session = session::login(&backend.client, &store, "temp@teaestate.lk", "secret1")
        .await
        .unwrap();

    profile::delete_account(&backend.client, &store, &session)
        .await
        .unwrap();
    assert!(store.load().unwrap().is_none());
}

#[tokio::test]
async fn shell_logout_returns_to_login() {
    let backend = TestBackend::start().await;
    Mock::given(method("POST"))
        .and(path("/api/user/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "u1", "name": "Nimali", "email": "nimali@teaestate.lk"
        })))
        .mount(&backend.server)
        .await;

    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    session::login(&backend.client, &store, "nimali@teaestate.lk", "secret1")
        .await
        .unwrap();

    let mut shell = NavigationShell::new(store.clone());
    shell.navigate(Route::Inventory);
    assert_eq!(shell.select(ProfileMenuAction::Logout).unwrap(), Route::Login);
    assert!(store.current().unwrap().is_none());
}
