//! Integration tests for the auth session lifecycle and persisted
//! credential storage.

use gpms::roles::Dashboard;
use gpms::session::{AuthSession, SessionError};
use gpms::storage::{
    ACCESS_TOKEN_KEY, CredentialStore, FileStorage, MemoryStorage, StorageBackend, TOKEN_KEY,
    USER_KEY,
};
use serde_json::json;
use std::sync::Arc;

fn memory_session() -> (Arc<MemoryStorage>, AuthSession) {
    let backend = Arc::new(MemoryStorage::new());
    let session = AuthSession::restore(CredentialStore::open(backend.clone()));
    (backend, session)
}

#[test]
fn login_then_logout_round_trip() {
    let (backend, session) = memory_session();
    let payload = json!({"id": 1, "username": "amal", "first_name": "Amal", "last_name": "Saleh"});

    session
        .login(&payload, &[json!("student")], "bearer-1")
        .unwrap();
    assert!(session.is_authenticated());
    assert_eq!(backend.get(TOKEN_KEY).unwrap().as_deref(), Some("bearer-1"));
    assert_eq!(
        backend.get(ACCESS_TOKEN_KEY).unwrap().as_deref(),
        Some("bearer-1")
    );
    assert!(backend.get(USER_KEY).unwrap().is_some());

    session.logout();
    assert!(!session.is_authenticated());
    assert!(session.user().is_none());
    assert_eq!(backend.get(TOKEN_KEY).unwrap(), None);
    assert_eq!(backend.get(ACCESS_TOKEN_KEY).unwrap(), None);
    assert_eq!(backend.get(USER_KEY).unwrap(), None);
}

#[test]
fn logout_while_anonymous_is_a_noop() {
    let (_, session) = memory_session();
    session.logout();
    session.logout();
    assert!(!session.is_authenticated());
}

#[test]
fn predicates_are_false_on_the_anonymous_session() {
    let (_, session) = memory_session();
    assert!(!session.has_role("student"));
    assert!(!session.has_any_role(&["student", "dean"]));
    assert!(!session.has_permission("approve_projects"));
    assert!(session.primary_role().is_none());
}

#[test]
fn login_rejects_payload_without_identifier() {
    let (_, session) = memory_session();
    let payload = json!({"username": "ghost", "first_name": "No", "last_name": "Id"});
    let err = session.login(&payload, &[], "tok").unwrap_err();
    assert_eq!(err, SessionError::MissingUserId);
    assert!(!session.is_authenticated());
    assert!(session.credentials().token().is_none());
}

#[test]
fn two_rapid_logins_last_write_wins() {
    let (backend, session) = memory_session();
    let first = json!({"id": 1, "first_name": "First", "last_name": "User"});
    let second = json!({"id": 2, "first_name": "Second", "last_name": "User"});

    session.login(&first, &[json!("student")], "tok-1").unwrap();
    session.login(&second, &[json!("dean")], "tok-2").unwrap();

    let user = session.user().unwrap();
    assert_eq!(user.id, 2);
    assert!(session.has_role("dean"));
    assert!(!session.has_role("student"));
    // Exactly one token pair survives.
    assert_eq!(backend.get(TOKEN_KEY).unwrap().as_deref(), Some("tok-2"));
    assert_eq!(
        backend.get(ACCESS_TOKEN_KEY).unwrap().as_deref(),
        Some("tok-2")
    );
}

#[test]
fn corrupted_cached_user_restores_to_anonymous() {
    let backend = Arc::new(MemoryStorage::new());
    backend.set(TOKEN_KEY, "stale-token").unwrap();
    backend.set(USER_KEY, "{definitely not json").unwrap();

    let session = AuthSession::restore(CredentialStore::open(backend.clone()));
    assert!(!session.is_authenticated());
    assert!(session.user().is_none());
    // The corrupt entry is gone, not left to fail again next startup.
    assert_eq!(backend.get(USER_KEY).unwrap(), None);
}

#[test]
fn session_survives_restart_via_file_storage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    {
        let storage = Arc::new(FileStorage::open(&path).unwrap());
        let session = AuthSession::restore(CredentialStore::open(storage));
        let payload = json!({"id": 7, "first_name": "Huda", "last_name": "Nasser"});
        session
            .login(&payload, &[json!("supervisor")], "durable-token")
            .unwrap();
    }

    let storage = Arc::new(FileStorage::open(&path).unwrap());
    let session = AuthSession::restore(CredentialStore::open(storage));
    assert!(session.is_authenticated());
    let user = session.user().unwrap();
    assert_eq!(user.id, 7);
    assert_eq!(user.name, "Huda Nasser");
    assert!(session.has_role("supervisor"));
    assert_eq!(
        session.credentials().token().as_deref(),
        Some("durable-token")
    );
}

#[test]
fn primary_role_drives_dashboard_routing() {
    let (_, session) = memory_session();
    let payload = json!({"id": 3, "first_name": "Sara"});
    session
        .login(&payload, &[json!("Department Head"), json!("dean")], "tok")
        .unwrap();

    let primary = session.primary_role().unwrap();
    assert_eq!(Dashboard::for_role(primary.label()), Dashboard::DepartmentHead);
}

#[test]
fn role_records_route_like_plain_strings() {
    let (_, session) = memory_session();
    let payload = json!({"id": 4, "first_name": "Omar"});
    session
        .login(&payload, &[json!({"role__type": "University President"})], "tok")
        .unwrap();

    let primary = session.primary_role().unwrap();
    assert_eq!(
        Dashboard::for_role(primary.label()),
        Dashboard::UniversityPresident
    );
}
