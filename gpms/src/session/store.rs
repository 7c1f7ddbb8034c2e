//! Auth session store.

use super::errors::SessionResult;
use super::models::User;
use crate::roles::Role;
use crate::storage::CredentialStore;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;

/// Session lifecycle states.
///
/// `Authenticated` carries the user, so the "authenticated but no
/// user" combination cannot be represented.
#[derive(Debug, Clone)]
enum SessionState {
    Anonymous,
    Authenticated { user: User },
}

/// Auth session store.
///
/// Cloning yields another handle to the same shared state; a mutation
/// through one handle is immediately visible through all of them.
#[derive(Clone)]
pub struct AuthSession {
    state: Arc<Mutex<SessionState>>,
    credentials: CredentialStore,
}

impl AuthSession {
    /// Restore the session from persisted state.
    ///
    /// Authenticated only when a token and a parseable cached user are
    /// both present. A token with no usable cached user is cleared
    /// rather than restoring a half-open session.
    pub fn restore(credentials: CredentialStore) -> Self {
        let state = match (credentials.token(), credentials.load_user()) {
            (Some(_), Some(user)) => SessionState::Authenticated { user },
            (Some(_), None) => {
                log::warn!("stored token has no cached user, signing out");
                credentials.persist(None);
                SessionState::Anonymous
            }
            (None, _) => SessionState::Anonymous,
        };
        Self {
            state: Arc::new(Mutex::new(state)),
            credentials,
        }
    }

    /// Record a completed login.
    ///
    /// The authentication round-trip has already happened; this
    /// normalizes the payload, persists the token and the user cache,
    /// then flips the in-memory state. A second login simply replaces
    /// the first.
    pub fn login(&self, payload: &Value, roles: &[Value], token: &str) -> SessionResult<User> {
        let user = User::normalize(payload, roles)?;
        self.credentials.persist(Some(token));
        self.credentials.save_user(&user);
        *self.state.lock() = SessionState::Authenticated { user: user.clone() };
        Ok(user)
    }

    /// Sign out: clear the token pair, the cached user, and the
    /// in-memory state. A no-op when already anonymous.
    pub fn logout(&self) {
        let mut state = self.state.lock();
        if matches!(*state, SessionState::Anonymous) {
            return;
        }
        self.credentials.persist(None);
        self.credentials.clear_user();
        *state = SessionState::Anonymous;
    }

    /// Replace the current user, e.g. after a profile refresh. Ignored
    /// while anonymous.
    pub fn set_user(&self, user: User) {
        let mut state = self.state.lock();
        if matches!(*state, SessionState::Anonymous) {
            log::warn!("set_user on an anonymous session, ignoring");
            return;
        }
        self.credentials.save_user(&user);
        *state = SessionState::Authenticated { user };
    }

    /// Current user, if authenticated.
    pub fn user(&self) -> Option<User> {
        match &*self.state.lock() {
            SessionState::Authenticated { user } => Some(user.clone()),
            SessionState::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(*self.state.lock(), SessionState::Authenticated { .. })
    }

    /// Primary role of the current user, if any.
    pub fn primary_role(&self) -> Option<Role> {
        match &*self.state.lock() {
            SessionState::Authenticated { user } => user.primary_role().cloned(),
            SessionState::Anonymous => None,
        }
    }

    /// True iff the current user holds the role. `false` while
    /// anonymous — never an error.
    pub fn has_role(&self, role: &str) -> bool {
        match &*self.state.lock() {
            SessionState::Authenticated { user } => user.has_role(role),
            SessionState::Anonymous => false,
        }
    }

    /// True iff the current user holds any of the roles.
    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        match &*self.state.lock() {
            SessionState::Authenticated { user } => user.has_any_role(roles),
            SessionState::Anonymous => false,
        }
    }

    /// True iff the current user holds the permission.
    pub fn has_permission(&self, permission: &str) -> bool {
        match &*self.state.lock() {
            SessionState::Authenticated { user } => user.has_permission(permission),
            SessionState::Anonymous => false,
        }
    }

    /// Handle to the underlying credential store.
    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use serde_json::json;

    fn anonymous_session() -> AuthSession {
        AuthSession::restore(CredentialStore::open(Arc::new(MemoryStorage::new())))
    }

    #[test]
    fn test_fresh_session_is_anonymous() {
        let session = anonymous_session();
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
    }

    #[test]
    fn test_login_flips_state_and_persists() {
        let session = anonymous_session();
        let payload = json!({"id": 1, "first_name": "Amal", "last_name": "Saleh"});
        session
            .login(&payload, &[json!("student")], "tok")
            .unwrap();

        assert!(session.is_authenticated());
        assert_eq!(session.user().unwrap().name, "Amal Saleh");
        assert_eq!(session.credentials().token().as_deref(), Some("tok"));
        assert_eq!(session.credentials().load_user().unwrap().id, 1);
    }

    #[test]
    fn test_set_user_while_anonymous_is_ignored() {
        let session = anonymous_session();
        let payload = json!({"id": 1, "first_name": "A"});
        let user = User::normalize(&payload, &[]).unwrap();
        session.set_user(user);
        assert!(!session.is_authenticated());
        assert!(session.credentials().load_user().is_none());
    }

    #[test]
    fn test_clones_share_state() {
        let session = anonymous_session();
        let other = session.clone();
        let payload = json!({"id": 2, "first_name": "B"});
        session.login(&payload, &[], "tok").unwrap();
        assert!(other.is_authenticated());
        other.logout();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_restore_with_token_but_no_user_signs_out() {
        let backend = Arc::new(MemoryStorage::new());
        let credentials = CredentialStore::open(backend.clone());
        credentials.persist(Some("stale"));

        let session = AuthSession::restore(CredentialStore::open(backend));
        assert!(!session.is_authenticated());
        assert!(session.credentials().token().is_none());
    }
}
