//! Signed-in user state.
//!
//! One [`SessionStore`] is created at startup and handed to everything that
//! needs it. Writes always replace the whole record, so readers see either the
//! previous user or the next one, never a mix.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// Current user as seen by the console.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    pub name: String,
    pub is_admin: bool,
    pub email: String,
}

/// A complete user record, as returned by `GET /api/user`. Every field must
/// be present; a partial record fails to deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Identity {
    pub name: String,
    pub is_admin: bool,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Authenticated,
    Unauthenticated,
}

impl Session {
    pub fn is_empty(&self) -> bool {
        *self == Session::default()
    }
}

impl From<Identity> for Session {
    fn from(identity: Identity) -> Self {
        Session {
            name: identity.name,
            is_admin: identity.is_admin,
            email: identity.email,
        }
    }
}

/// Shared handle to the session record. Clones point at the same record.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears every field back to the signed-out defaults.
    pub fn reset(&self) {
        // A panic mid-write cannot leave a torn record: the value is swapped whole.
        let mut session = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *session = Session::default();
        debug!("session reset");
    }

    /// Replaces the record with `identity`.
    pub fn set(&self, identity: Identity) {
        let next = Session::from(identity);
        debug!(user = %next.name, admin = next.is_admin, "session set");
        let mut session = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *session = next;
    }

    pub fn snapshot(&self) -> Session {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        !self
            .inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .name
            .is_empty()
    }

    pub fn state(&self) -> AuthState {
        if self.is_authenticated() {
            AuthState::Authenticated
        } else {
            AuthState::Unauthenticated
        }
    }
}

/// Signs the user out of `store`.
pub fn reset_session(store: &SessionStore) {
    store.reset();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Identity {
        Identity {
            name: "alice".into(),
            is_admin: true,
            email: "alice@example.com".into(),
        }
    }

    #[test]
    fn test_starts_unauthenticated() {
        let store = SessionStore::new();
        assert!(store.snapshot().is_empty());
        assert_eq!(store.state(), AuthState::Unauthenticated);
    }

    #[test]
    fn test_set_then_read() {
        let store = SessionStore::new();
        store.set(alice());
        let session = store.snapshot();
        assert_eq!(session.name, "alice");
        assert!(session.is_admin);
        assert_eq!(session.email, "alice@example.com");
        assert_eq!(store.state(), AuthState::Authenticated);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let store = SessionStore::new();
        store.set(alice());
        store.reset();
        assert!(store.snapshot().is_empty());
        reset_session(&store);
        assert_eq!(store.snapshot(), Session::default());
    }

    #[test]
    fn test_clones_share_state() {
        let store = SessionStore::new();
        let other = store.clone();
        other.set(alice());
        assert!(store.is_authenticated());
        store.reset();
        assert!(!other.is_authenticated());
    }

    #[test]
    fn test_identity_from_backend_record() {
        let raw = r#"{"id":3,"name":"bob","password":"x","email":"b@x.io","is_admin":false,
                      "created_at":"2017-01-01T00:00:00Z"}"#;
        let identity: Identity = serde_json::from_str(raw).unwrap();
        assert_eq!(identity.name, "bob");
        assert!(!identity.is_admin);
        assert_eq!(identity.email, "b@x.io");
    }

    #[test]
    fn test_partial_identity_rejected() {
        for raw in [
            r#"{"name":"bob"}"#,
            r#"{"name":"bob","email":"b@x.io"}"#,
            r#"{"name":"bob","is_admin":true}"#,
        ] {
            assert!(serde_json::from_str::<Identity>(raw).is_err(), "{raw}");
        }
    }
}
