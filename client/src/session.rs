//! Authenticated [`Session`] definitions.

use std::sync::{PoisonError, RwLock};

use common::Role;
use derive_more::{AsRef, Display, From, Into};
use serde::{Deserialize, Serialize};

use crate::storage::Storage;

/// Authenticated session of the console.
///
/// Lives in the [`SessionStore`] and is persisted by its [`Storage`], so
/// a restarted console resumes where it left off.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Session {
    /// ID of the user this [`Session`] belongs to.
    pub user_id: UserId,

    /// Identifier the user logged in with.
    pub login_id: LoginId,

    /// Short-lived bearer credential of this [`Session`].
    pub access_token: AccessToken,

    /// Long-lived credential renewing the [`AccessToken`].
    pub refresh_token: RefreshToken,

    /// [`Role`] the platform assigned to this [`Session`].
    pub scope: Role,
}

/// ID of the user a [`Session`] belongs to.
#[derive(
    AsRef,
    Clone,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    Into,
    PartialEq,
    Serialize,
)]
#[as_ref(str, String)]
pub struct UserId(String);

/// Identifier the user logged in with (their email address).
#[derive(
    AsRef,
    Clone,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    Into,
    PartialEq,
    Serialize,
)]
#[as_ref(str, String)]
pub struct LoginId(String);

/// Short-lived bearer credential of a [`Session`].
#[derive(
    AsRef, Clone, Debug, Deserialize, Eq, From, Into, PartialEq, Serialize,
)]
#[as_ref(str, String)]
pub struct AccessToken(String);

/// Long-lived credential renewing an expired [`AccessToken`].
#[derive(
    AsRef, Clone, Debug, Deserialize, Eq, From, Into, PartialEq, Serialize,
)]
#[as_ref(str, String)]
pub struct RefreshToken(String);

/// Process-wide store of the authenticated [`Session`].
///
/// Readers always observe either no session at all or a fully consistent
/// one, never a partially updated record.
#[derive(Debug)]
pub struct SessionStore {
    /// Current [`Session`], if any.
    state: RwLock<Option<Session>>,

    /// [`Storage`] persisting the [`Session`] across restarts.
    storage: Box<dyn Storage>,
}

impl SessionStore {
    /// Creates a new [`SessionStore`] backed by the provided [`Storage`],
    /// hydrated with whatever [`Session`] the [`Storage`] has persisted.
    #[must_use]
    pub fn new(storage: Box<dyn Storage>) -> Self {
        let state = RwLock::new(storage.load());
        Self { state, storage }
    }

    /// Atomically replaces the whole [`Session`] record and persists it.
    pub fn set_credentials(&self, session: Session) {
        self.storage.save(&session);
        *self.write() = Some(session);
    }

    /// Replaces the [`AccessToken`] of the current [`Session`], keeping
    /// every other field intact.
    ///
    /// No-op when no [`Session`] exists.
    pub fn set_access_token(&self, token: AccessToken) {
        let mut state = self.write();
        if let Some(session) = state.as_mut() {
            session.access_token = token;
            self.storage.save(session);
        }
    }

    /// Clears the current [`Session`] and wipes its persisted record.
    ///
    /// Idempotent.
    pub fn log_out(&self) {
        *self.write() = None;
        self.storage.clear();
    }

    /// Returns a copy of the current [`Session`], if any.
    #[must_use]
    pub fn snapshot(&self) -> Option<Session> {
        self.read().clone()
    }

    /// Returns the [`AccessToken`] of the current [`Session`], if any.
    #[must_use]
    pub fn access_token(&self) -> Option<AccessToken> {
        self.read().as_ref().map(|s| s.access_token.clone())
    }

    /// Returns the [`RefreshToken`] of the current [`Session`], if any.
    #[must_use]
    pub fn refresh_token(&self) -> Option<RefreshToken> {
        self.read().as_ref().map(|s| s.refresh_token.clone())
    }

    /// Returns the [`Role`] of the current [`Session`], if any.
    #[must_use]
    pub fn scope(&self) -> Option<Role> {
        self.read().as_ref().map(|s| s.scope)
    }

    /// Indicates whether a [`Session`] currently exists.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }

    /// Locks the state for reading.
    fn read(&self) -> std::sync::RwLockReadGuard<'_, Option<Session>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Locks the state for writing.
    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Option<Session>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod spec {
    use common::Role;

    use crate::storage::{MemoryStorage, Storage as _};

    use super::{Session, SessionStore};

    fn session() -> Session {
        Session {
            user_id: "u-1".to_owned().into(),
            login_id: "admin@example.com".to_owned().into(),
            access_token: "A1".to_owned().into(),
            refresh_token: "R1".to_owned().into(),
            scope: Role::Admin,
        }
    }

    #[test]
    fn hydrates_from_storage() {
        let storage = MemoryStorage::default();
        storage.save(&session());

        let store = SessionStore::new(Box::new(storage));

        assert!(store.is_authenticated());
        assert_eq!(store.snapshot(), Some(session()));
    }

    #[test]
    fn set_access_token_preserves_other_fields() {
        let store = SessionStore::new(Box::<MemoryStorage>::default());
        store.set_credentials(session());

        store.set_access_token("A2".to_owned().into());

        let updated = store.snapshot().unwrap();
        assert_eq!(updated.access_token, "A2".to_owned().into());
        assert_eq!(updated.refresh_token, session().refresh_token);
        assert_eq!(updated.user_id, session().user_id);
        assert_eq!(updated.login_id, session().login_id);
        assert_eq!(updated.scope, session().scope);
    }

    #[test]
    fn set_access_token_is_noop_when_logged_out() {
        let store = SessionStore::new(Box::<MemoryStorage>::default());

        store.set_access_token("A2".to_owned().into());

        assert!(!store.is_authenticated());
    }

    #[test]
    fn log_out_is_idempotent_and_wipes_storage() {
        let store = SessionStore::new(Box::<MemoryStorage>::default());
        store.set_credentials(session());

        store.log_out();
        store.log_out();

        assert!(!store.is_authenticated());
        assert_eq!(store.access_token(), None);
    }
}
