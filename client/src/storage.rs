//! Persistence of the authenticated [`Session`].

use std::{
    fmt, fs, io,
    path::PathBuf,
    sync::{Mutex, PoisonError},
};

use crate::session::Session;

/// Root key a [`Session`] record is persisted under.
///
/// Versioned, so a record written by an incompatible build is simply
/// ignored instead of being misread.
pub const ROOT_KEY: &str = "session.v1";

/// Storage persisting the authenticated [`Session`] across restarts.
///
/// Persistence failures are logged and swallowed: a console that cannot
/// persist its session still works, it just starts logged out next time.
pub trait Storage: fmt::Debug + Send + Sync + 'static {
    /// Loads the persisted [`Session`], if any.
    fn load(&self) -> Option<Session>;

    /// Persists the provided [`Session`].
    fn save(&self, session: &Session);

    /// Wipes the persisted [`Session`].
    ///
    /// Idempotent.
    fn clear(&self);
}

/// [`Storage`] keeping the [`Session`] as a JSON file on disk.
#[derive(Debug)]
pub struct FileStorage {
    /// Path of the persisted [`Session`] record.
    path: PathBuf,
}

impl FileStorage {
    /// Creates a new [`FileStorage`] persisting the [`Session`] under the
    /// provided directory.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            path: dir.into().join(format!("{ROOT_KEY}.json")),
        }
    }
}

impl Storage for FileStorage {
    fn load(&self) -> Option<Session> {
        let raw = fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&raw)
            .map_err(|e| {
                tracing::warn!("ignoring unreadable session record: {e}");
            })
            .ok()
    }

    fn save(&self, session: &Session) {
        if let Some(dir) = self.path.parent() {
            if let Err(e) = fs::create_dir_all(dir) {
                tracing::warn!("cannot create session directory: {e}");
                return;
            }
        }

        match serde_json::to_vec(session) {
            Ok(raw) => {
                if let Err(e) = fs::write(&self.path, raw) {
                    tracing::warn!("cannot persist session: {e}");
                }
            }
            Err(e) => {
                tracing::warn!("cannot encode session: {e}");
            }
        }
    }

    fn clear(&self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::warn!("cannot wipe session record: {e}");
            }
        }
    }
}

/// In-memory [`Storage`], dropping the [`Session`] when the process
/// exits.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    /// Stored [`Session`] record.
    slot: Mutex<Option<Session>>,
}

impl Storage for MemoryStorage {
    fn load(&self) -> Option<Session> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn save(&self, session: &Session) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(session.clone());
    }

    fn clear(&self) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[cfg(test)]
mod spec {
    use common::Role;

    use crate::session::Session;

    use super::{FileStorage, Storage as _};

    fn session() -> Session {
        Session {
            user_id: "u-1".to_owned().into(),
            login_id: "admin@example.com".to_owned().into(),
            access_token: "A1".to_owned().into(),
            refresh_token: "R1".to_owned().into(),
            scope: Role::Staff,
        }
    }

    #[test]
    fn file_storage_round_trip() {
        let dir = std::env::temp_dir()
            .join(format!("console-session-{}", std::process::id()));
        let storage = FileStorage::new(&dir);

        assert_eq!(storage.load(), None);

        storage.save(&session());
        assert_eq!(storage.load(), Some(session()));

        storage.clear();
        storage.clear();
        assert_eq!(storage.load(), None);

        drop(std::fs::remove_dir_all(dir));
    }
}
