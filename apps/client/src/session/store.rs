//! Durable session state.
//!
//! A store holds the token and the serialized user as a single unit: a save
//! writes both, a clear removes both. A store where only one half survived a
//! crash is reported as corrupt so the caller can drop it rather than run
//! with a token it cannot attribute to a user.

use crate::errors::StoreError;
use crate::session::types::UserView;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const TOKEN_FILE: &str = "token";
const USER_FILE: &str = "user";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSession {
    pub token: String,
    pub user: UserView,
}

pub trait SessionStore: Send + Sync {
    /// Loads the persisted session, if any.
    ///
    /// # Errors
    ///
    /// `Corrupt` when only one half of the pair is present or the user does
    /// not decode. IO failures pass through.
    fn load(&self) -> Result<Option<StoredSession>, StoreError>;

    /// Persists the token and user together.
    ///
    /// # Errors
    ///
    /// IO failures pass through.
    fn save(&self, session: &StoredSession) -> Result<(), StoreError>;

    /// Removes any persisted session. Clearing an empty store succeeds.
    ///
    /// # Errors
    ///
    /// IO failures pass through.
    fn clear(&self) -> Result<(), StoreError>;
}

/// Session store backed by two files in a directory, mirroring how a browser
/// client keeps `token` and `user` entries side by side.
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn token_path(&self) -> PathBuf {
        self.dir.join(TOKEN_FILE)
    }

    fn user_path(&self) -> PathBuf {
        self.dir.join(USER_FILE)
    }
}

fn read_if_exists(path: &Path) -> Result<Option<String>, StoreError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

fn remove_if_exists(path: &Path) -> Result<(), StoreError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<StoredSession>, StoreError> {
        let token = read_if_exists(&self.token_path())?;
        let user = read_if_exists(&self.user_path())?;

        match (token, user) {
            (Some(token), Some(user)) => {
                let user: UserView =
                    serde_json::from_str(&user).map_err(|_| StoreError::Corrupt)?;
                Ok(Some(StoredSession { token, user }))
            }
            (None, None) => Ok(None),
            _ => Err(StoreError::Corrupt),
        }
    }

    fn save(&self, session: &StoredSession) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        let user = serde_json::to_string(&session.user).map_err(|_| StoreError::Corrupt)?;
        std::fs::write(self.token_path(), &session.token)?;
        std::fs::write(self.user_path(), user)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        remove_if_exists(&self.token_path())?;
        remove_if_exists(&self.user_path())?;
        Ok(())
    }
}

/// In-memory store for tests and short-lived tools.
#[derive(Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<&'static str, String>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes a single key, leaving the other untouched. Only useful to set
    /// up a torn state in tests.
    pub fn put_raw(&self, key: &'static str, value: impl Into<String>) {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(key, value.into());
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<StoredSession>, StoreError> {
        let entries = self
            .entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let token = entries.get(TOKEN_FILE).cloned();
        let user = entries.get(USER_FILE).cloned();

        match (token, user) {
            (Some(token), Some(user)) => {
                let user: UserView =
                    serde_json::from_str(&user).map_err(|_| StoreError::Corrupt)?;
                Ok(Some(StoredSession { token, user }))
            }
            (None, None) => Ok(None),
            _ => Err(StoreError::Corrupt),
        }
    }

    fn save(&self, session: &StoredSession) -> Result<(), StoreError> {
        let user = serde_json::to_string(&session.user).map_err(|_| StoreError::Corrupt)?;
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        entries.insert(TOKEN_FILE, session.token.clone());
        entries.insert(USER_FILE, user);
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        entries.remove(TOKEN_FILE);
        entries.remove(USER_FILE);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ulid::Ulid;

    fn user() -> UserView {
        UserView {
            id: "2f0c9c9e-6f0a-4f41-93a8-2f9f5b1f0c11".into(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            role: "customer".into(),
        }
    }

    fn temp_store() -> FileSessionStore {
        let dir = std::env::temp_dir().join(format!("vetrina-session-{}", Ulid::new()));
        FileSessionStore::new(dir)
    }

    #[test]
    fn file_store_round_trip() {
        let store = temp_store();
        assert_eq!(store.load().unwrap(), None);

        let session = StoredSession {
            token: "abc.def.ghi".into(),
            user: user(),
        };
        store.save(&session).unwrap();
        assert_eq!(store.load().unwrap(), Some(session));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn file_store_clear_is_idempotent() {
        let store = temp_store();
        store.clear().unwrap();
        store.clear().unwrap();
    }

    #[test]
    fn file_store_token_without_user_is_corrupt() {
        let store = temp_store();
        std::fs::create_dir_all(&store.dir).unwrap();
        std::fs::write(store.token_path(), "abc.def.ghi").unwrap();

        assert!(matches!(store.load(), Err(StoreError::Corrupt)));
    }

    #[test]
    fn file_store_undecodable_user_is_corrupt() {
        let store = temp_store();
        std::fs::create_dir_all(&store.dir).unwrap();
        std::fs::write(store.token_path(), "abc.def.ghi").unwrap();
        std::fs::write(store.user_path(), "not json").unwrap();

        assert!(matches!(store.load(), Err(StoreError::Corrupt)));
    }

    #[test]
    fn memory_store_round_trip() {
        let store = MemorySessionStore::new();
        assert_eq!(store.load().unwrap(), None);

        let session = StoredSession {
            token: "abc.def.ghi".into(),
            user: user(),
        };
        store.save(&session).unwrap();
        assert_eq!(store.load().unwrap(), Some(session));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn memory_store_user_without_token_is_corrupt() {
        let store = MemorySessionStore::new();
        store.put_raw(USER_FILE, serde_json::to_string(&user()).unwrap());

        assert!(matches!(store.load(), Err(StoreError::Corrupt)));
    }
}
