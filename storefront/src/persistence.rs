//! Durable persistence for the account registry and session.
//!
//! Two logical keys exist behind the [`Storage`] port. Both hold JSON blobs,
//! readers tolerate an absent key, and writes are synchronous with
//! last-writer-wins semantics. The registry blob embeds passwords; the
//! session blob is a bare [`User`] and never carries one.

use crate::types::{AccountRecord, User};
use ecowear_core::environment::Storage;
use std::path::PathBuf;

/// Storage key for the account registry blob
pub const USERS_KEY: &str = "ecowear_users_db";

/// Storage key for the session blob
pub const SESSION_KEY: &str = "ecowear_session";

/// Reads the account registry, treating an absent or unreadable blob as
/// empty.
#[must_use]
pub fn load_registry(storage: &dyn Storage) -> Vec<AccountRecord> {
    let Some(raw) = storage.get(USERS_KEY) else {
        return Vec::new();
    };
    match serde_json::from_str(&raw) {
        Ok(registry) => registry,
        Err(error) => {
            tracing::warn!(%error, key = USERS_KEY, "discarding unreadable registry blob");
            Vec::new()
        },
    }
}

/// Writes the full account registry, passwords included.
pub fn save_registry(storage: &dyn Storage, registry: &[AccountRecord]) {
    match serde_json::to_string(registry) {
        Ok(json) => storage.set(USERS_KEY, &json),
        Err(error) => {
            tracing::warn!(%error, key = USERS_KEY, "failed to serialize registry");
        },
    }
}

/// Reads the persisted session, if any.
#[must_use]
pub fn load_session(storage: &dyn Storage) -> Option<User> {
    let raw = storage.get(SESSION_KEY)?;
    match serde_json::from_str(&raw) {
        Ok(user) => Some(user),
        Err(error) => {
            tracing::warn!(%error, key = SESSION_KEY, "discarding unreadable session blob");
            None
        },
    }
}

/// Persists the session profile. The caller passes a [`User`], which by
/// construction has no password field.
pub fn save_session(storage: &dyn Storage, user: &User) {
    match serde_json::to_string(user) {
        Ok(json) => storage.set(SESSION_KEY, &json),
        Err(error) => {
            tracing::warn!(%error, key = SESSION_KEY, "failed to serialize session");
        },
    }
}

/// Removes the persisted session on logout.
pub fn clear_session(storage: &dyn Storage) {
    storage.remove(SESSION_KEY);
}

/// File-backed [`Storage`] mapping each key to a JSON file under a data
/// directory.
///
/// IO failures are logged and otherwise swallowed: a failed read behaves
/// like an absent key and a failed write leaves the previous value in
/// place.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Creates a file store rooted at `dir`, creating the directory if
    /// needed.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        if let Err(error) = std::fs::create_dir_all(&dir) {
            tracing::warn!(%error, dir = %dir.display(), "failed to create storage directory");
        }
        Self { dir }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(value) => Some(value),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => None,
            Err(error) => {
                tracing::warn!(%error, key, "storage read failed");
                None
            },
        }
    }

    fn set(&self, key: &str, value: &str) {
        if let Err(error) = std::fs::write(self.path_for(key), value) {
            tracing::warn!(%error, key, "storage write failed");
        }
    }

    fn remove(&self, key: &str) {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => {},
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {},
            Err(error) => {
                tracing::warn!(%error, key, "storage remove failed");
            },
        }
    }
}
