//! Durable key-value storage and the persisted credential store.

pub mod errors;

pub use errors::{StorageError, StorageResult};

use crate::session::models::User;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Storage key for the bearer token.
pub const TOKEN_KEY: &str = "token";
/// Legacy duplicate of [`TOKEN_KEY`]; older code paths read either.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Storage key for the cached normalized user (JSON).
pub const USER_KEY: &str = "user";

/// Durable string key-value storage.
pub trait StorageBackend: Send + Sync {
    /// Read a value.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write a value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete a value. Deleting an absent key is a no-op.
    fn remove(&self, key: &str) -> StorageResult<()>;
}

/// Key-value storage backed by a JSON file.
///
/// The whole map is rewritten on every mutation; the data is a handful
/// of short strings, so durability wins over cleverness here.
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStorage {
    /// Open or create the backing file.
    ///
    /// A file that exists but does not parse as a string map is
    /// treated as empty; the next write replaces it.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(entries) => entries,
                Err(e) => {
                    log::warn!(
                        "discarding unreadable storage file {}: {e}",
                        path.display()
                    );
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn flush(&self, entries: &HashMap<String, String>) -> StorageResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl StorageBackend for FileStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self.entries.lock();
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut entries = self.entries.lock();
        if entries.remove(key).is_some() {
            self.flush(&entries)?;
        }
        Ok(())
    }
}

/// In-memory storage for tests and for degraded mode when no file is
/// available.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.entries
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// Persisted credential store.
///
/// Owns the bearer token (persisted under two legacy-compatible keys)
/// and the cached normalized user. The in-memory token mirrors the
/// persisted value so the API client can attach it to every request
/// without re-reading storage.
#[derive(Clone)]
pub struct CredentialStore {
    backend: Arc<dyn StorageBackend>,
    token: Arc<RwLock<Option<String>>>,
}

impl CredentialStore {
    /// Create a store over a backend and load any persisted token.
    ///
    /// Runs before anything issues a network call, so the first
    /// request already carries the header. Storage failures degrade to
    /// "no token found" with a single warning.
    pub fn open(backend: Arc<dyn StorageBackend>) -> Self {
        let token = match read_either_key(backend.as_ref()) {
            Ok(token) => token,
            Err(e) => {
                log::warn!("credential storage unavailable, starting without a token: {e}");
                None
            }
        };
        Self {
            backend,
            token: Arc::new(RwLock::new(token)),
        }
    }

    /// Current bearer token, if any.
    pub fn token(&self) -> Option<String> {
        self.token.read().clone()
    }

    /// Persist or clear the token.
    ///
    /// `Some` writes both storage keys and installs the token for
    /// outgoing requests; `None` removes both keys and clears it.
    pub fn persist(&self, token: Option<&str>) {
        match token {
            Some(token) => {
                self.try_storage(|b| b.set(TOKEN_KEY, token));
                self.try_storage(|b| b.set(ACCESS_TOKEN_KEY, token));
                *self.token.write() = Some(token.to_string());
            }
            None => {
                self.try_storage(|b| b.remove(TOKEN_KEY));
                self.try_storage(|b| b.remove(ACCESS_TOKEN_KEY));
                *self.token.write() = None;
            }
        }
    }

    /// Cache the normalized user.
    pub fn save_user(&self, user: &User) {
        match serde_json::to_string(user) {
            Ok(json) => self.try_storage(|b| b.set(USER_KEY, &json)),
            Err(e) => log::warn!("could not serialize user for caching: {e}"),
        }
    }

    /// Load the cached user.
    ///
    /// A malformed entry is removed and treated as absent; this never
    /// fails.
    pub fn load_user(&self) -> Option<User> {
        let stored = match self.backend.get(USER_KEY) {
            Ok(stored) => stored?,
            Err(e) => {
                log::warn!("could not read cached user: {e}");
                return None;
            }
        };
        match serde_json::from_str(&stored) {
            Ok(user) => Some(user),
            Err(e) => {
                log::warn!("discarding corrupt cached user: {e}");
                self.try_storage(|b| b.remove(USER_KEY));
                None
            }
        }
    }

    /// Remove the cached user.
    pub fn clear_user(&self) {
        self.try_storage(|b| b.remove(USER_KEY));
    }

    fn try_storage(&self, op: impl FnOnce(&dyn StorageBackend) -> StorageResult<()>) {
        if let Err(e) = op(self.backend.as_ref()) {
            log::warn!("credential storage write failed: {e}");
        }
    }
}

fn read_either_key(backend: &dyn StorageBackend) -> StorageResult<Option<String>> {
    if let Some(token) = backend.get(TOKEN_KEY)? {
        return Ok(Some(token));
    }
    backend.get(ACCESS_TOKEN_KEY)
}
