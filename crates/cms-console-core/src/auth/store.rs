use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result};
use tracing::warn;

/// Durable store key holding the bearer token
pub const AUTH_TOKEN_KEY: &str = "authToken";

/// Durable store key holding the serialized user profile (JSON text)
pub const USER_KEY: &str = "user";

/// Process-external key-value store for credentials.
///
/// Writers always overwrite or remove whole entries; nothing merges.
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// The `{authToken, user}` pair as it sits in a [`CredentialStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedCredentials {
    pub token: String,
    pub user: String,
}

impl PersistedCredentials {
    /// Returns `Some` only when both entries are present.
    pub fn load(store: &dyn CredentialStore) -> Result<Option<Self>> {
        let token = store.get(AUTH_TOKEN_KEY)?;
        let user = store.get(USER_KEY)?;
        match (token, user) {
            (Some(token), Some(user)) => Ok(Some(Self { token, user })),
            _ => Ok(None),
        }
    }

    pub fn save(&self, store: &dyn CredentialStore) -> Result<()> {
        store.set(AUTH_TOKEN_KEY, &self.token)?;
        if let Err(e) = store.set(USER_KEY, &self.user) {
            // Never leave a token behind without its user
            let _ = store.remove(AUTH_TOKEN_KEY);
            return Err(e);
        }
        Ok(())
    }

    /// Remove both entries; missing entries are not an error.
    pub fn clear(store: &dyn CredentialStore) -> Result<()> {
        let token = store.remove(AUTH_TOKEN_KEY);
        let user = store.remove(USER_KEY);
        token.and(user)
    }
}

/// In-process store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

/// JSON file store, rewritten wholesale on every change.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileCredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(&self.path)
            .context("Failed to read credentials file")?;
        serde_json::from_str(&contents).context("Failed to parse credentials file")
    }

    /// Entries to rewrite from. An unreadable file is discarded so it can
    /// never block a login or logout; the flag says it must be rewritten.
    fn entries_for_write(&self) -> Result<(BTreeMap<String, String>, bool)> {
        match self.read_entries() {
            Ok(entries) => Ok((entries, false)),
            Err(e) if self.path.exists() => {
                warn!(path = %self.path.display(), error = %e, "Discarding unreadable credentials file");
                Ok((BTreeMap::new(), true))
            }
            Err(e) => Err(e),
        }
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if entries.is_empty() {
            if self.path.exists() {
                std::fs::remove_file(&self.path)
                    .context("Failed to remove credentials file")?;
            }
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, contents).context("Failed to write credentials file")?;
        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let (mut entries, _) = self.entries_for_write()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let (mut entries, discarded) = self.entries_for_write()?;
        if entries.remove(key).is_some() || discarded {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}
