//! [`KeyValueStore`] implementations.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use directories::ProjectDirs;
use techvault_core::error::{VaultError, VaultResult};
use techvault_core::storage::KeyValueStore;
use tracing::debug;

use crate::error::ClientError;

/// Process-local store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> VaultResult<MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| VaultError::Storage("memory store lock poisoned".into()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> VaultResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> VaultResult<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> VaultResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// JSON-file store. Every write is flushed to disk immediately so the
/// session survives a crash as well as a clean exit.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open (or lazily create) the store at `path`.
    pub fn open(path: impl Into<PathBuf>) -> VaultResult<Self> {
        let path = path.into();
        let entries: BTreeMap<String, String> = if path.exists() {
            let raw = fs::read_to_string(&path).map_err(ClientError::from)?;
            if raw.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&raw).map_err(ClientError::from)?
            }
        } else {
            BTreeMap::new()
        };
        debug!(path = %path.display(), keys = entries.len(), "Opened session store");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Platform default location, e.g. `~/.local/share/techvault/session.json`.
    pub fn default_path() -> VaultResult<PathBuf> {
        let dirs = ProjectDirs::from("com", "techvault", "techvault").ok_or_else(|| {
            VaultError::Storage("could not determine the user data directory".into())
        })?;
        Ok(dirs.data_dir().join("session.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> VaultResult<MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| VaultError::Storage("file store lock poisoned".into()))
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> VaultResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(ClientError::from)?;
        }
        let content = serde_json::to_string_pretty(entries).map_err(ClientError::from)?;
        fs::write(&self.path, content).map_err(ClientError::from)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> VaultResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> VaultResult<()> {
        let mut entries = self.lock()?;
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)
    }

    fn remove(&self, key: &str) -> VaultResult<()> {
        let mut entries = self.lock()?;
        if entries.remove(key).is_some() {
            self.flush(&entries)?;
        }
        Ok(())
    }
}
