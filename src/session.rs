use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;
use tracing::warn;

use crate::models::profile::Profile;

/// Fixed key the signed-in profile lives under.
pub const PROFILE_KEY: &str = "user";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("profile store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("profile store could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("profile store lock poisoned")]
    Poisoned,
}

/// Client-local key/value persistence for the logged-in user. No expiry and
/// no server side.
pub trait ProfileStore: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn save(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}

pub fn persist_profile(store: &dyn ProfileStore, profile: &Profile) -> Result<(), StoreError> {
    let encoded = serde_json::to_string(profile)?;
    store.save(PROFILE_KEY, &encoded)
}

/// Returns the stored profile, if any. Unreadable entries are dropped and
/// reported as absent so stale local state never blocks a fresh login.
pub fn restore_profile(store: &dyn ProfileStore) -> Option<Profile> {
    let raw = match store.load(PROFILE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            warn!(%err, "failed to read stored profile; treating as signed out");
            if let Err(err) = store.clear() {
                warn!(%err, "failed to reset profile store");
            }
            return None;
        }
    };

    match serde_json::from_str::<Profile>(&raw) {
        Ok(profile) => Some(profile),
        Err(err) => {
            warn!(%err, "stored profile is corrupt; discarding");
            if let Err(err) = store.remove(PROFILE_KEY) {
                warn!(%err, "failed to discard corrupt profile");
            }
            None
        }
    }
}

/// Logout wipes everything the client stored, not just the profile key.
pub fn clear_profiles(store: &dyn ProfileStore) -> Result<(), StoreError> {
    store.clear()
}

/// JSON object on disk, one entry per key.
pub struct FileProfileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;
        Ok(())
    }
}

impl ProfileStore for FileProfileStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(self.read_all()?.remove(key))
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        // An unreadable file is replaced rather than blocking the write.
        let mut entries = self.read_all().unwrap_or_default();
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut entries = self.read_all().unwrap_or_default();
        entries.remove(key);
        self.write_all(&entries)
    }

    fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[derive(Default)]
pub struct MemoryProfileStore {
    entries: Mutex<HashMap<String, String>>,
}

impl ProfileStore for MemoryProfileStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.clear();
        Ok(())
    }
}
