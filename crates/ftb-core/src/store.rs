//! Account store: the single persisted document holding every user's totals.

use std::{
    collections::BTreeMap,
    fs,
    path::PathBuf,
    sync::Mutex,
};

use serde::{Deserialize, Serialize};

use crate::{account::AccountRecord, domain::UserId, errors::Error, Result};

/// Full mapping of user key to record. This is the unit of persistence.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Store {
    #[serde(default)]
    pub users: BTreeMap<String, AccountRecord>,
}

impl Store {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, user_id: UserId) -> Option<&AccountRecord> {
        self.users.get(&user_id.store_key())
    }

    /// Existing record, or a zeroed one inserted on first sight.
    pub fn get_or_create(&mut self, user_id: UserId) -> &mut AccountRecord {
        self.users.entry(user_id.store_key()).or_default()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Key of the first user whose totals JSON cannot represent.
    pub fn non_finite_user(&self) -> Option<&str> {
        self.users
            .iter()
            .find(|(_, r)| !(r.saved.is_finite() && r.spent.is_finite()))
            .map(|(k, _)| k.as_str())
    }
}

/// Persistence port.
///
/// `load` must return an empty store when nothing has been saved yet and an
/// error when saved state exists but cannot be read back.
pub trait AccountStore: Send + Sync {
    fn load(&self) -> Result<Store>;
    fn save(&self, store: &Store) -> Result<()>;
}

/// Store backed by one JSON file, rewritten in full on every save.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl AccountStore for JsonFileStore {
    fn load(&self) -> Result<Store> {
        if !self.path.exists() {
            return Ok(Store::empty());
        }
        let txt = fs::read_to_string(&self.path)?;
        if txt.trim().is_empty() {
            return Ok(Store::empty());
        }
        let store: Store = serde_json::from_str(&txt)?;
        Ok(store)
    }

    fn save(&self, store: &Store) -> Result<()> {
        // serde_json writes NaN/inf as `null`, which would not load back.
        if let Some(key) = store.non_finite_user() {
            return Err(Error::External(format!(
                "refusing to save non-finite totals for user {key}"
            )));
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let txt = serde_json::to_string_pretty(store)?;
        fs::write(&self.path, txt)?;
        Ok(())
    }
}

/// In-process store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Store>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccountStore for MemoryStore {
    fn load(&self) -> Result<Store> {
        Ok(self
            .inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone())
    }

    fn save(&self, store: &Store) -> Result<()> {
        *self.inner.lock().unwrap_or_else(|e| e.into_inner()) = store.clone();
        Ok(())
    }
}
