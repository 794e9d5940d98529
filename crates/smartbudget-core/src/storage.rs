//! Key-value persistence for month data and settings
//!
//! State lives under two fixed keys. Each is written in full on every
//! mutation and read back once at startup. Malformed or absent values load
//! as the empty month map / default settings; they never fail startup.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::models::{MonthMap, Settings};

/// Key holding the month → transactions map
pub const DATA_KEY: &str = "smart_budget_data";

/// Key holding user settings
pub const SETTINGS_KEY: &str = "smart_budget_settings";

/// A string-valued key-value store
pub trait KeyValueStore: Send + Sync {
    /// Read a value; `Ok(None)` when the key has never been written
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// One `<key>.json` file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `dir`
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty()
            || !key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(Error::InvalidData(format!("Invalid storage key: {}", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        // Write to a sibling temp file and rename so a crash never leaves a
        // half-written value behind
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&path).map_err(|e| Error::Io(e.error))?;
        debug!(key, path = %path.display(), bytes = value.len(), "Wrote state");
        Ok(())
    }
}

/// In-process store, used by tests and dry runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .read()
            .map_err(|_| Error::InvalidData("Failed to acquire store lock".into()))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .write()
            .map_err(|_| Error::InvalidData("Failed to acquire store lock".into()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Read the month map, falling back to empty on any failure
pub fn load_months(store: &dyn KeyValueStore) -> MonthMap {
    load_or_default(store, DATA_KEY)
}

/// Read settings merged over defaults, falling back to defaults on any failure
pub fn load_settings(store: &dyn KeyValueStore) -> Settings {
    load_or_default(store, SETTINGS_KEY)
}

fn load_or_default<T>(store: &dyn KeyValueStore, key: &str) -> T
where
    T: Default + serde::de::DeserializeOwned,
{
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!(key, "No persisted state, using defaults");
            return T::default();
        }
        Err(e) => {
            warn!(key, error = %e, "Failed to read persisted state, using defaults");
            return T::default();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(key, error = %e, "Malformed persisted state, using defaults");
            T::default()
        }
    }
}

/// Serialize and write the full month map
pub fn save_months(store: &dyn KeyValueStore, months: &MonthMap) -> Result<()> {
    let json = serde_json::to_string(months)?;
    store.set(DATA_KEY, &json)?;
    info!(months = months.len(), "Saved budget data");
    Ok(())
}

/// Serialize and write settings
pub fn save_settings(store: &dyn KeyValueStore, settings: &Settings) -> Result<()> {
    let json = serde_json::to_string(settings)?;
    store.set(SETTINGS_KEY, &json)?;
    info!("Saved settings");
    Ok(())
}
