//! Small key-value persistence for the selected class.
//!
//! Values carry a max-age like a cookie. The session refreshes the selector
//! entry on every read and write so an active user never loses it.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Key under which the selected class is stored.
pub const SELECTOR_KEY: &str = "class";

/// Default lifetime of the selector entry: five days.
pub const SELECTOR_MAX_AGE: Duration = Duration::from_secs(5 * 24 * 3600);

/// get/set of single string values with an expiry.
pub trait KeyValueStore: Send {
    /// The value under `key` if present and not expired.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key` for `max_age`.
    fn set(&self, key: &str, value: &str, max_age: Duration) -> Result<()>;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
struct Entry {
    value: String,
    /// Unix seconds after which the entry is gone.
    expires: u64,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
    clock: Option<fn() -> u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `clock` (Unix seconds) instead of the system time.
    pub fn with_clock(clock: fn() -> u64) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock: Some(clock),
        }
    }

    fn now(&self) -> u64 {
        self.clock.map(|c| c()).unwrap_or_else(now_secs)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let now = self.now();
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        match entries.get(key) {
            Some(e) if e.expires > now => Ok(Some(e.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str, max_age: Duration) -> Result<()> {
        let expires = self.now().saturating_add(max_age.as_secs());
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires,
            },
        );
        Ok(())
    }
}

/// Store persisted as a JSON object in one file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn load(&self) -> Result<HashMap<String, Entry>> {
        match std::fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => Ok(HashMap::new()),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| Error::parse(self.path.display().to_string(), e)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, entries: &HashMap<String, Entry>) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }
        let json = serde_json::to_vec_pretty(entries).map_err(|e| Error::Other(e.to_string()))?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.load()?;
        let now = now_secs();
        let expired: Vec<String> = entries
            .iter()
            .filter(|(_, e)| e.expires <= now)
            .map(|(k, _)| k.clone())
            .collect();
        let value = entries.get(key).filter(|e| e.expires > now).map(|e| e.value.clone());
        if !expired.is_empty() {
            for k in expired {
                entries.remove(&k);
            }
            self.save(&entries)?;
        }
        Ok(value)
    }

    fn set(&self, key: &str, value: &str, max_age: Duration) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.load()?;
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires: now_secs().saturating_add(max_age.as_secs()),
            },
        );
        self.save(&entries)
    }
}
