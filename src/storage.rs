// Storage adapter
// Raw text under string keys (the localStorage contract), with JSON values layered on top.

use dashmap::DashMap;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, warn};

// Versioned keys; bump the suffix when a schema changes
pub const STORAGE_CART: &str = "oaa_cart_v4";
pub const STORAGE_BOOKINGS: &str = "oaa_bookings_v4";
pub const STORAGE_LASTSEARCH: &str = "oaa_search_v4";
pub const STORAGE_LANG: &str = "oaa_lang";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

// Persistent key-value substrate
pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    // Overwrites any prior value, last write wins
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

// Shape checks that serde alone can't express (uniqueness, ranges).
// A value that fails is treated exactly like unparseable content.
pub trait Validate {
    fn is_valid(&self) -> bool {
        true
    }
}

// Deserialize the value stored under `key`, or hand back `fallback` when the key is
// absent, the store can't be read, the text isn't valid JSON for `T`, or it fails validation.
// A stored JSON `null` also yields the fallback.
pub fn read_json<T>(store: &dyn KeyValueStore, key: &str, fallback: T) -> T
where
    T: DeserializeOwned + Validate,
{
    let raw = match store.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return fallback,
        Err(e) => {
            warn!(key, error = %e, "storage read failed, using default");
            return fallback;
        }
    };

    match serde_json::from_str::<Option<T>>(&raw) {
        Ok(Some(value)) if value.is_valid() => value,
        Ok(Some(_)) => {
            warn!(key, "stored value failed validation, using default");
            fallback
        }
        Ok(None) => fallback,
        Err(e) => {
            warn!(key, error = %e, "stored value is malformed, using default");
            fallback
        }
    }
}

pub fn write_json<T>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    debug!(key, bytes = raw.len(), "writing storage key");
    store.set_item(key, &raw)
}

// Plain text values (the language code is stored bare, not as JSON)
pub fn read_text(store: &dyn KeyValueStore, key: &str) -> Option<String> {
    match store.get_item(key) {
        Ok(value) => value,
        Err(e) => {
            warn!(key, error = %e, "storage read failed");
            None
        }
    }
}

pub fn write_text(store: &dyn KeyValueStore, key: &str, value: &str) -> Result<(), StorageError> {
    store.set_item(key, value)
}

// In-process store, one per simulated browser profile
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).map(|entry| entry.value().clone()))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items.remove(key);
        Ok(())
    }
}

// One JSON object on disk mapping each key to its stored text.
// The whole file is rewritten on every write.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    items: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let items = match std::fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => parse_entries(&path, &content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(StorageError::IoError(e)),
        };

        debug!(path = %path.display(), keys = items.len(), "opened file store");
        Ok(Self {
            path,
            items: Mutex::new(items),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // Written beside the target, then renamed over it
    fn flush(&self, items: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(items)?;
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(content.as_bytes())?;
        file.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

// Per-key recovery: a non-text entry is kept as its JSON text and the other keys load as stored
fn parse_entries(path: &Path, content: &str) -> BTreeMap<String, String> {
    let entries = match serde_json::from_str::<Map<String, Value>>(content) {
        Ok(entries) => entries,
        Err(e) => {
            let backup = path.with_extension("json.bak");
            warn!(
                path = %path.display(),
                backup = %backup.display(),
                error = %e,
                "store file is malformed, keeping a copy and starting empty"
            );
            if let Err(e) = std::fs::write(&backup, content) {
                warn!(error = %e, "could not keep a copy of the malformed store file");
            }
            return BTreeMap::new();
        }
    };

    entries
        .into_iter()
        .map(|(key, value)| match value {
            Value::String(text) => (key, text),
            other => {
                warn!(key = %key, "stored entry is not text, keeping its JSON form");
                (key, other.to_string())
            }
        })
        .collect()
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.lock().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock();
        items.insert(key.to_string(), value.to_string());
        self.flush(&items)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock();
        if items.remove(key).is_some() {
            self.flush(&items)?;
        }
        Ok(())
    }
}
