//! Persisted key-value storage behind the ledger
//!
//! Values are whole records (a full JSON collection per key), mirroring the
//! browser local-storage layout the ledger was designed around. There is no
//! partial update and no locking between writers.

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

use crate::errors::{LedgerError, LedgerResult};

/// Trait for storage backend implementations
pub trait LedgerStorage: Send + Sync {
    /// Get the raw value under `key`
    fn load(&self, key: &str) -> LedgerResult<Option<String>>;

    /// Replace the value under `key`
    fn save(&self, key: &str, value: &str) -> LedgerResult<()>;

    /// Drop `key`; missing keys are not an error
    fn remove(&self, key: &str) -> LedgerResult<()>;
}

/// Decode the record under `key`, if any
pub fn load_json<T: DeserializeOwned>(storage: &dyn LedgerStorage, key: &str) -> LedgerResult<Option<T>> {
    match storage.load(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| LedgerError::CorruptRecord { key: key.to_string(), source }),
        None => Ok(None),
    }
}

/// Encode and store `value` under `key`
pub fn save_json<T: Serialize + ?Sized>(storage: &dyn LedgerStorage, key: &str, value: &T) -> LedgerResult<()> {
    let raw = serde_json::to_string(value)?;
    storage.save(key, &raw)
}

/// In-process storage. Clones share the same map, so two ledgers opened on
/// clones of one `MemoryStorage` behave like two browser tabs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<RwLock<HashMap<String, String>>>,
    writes: Arc<AtomicU64>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `save` calls so far
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl LedgerStorage for MemoryStorage {
    fn load(&self, key: &str) -> LedgerResult<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> LedgerResult<()> {
        self.entries.write().insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn remove(&self, key: &str) -> LedgerResult<()> {
        self.entries.write().remove(key);
        Ok(())
    }
}

/// One JSON file per key under a data directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open (creating if needed) the data directory
    pub fn open(dir: impl AsRef<Path>) -> LedgerResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        debug!("file storage opened at {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> LedgerResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(LedgerError::Storage(format!("invalid storage key: {:?}", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl LedgerStorage for FileStorage {
    fn load(&self, key: &str) -> LedgerResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, key: &str, value: &str) -> LedgerResult<()> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        debug!("wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    fn remove(&self, key: &str) -> LedgerResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
