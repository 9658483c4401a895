//! Key-value record stores
//!
//! The favorites layer only needs get/set of string values by key.
//! [`JsonFileStore`] keeps every record in one JSON object on disk and
//! rewrites it atomically (write-to-temp + rename). [`MemoryStore`] keeps
//! records in process and can be told to fail, which is what the rollback
//! paths are tested against.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use thiserror::Error;

/// Persistence failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PersistenceError {
    #[error("Storage I/O failed: {0}")]
    Io(String),

    #[error("Stored record '{key}' is corrupt: {reason}")]
    Corrupt { key: String, reason: String },
}

impl From<std::io::Error> for PersistenceError {
    fn from(err: std::io::Error) -> Self {
        PersistenceError::Io(err.to_string())
    }
}

/// String records addressed by key
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// `Ok(None)` when no record exists under `key`
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError>;
}

// =============================================================================
// JSON File Store
// =============================================================================

/// All records in a single JSON object file.
///
/// ```json
/// { "favoriteMovies": "[\"550\",\"268\"]" }
/// ```
pub struct JsonFileStore {
    path: PathBuf,
    /// Serializes read-modify-write of the file within this process
    write_lock: tokio::sync::Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<BTreeMap<String, String>, PersistenceError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };

        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&contents).map_err(|e| PersistenceError::Corrupt {
            key: self.path.display().to_string(),
            reason: e.to_string(),
        })
    }

    async fn write_all(&self, records: &BTreeMap<String, String>) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_string_pretty(records)
            .map_err(|e| PersistenceError::Io(e.to_string()))?;

        let temp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, json).await?;
        tokio::fs::rename(&temp_path, &self.path).await?;

        tracing::debug!(path = ?self.path, records = records.len(), "store written");
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let mut records = self.read_all().await?;
        Ok(records.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.read_all().await?;
        records.insert(key.to_string(), value.to_string());
        self.write_all(&records).await
    }
}

// =============================================================================
// Memory Store
// =============================================================================

/// In-process store with failure injection
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<BTreeMap<String, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record directly
    pub fn with_record(self, key: &str, value: &str) -> Self {
        if let Ok(mut records) = self.records.lock() {
            records.insert(key.to_string(), value.to_string());
        }
        self
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful `set` calls
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Raw record, bypassing failure injection
    pub fn raw(&self, key: &str) -> Option<String> {
        self.records.lock().ok().and_then(|r| r.get(key).cloned())
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(PersistenceError::Io("read refused".into()));
        }
        let records = self
            .records
            .lock()
            .map_err(|e| PersistenceError::Io(e.to_string()))?;
        Ok(records.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PersistenceError::Io("write refused".into()));
        }
        let mut records = self
            .records
            .lock()
            .map_err(|e| PersistenceError::Io(e.to_string()))?;
        records.insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
