//! Local index of uploads for backends without native list/delete.
//!
//! The index is a single named record holding a JSON array of
//! [`IndexRecord`]s. Persistence goes through the [`IndexStore`] trait so the
//! file-backed store can be swapped for [`MemoryIndexStore`] in tests.
//! [`LocalIndex`] serializes its own read-modify-write cycles; two
//! `LocalIndex` values over the same namespace are not coordinated.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::traits::{StorageError, StorageResult};

/// Namespace under which the Telegram adapter persists its index.
pub const TELEGRAM_INDEX_NAMESPACE: &str = "telegram_uploads";

/// One upload recorded in the local index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexRecord {
    pub key: String,
    pub url: String,
    pub file_id: String,
    pub file_path: String,
    pub last_modified: DateTime<Utc>,
    pub size: u64,
}

/// Raw persistence for index data, keyed by namespace.
#[async_trait]
pub trait IndexStore: Send + Sync {
    async fn load(&self, namespace: &str) -> StorageResult<Option<String>>;

    async fn save(&self, namespace: &str, contents: &str) -> StorageResult<()>;
}

/// Stores each namespace as `<dir>/<namespace>.json`.
#[derive(Debug, Clone)]
pub struct FileIndexStore {
    dir: PathBuf,
}

impl FileIndexStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, namespace: &str) -> StorageResult<PathBuf> {
        if namespace.is_empty()
            || namespace.contains("..")
            || namespace.contains('/')
            || namespace.contains('\\')
        {
            return Err(StorageError::InvalidKey(format!(
                "Invalid index namespace: {}",
                namespace
            )));
        }
        Ok(self.dir.join(format!("{}.json", namespace)))
    }
}

#[async_trait]
impl IndexStore for FileIndexStore {
    async fn load(&self, namespace: &str) -> StorageResult<Option<String>> {
        let path = self.path_for(namespace)?;
        match fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::IndexError(format!(
                "Failed to read index {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn save(&self, namespace: &str, contents: &str) -> StorageResult<()> {
        let path = self.path_for(namespace)?;
        fs::create_dir_all(&self.dir).await.map_err(|e| {
            StorageError::IndexError(format!(
                "Failed to create index directory {}: {}",
                self.dir.display(),
                e
            ))
        })?;

        // Write beside the target and rename so readers never see a partial file
        let tmp_path = path.with_extension("json.tmp");
        let mut file = fs::File::create(&tmp_path).await.map_err(|e| {
            StorageError::IndexError(format!("Failed to create {}: {}", tmp_path.display(), e))
        })?;
        file.write_all(contents.as_bytes()).await.map_err(|e| {
            StorageError::IndexError(format!("Failed to write {}: {}", tmp_path.display(), e))
        })?;
        file.sync_all().await.map_err(|e| {
            StorageError::IndexError(format!("Failed to sync {}: {}", tmp_path.display(), e))
        })?;
        drop(file);

        fs::rename(&tmp_path, &path).await.map_err(|e| {
            StorageError::IndexError(format!("Failed to replace {}: {}", path.display(), e))
        })?;

        Ok(())
    }
}

/// In-memory index store, for tests and ephemeral use.
#[derive(Debug, Default)]
pub struct MemoryIndexStore {
    entries: StdMutex<HashMap<String, String>>,
}

impl MemoryIndexStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IndexStore for MemoryIndexStore {
    async fn load(&self, namespace: &str) -> StorageResult<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| StorageError::IndexError("index store lock poisoned".to_string()))?;
        Ok(entries.get(namespace).cloned())
    }

    async fn save(&self, namespace: &str, contents: &str) -> StorageResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StorageError::IndexError("index store lock poisoned".to_string()))?;
        entries.insert(namespace.to_string(), contents.to_string());
        Ok(())
    }
}

/// Upload index with atomic append and remove operations.
pub struct LocalIndex {
    store: Arc<dyn IndexStore>,
    namespace: String,
    write_lock: Mutex<()>,
}

impl LocalIndex {
    pub fn new(store: Arc<dyn IndexStore>, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// All records in insertion order. Missing, unreadable or corrupt data
    /// reads as empty.
    pub async fn records(&self) -> StorageResult<Vec<IndexRecord>> {
        match self.load_records().await {
            Ok(records) => Ok(records),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    namespace = %self.namespace,
                    "Failed to load upload index, treating it as empty"
                );
                Ok(Vec::new())
            }
        }
    }

    /// Fails with `IndexError` if the store cannot be read, so the index is
    /// never overwritten after a failed load.
    pub async fn append(&self, record: IndexRecord) -> StorageResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load_records().await?;
        records.push(record);
        self.persist(&records).await
    }

    /// Remove every record with `key`. Returns whether anything was removed.
    pub async fn remove_by_key(&self, key: &str) -> StorageResult<bool> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load_records().await?;
        let before = records.len();
        records.retain(|r| r.key != key);
        if records.len() == before {
            return Ok(false);
        }
        self.persist(&records).await?;
        Ok(true)
    }

    /// Store errors propagate; absent or corrupt data reads as empty.
    async fn load_records(&self) -> StorageResult<Vec<IndexRecord>> {
        let Some(raw) = self.store.load(&self.namespace).await? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<IndexRecord>>(&raw) {
            Ok(records) => Ok(records),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    namespace = %self.namespace,
                    "Upload index is corrupt, treating it as empty"
                );
                Ok(Vec::new())
            }
        }
    }

    async fn persist(&self, records: &[IndexRecord]) -> StorageResult<()> {
        let contents = serde_json::to_string(records)
            .map_err(|e| StorageError::IndexError(format!("Failed to encode index: {}", e)))?;
        self.store.save(&self.namespace, &contents).await
    }
}
