// SPDX-License-Identifier: AGPL-3.0
// GoMate Core - Key-value storage
//
// Everything the app persists goes through `Storage`.
// Backends are fallible; `Storage` logs failures and hands callers
// a safe default instead, so nothing above this layer handles I/O errors.

use crate::types::AppError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Raw string-keyed storage
#[async_trait]
pub trait KeyValueBackend: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError>;
    async fn set(&self, key: &str, value: String) -> Result<(), AppError>;
    async fn remove(&self, key: &str) -> Result<(), AppError>;
    async fn remove_many(&self, keys: &[&str]) -> Result<(), AppError>;
}

/// In-memory backend, lost when the process exits
#[derive(Default)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), AppError> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), AppError> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn remove_many(&self, keys: &[&str]) -> Result<(), AppError> {
        let mut entries = self.entries.write().await;
        for key in keys {
            entries.remove(*key);
        }
        Ok(())
    }
}

/// File-backed backend: a single JSON object of key -> value, cached in memory
/// and rewritten on every change
pub struct FileBackend {
    entries: RwLock<HashMap<String, String>>,
    file_path: PathBuf,
}

impl FileBackend {
    /// Open the storage file, loading it if it exists. A file that cannot be
    /// read or parsed is logged and treated as empty.
    pub async fn open(file_path: impl Into<PathBuf>) -> Self {
        let file_path = file_path.into();
        tracing::info!("Storage file path: {:?}", file_path);

        let entries = match tokio::fs::read_to_string(&file_path).await {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse storage file, starting empty: {}", e);
                HashMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No storage file found, starting empty");
                HashMap::new()
            }
            Err(e) => {
                tracing::error!("Failed to read storage file, starting empty: {}", e);
                HashMap::new()
            }
        };

        Self {
            entries: RwLock::new(entries),
            file_path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Persist entries to disk. Writes a sibling temp file and renames it over
    /// the real one so readers never see a half-written file.
    async fn persist(&self, entries: &HashMap<String, String>) -> Result<(), AppError> {
        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    AppError::Storage(format!("Failed to create storage dir: {}", e))
                })?;
            }
        }

        let content = serde_json::to_string_pretty(entries)?;
        let tmp_path = self.file_path.with_extension("json.tmp");

        tokio::fs::write(&tmp_path, content)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write storage: {}", e)))?;
        tokio::fs::rename(&tmp_path, &self.file_path)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to replace storage: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl KeyValueBackend for FileBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    // Changes are made on a copy and only become visible once persisted.

    async fn set(&self, key: &str, value: String) -> Result<(), AppError> {
        let mut entries = self.entries.write().await;
        let mut next = entries.clone();
        next.insert(key.to_string(), value);
        self.persist(&next).await?;
        *entries = next;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), AppError> {
        let mut entries = self.entries.write().await;
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.remove(key);
        self.persist(&next).await?;
        *entries = next;
        Ok(())
    }

    async fn remove_many(&self, keys: &[&str]) -> Result<(), AppError> {
        let mut entries = self.entries.write().await;
        if !keys.iter().any(|key| entries.contains_key(*key)) {
            return Ok(());
        }
        let mut next = entries.clone();
        for key in keys {
            next.remove(*key);
        }
        self.persist(&next).await?;
        *entries = next;
        Ok(())
    }
}

/// Infallible storage adapter over a backend
#[derive(Clone)]
pub struct Storage {
    backend: Arc<dyn KeyValueBackend>,
}

impl Storage {
    pub fn new(backend: Arc<dyn KeyValueBackend>) -> Self {
        Self { backend }
    }

    /// Storage that lives only as long as the process
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    /// Storage persisted to the JSON file at `path`
    pub async fn open_file(path: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FileBackend::open(path).await))
    }

    /// Read a value, keeping a failed read distinct from a missing key.
    /// For callers that must not mistake one for the other.
    pub async fn try_get(&self, key: &str) -> Result<Option<String>, AppError> {
        self.backend.get(key).await
    }

    /// Read a value; a missing key and a failed read both yield `None`
    pub async fn get(&self, key: &str) -> Option<String> {
        match self.backend.get(key).await {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Error reading {}: {}", key, e);
                None
            }
        }
    }

    /// Write a value, returning whether it was stored
    pub async fn set(&self, key: &str, value: impl Into<String>) -> bool {
        match self.backend.set(key, value.into()).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Error writing {}: {}", key, e);
                false
            }
        }
    }

    pub async fn remove(&self, key: &str) {
        if let Err(e) = self.backend.remove(key).await {
            tracing::error!("Error removing {}: {}", key, e);
        }
    }

    pub async fn remove_many(&self, keys: &[&str]) {
        if let Err(e) = self.backend.remove_many(keys).await {
            tracing::error!("Error removing {:?}: {}", keys, e);
        }
    }
}
