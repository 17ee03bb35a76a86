use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize storage: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// String key-value storage in the style of browser local storage
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-process storage, lost on restart
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File-based storage: one JSON object mapping keys to string values
///
/// Every `set` rewrites the whole file through a sibling temp file and a
/// rename, so a crash mid-write leaves the previous contents intact.
pub struct FileStore {
    entries: RwLock<HashMap<String, String>>,
    file_path: PathBuf,
}

impl FileStore {
    /// Open the store at `file_path`, starting empty if the file is missing or unreadable
    pub async fn open(file_path: impl Into<PathBuf>) -> Self {
        let file_path = file_path.into();
        let entries = Self::load(&file_path).await;

        Self {
            entries: RwLock::new(entries),
            file_path,
        }
    }

    async fn load(path: &Path) -> HashMap<String, String> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(
                    path = %path.display(),
                    "Preference file does not exist, starting fresh"
                );
                return HashMap::new();
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to read preference file"
                );
                return HashMap::new();
            }
        };

        match serde_json::from_str::<HashMap<String, String>>(&content) {
            Ok(entries) => {
                tracing::info!(count = entries.len(), "Loaded preferences from storage");
                entries
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Preference file is corrupt, starting fresh"
                );
                HashMap::new()
            }
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .file_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.file_path.with_file_name(name)
    }

    async fn save(&self, entries: &HashMap<String, String>) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(entries)?;

        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let temp_path = self.temp_path();
        tokio::fs::write(&temp_path, content).await?;
        if let Err(e) = tokio::fs::rename(&temp_path, &self.file_path).await {
            // Best effort; the original file is still untouched
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        tracing::debug!(count = entries.len(), "Saved preferences to storage");

        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        // Held across the write so file contents follow the order of `set` calls
        let mut entries = self.entries.write().await;
        let previous = entries.insert(key.to_string(), value.to_string());

        if let Err(e) = self.save(&entries).await {
            match previous {
                Some(previous) => entries.insert(key.to_string(), previous),
                None => entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }
}
