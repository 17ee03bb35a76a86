//! Test doubles for the preference store

use std::time::Duration;

use async_trait::async_trait;

use super::storage::{KeyValueStore, MemoryStore, StorageError};

/// Memory store with slow reads, so concurrent read-modify-write cycles overlap
#[derive(Default)]
pub struct SlowReadStore {
    inner: MemoryStore,
}

#[async_trait]
impl KeyValueStore for SlowReadStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.set(key, value).await
    }
}
