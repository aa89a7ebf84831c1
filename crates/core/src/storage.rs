//! Key-value storage behind the cart.
//!
//! The storefront implements [`KeyValueStore`] over the visitor's session;
//! [`MemoryStore`] is a process-local map used by tests and tools. Writes are
//! last-write-wins: there is no locking across a read-modify-write.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, RwLock};

use thiserror::Error;

/// Errors from a [`KeyValueStore`].
#[derive(Debug, Error)]
pub enum StorageError {
    /// The underlying store refused the operation.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A value could not be encoded or decoded.
    #[error("storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// String-keyed, string-valued storage.
pub trait KeyValueStore: Send + Sync {
    /// Read a value.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: String)
    -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Delete a value. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// In-memory [`KeyValueStore`]. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().map_or(0, |entries| entries.len())
    }

    /// Whether nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> StorageError {
    StorageError::Backend("memory store lock poisoned".to_string())
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_last_write_wins() {
        let store = MemoryStore::new();
        store.set("cart", "a".to_string()).await.unwrap();
        store.set("cart", "b".to_string()).await.unwrap();
        assert_eq!(store.get("cart").await.unwrap().as_deref(), Some("b"));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_memory_store_clones_share_state() {
        let store = MemoryStore::new();
        let other = store.clone();
        store.set("k", "v".to_string()).await.unwrap();
        assert_eq!(other.get("k").await.unwrap().as_deref(), Some("v"));
        other.remove("k").await.unwrap();
        other.remove("k").await.unwrap();
        assert!(store.is_empty());
    }
}
