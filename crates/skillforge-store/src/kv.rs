//! The `KeyValueStore` trait and the in-memory implementation.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;

/// Whole-blob key-value persistence.
///
/// Values are opaque strings (JSON documents by convention, see
/// [`crate::keys`]). The trait is object-safe so callers can hold a
/// `Box<dyn KeyValueStore>` and swap the SQLite store for [`MemoryStore`]
/// in tests.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the value stored under `key`, or `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete the value under `key`. Deleting an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}

// Compile-time assertion: the trait must stay object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn KeyValueStore) {}
};

/// In-memory store for tests and `--ephemeral` runs.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .await
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_round_trip() {
        let store = MemoryStore::new();
        assert!(store.get("training_plan").await.unwrap().is_none());

        store.set("training_plan", "{\"weeks\":[]}").await.unwrap();
        assert_eq!(
            store.get("training_plan").await.unwrap().as_deref(),
            Some("{\"weeks\":[]}")
        );

        store.set("training_plan", "updated").await.unwrap();
        assert_eq!(
            store.get("training_plan").await.unwrap().as_deref(),
            Some("updated")
        );

        store.remove("training_plan").await.unwrap();
        assert!(store.get("training_plan").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn removing_absent_key_is_ok() {
        let store = MemoryStore::new();
        store.remove("nonexistent").await.unwrap();
    }

    #[tokio::test]
    async fn store_is_usable_as_trait_object() {
        let store: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
        store.set("k", "v").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
    }
}
