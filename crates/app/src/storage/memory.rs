//! In-memory key-value store.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use super::{KeyValueStore, StorageError};

/// Key-value store held entirely in memory.
///
/// Nothing survives the process. Used by tests and by sessions that should
/// not touch the device.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `entries`.
    #[must_use]
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: Mutex::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Synchronous read of the current value, for assertions.
    #[must_use]
    pub fn peek(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.peek(key))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.lock().insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("moneySaved").await.unwrap(), None);

        store.set("moneySaved", "22".to_string()).await.unwrap();
        assert_eq!(store.get("moneySaved").await.unwrap().as_deref(), Some("22"));

        store.set("moneySaved", "27".to_string()).await.unwrap();
        assert_eq!(store.peek("moneySaved").as_deref(), Some("27"));

        store.remove("moneySaved").await.unwrap();
        assert_eq!(store.get("moneySaved").await.unwrap(), None);

        // Removing again is fine
        store.remove("moneySaved").await.unwrap();
    }

    #[tokio::test]
    async fn test_with_entries() {
        let store = MemoryStore::with_entries([("co2Saved", "3.16")]);
        assert_eq!(store.get("co2Saved").await.unwrap().as_deref(), Some("3.16"));
    }
}
