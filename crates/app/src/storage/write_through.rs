//! Write-through persistence for a single key.
//!
//! Owners update their in-memory value synchronously, then hand the encoded
//! value to [`WriteThrough::write`] while still holding their state lock.
//! Each write is stamped with a generation number in mutation order and
//! runs on a spawned task. Writes for one key are serialized, and a write
//! whose generation is older than the last completed one is dropped, so
//! storage converges on the newest value.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use super::{KeyValueStore, StorageError};

/// Persists successive values of one key in the background.
#[derive(Debug)]
pub struct WriteThrough<S> {
    store: Arc<S>,
    key: &'static str,
    issued: AtomicU64,
    completed: Arc<Mutex<u64>>,
}

impl<S: KeyValueStore> WriteThrough<S> {
    /// Create a writer for `key` in `store`.
    #[must_use]
    pub fn new(store: Arc<S>, key: &'static str) -> Self {
        Self {
            store,
            key,
            issued: AtomicU64::new(0),
            completed: Arc::new(Mutex::new(0)),
        }
    }

    /// Storage key this writer targets.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        self.key
    }

    /// Schedule a write of `value`.
    ///
    /// Call while holding the lock that guards the value being persisted,
    /// so generations follow mutation order. Requires a Tokio runtime; with
    /// none available the write is dropped and the handle reports it.
    pub fn write(&self, value: String) -> PersistHandle {
        let generation = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let key = self.key;

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(key, generation, "No async runtime, value not persisted");
            return PersistHandle::failed(StorageError::Unavailable(
                "no async runtime to persist on".to_string(),
            ));
        };

        let store = Arc::clone(&self.store);
        let completed = Arc::clone(&self.completed);
        let task = runtime.spawn(async move {
            let mut latest = completed.lock().await;
            if *latest > generation {
                debug!(key, generation, latest = *latest, "Skipping superseded write");
                return Ok(());
            }

            let result = store.set(key, value).await;
            *latest = generation;

            match &result {
                Ok(()) => debug!(key, generation, "Persisted value"),
                Err(e) => warn!(key, generation, error = %e, "Failed to persist value"),
            }
            result
        });

        PersistHandle::spawned(task)
    }

    /// Encode `value` as JSON and schedule its write.
    pub fn write_json<T: Serialize + ?Sized>(&self, value: &T) -> PersistHandle {
        match serde_json::to_string(value) {
            Ok(json) => self.write(json),
            Err(source) => {
                error!(key = self.key, error = %source, "Failed to encode value");
                PersistHandle::failed(StorageError::Encode {
                    key: self.key.to_string(),
                    source,
                })
            }
        }
    }
}

// =============================================================================
// PersistHandle
// =============================================================================

/// Completion handle for one or more background writes.
///
/// Dropping the handle does not cancel the writes. Production code drops
/// it; tests await [`PersistHandle::wait`] to observe the stored value.
#[derive(Debug, Default)]
pub struct PersistHandle {
    pending: Vec<Pending>,
}

#[derive(Debug)]
enum Pending {
    Spawned(JoinHandle<Result<(), StorageError>>),
    Failed(StorageError),
}

impl PersistHandle {
    /// A handle with no writes behind it.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    fn spawned(task: JoinHandle<Result<(), StorageError>>) -> Self {
        Self {
            pending: vec![Pending::Spawned(task)],
        }
    }

    fn failed(error: StorageError) -> Self {
        Self {
            pending: vec![Pending::Failed(error)],
        }
    }

    /// Combine two handles.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.pending.extend(other.pending);
        self
    }

    /// Number of writes behind this handle.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Wait for every write to finish.
    ///
    /// # Errors
    ///
    /// Returns the first write failure. All writes are awaited regardless.
    pub async fn wait(self) -> Result<(), StorageError> {
        let mut first_error = None;

        for pending in self.pending {
            let result = match pending {
                Pending::Spawned(task) => task
                    .await
                    .unwrap_or_else(|e| Err(StorageError::Task(e.to_string()))),
                Pending::Failed(e) => Err(e),
            };
            if let Err(e) = result {
                first_error.get_or_insert(e);
            }
        }

        first_error.map_or(Ok(()), Err)
    }
}

impl FromIterator<PersistHandle> for PersistHandle {
    fn from_iter<I: IntoIterator<Item = PersistHandle>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::merge)
    }
}
