//! Device-local key-value persistence.
//!
//! # Architecture
//!
//! - [`KeyValueStore`] is the only seam between the stores and the device:
//!   string keys, string values, get/set/remove.
//! - [`MemoryStore`] backs tests and ephemeral sessions.
//! - [`FileStore`] keeps one file per key under a data directory.
//! - [`WriteThrough`] turns every in-memory mutation into a spawned,
//!   generation-ordered write and hands back a [`PersistHandle`].
//!
//! Read failures are treated as absent values by the stores; write failures
//! are logged and otherwise ignored.

mod file;
mod memory;
mod write_through;

use std::future::Future;

use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use write_through::{PersistHandle, WriteThrough};

/// Key holding the cart line items as a JSON array.
pub const CART_KEY: &str = "shoppingCart";

/// Key holding the total money saved, as a decimal string.
pub const MONEY_SAVED_KEY: &str = "moneySaved";

/// Key holding the total CO2 saved in kilograms, as a decimal string.
pub const CO2_SAVED_KEY: &str = "co2Saved";

/// Key holding the user profile as a JSON object.
pub const PROFILE_KEY: &str = "userProfileData";

/// Errors raised by key-value storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Key contains characters the backend cannot store.
    #[error("Invalid storage key: '{0}'")]
    InvalidKey(String),

    /// Value could not be encoded for storage.
    #[error("Failed to encode value for key '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Backend refused the operation.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// The background write task did not complete.
    #[error("Persist task failed: {0}")]
    Task(String),
}

/// Asynchronous string key-value storage.
///
/// Implementations must be cheap to share behind an `Arc` and safe to call
/// from spawned tasks.
pub trait KeyValueStore: Send + Sync + 'static {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: String) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Delete the value under `key`. Removing an absent key succeeds.
    fn remove(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send;
}
