//! File-backed key-value store: one file per key under a data directory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use super::{KeyValueStore, StorageError};

/// Key-value store persisted as files in a directory.
///
/// Each key maps to a file of the same name. Writes go to a temporary file
/// that is then renamed over the target, so a crash mid-write leaves the
/// previous value intact. The directory is created on first write.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory the values live in.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }
}

/// Keys become file names, so only a conservative character set is allowed.
fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

fn io_error(key: &str, source: std::io::Error) -> StorageError {
    StorageError::Io {
        key: key.to_string(),
        source,
    }
}

impl KeyValueStore for FileStore {
    #[instrument(skip(self), fields(root = %self.root.display()))]
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No stored value");
                Ok(None)
            }
            Err(e) => Err(io_error(key, e)),
        }
    }

    #[instrument(skip(self, value), fields(root = %self.root.display(), bytes = value.len()))]
    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let tmp_path = self.root.join(format!(".{key}.tmp"));

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| io_error(key, e))?;
        tokio::fs::write(&tmp_path, value.as_bytes())
            .await
            .map_err(|e| io_error(key, e))?;
        tokio::fs::rename(&tmp_path, &path)
            .await
            .map_err(|e| io_error(key, e))?;

        debug!("Stored value");
        Ok(())
    }

    #[instrument(skip(self), fields(root = %self.root.display()))]
    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(key, e)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_root() -> PathBuf {
        std::env::temp_dir().join(format!("handlekurv-file-store-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_validate_key() {
        assert!(validate_key("shoppingCart").is_ok());
        assert!(validate_key("user_profile-v2.json").is_ok());

        assert!(validate_key("").is_err());
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key(".hidden").is_err());
        assert!(validate_key("a/b").is_err());
        assert!(validate_key("with space").is_err());
    }

    #[tokio::test]
    async fn test_round_trip_and_overwrite() {
        let root = temp_root();
        let store = FileStore::new(&root);

        assert_eq!(store.get("moneySaved").await.unwrap(), None);

        store.set("moneySaved", "10".to_string()).await.unwrap();
        store.set("moneySaved", "22".to_string()).await.unwrap();
        assert_eq!(store.get("moneySaved").await.unwrap().as_deref(), Some("22"));

        // No temp file left behind
        assert!(!root.join(".moneySaved.tmp").exists());

        store.remove("moneySaved").await.unwrap();
        assert_eq!(store.get("moneySaved").await.unwrap(), None);
        store.remove("moneySaved").await.unwrap();

        tokio::fs::remove_dir_all(&root).await.unwrap();
    }

    #[tokio::test]
    async fn test_invalid_key_rejected() {
        let store = FileStore::new(temp_root());
        let err = store.set("../escape", "x".to_string()).await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));
        assert!(!store.root().exists());
    }
}
