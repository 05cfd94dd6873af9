use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::error::{StoreError, StoreResult};
use crate::traits::FileStore;

/// Filesystem-backed file store rooted at a directory.
///
/// Keys map to paths under the root; parent directories are created on
/// write. Keys may not be empty, absolute, or contain `..` components.
pub struct DiskFileStore {
    root: PathBuf,
}

impl DiskFileStore {
    /// Create a store rooted at `root`. The directory is created lazily on
    /// first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, key: &str) -> StoreResult<PathBuf> {
        if key.is_empty() {
            return Err(StoreError::InvalidKey("empty key".to_string()));
        }
        let rel = Path::new(key);
        let escapes = rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if rel.is_absolute() || escapes {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(rel))
    }
}

#[async_trait]
impl FileStore for DiskFileStore {
    async fn read_file(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let path = self.resolve(key)?;
        match fs::read(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::from_io(key, e)),
        }
    }

    async fn write_file(&self, key: &str, content: &[u8]) -> StoreResult<()> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::from_io(key, e))?;
        }
        fs::write(&path, content)
            .await
            .map_err(|e| StoreError::from_io(key, e))
    }

    async fn exists(&self, key: &str) -> StoreResult<bool> {
        let path = self.resolve(key)?;
        Ok(fs::try_exists(&path)
            .await
            .map_err(|e| StoreError::from_io(key, e))?)
    }

    async fn remove(&self, key: &str) -> StoreResult<bool> {
        let path = self.resolve(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::from_io(key, e)),
        }
    }
}

impl std::fmt::Debug for DiskFileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiskFileStore")
            .field("root", &self.root)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskFileStore::new(dir.path());

        store
            .write_file("cache/dev/profile.json", b"{}")
            .await
            .unwrap();
        assert!(store.exists("cache/dev/profile.json").await.unwrap());
        assert_eq!(
            store.read_file("cache/dev/profile.json").await.unwrap(),
            Some(b"{}".to_vec())
        );
        assert!(store.remove("cache/dev/profile.json").await.unwrap());
        assert_eq!(store.read_file("cache/dev/profile.json").await.unwrap(), None);
    }

    #[tokio::test]
    async fn missing_file_is_none_not_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskFileStore::new(dir.path());
        assert_eq!(store.read_file("absent").await.unwrap(), None);
        assert!(!store.remove("absent").await.unwrap());
    }

    #[tokio::test]
    async fn rejects_escaping_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskFileStore::new(dir.path());
        for key in ["", "../outside", "/etc/passwd", "a/../../b"] {
            assert!(matches!(
                store.read_file(key).await.unwrap_err(),
                StoreError::InvalidKey(_)
            ));
        }
    }
}
