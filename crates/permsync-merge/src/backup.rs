//! Pre-merge backups.
//!
//! One backup per merge attempt, under a predictable, collision-free key
//! (document name + UTC timestamp + sequence number). Backups are
//! disposable: deleting them only makes rollback unavailable, it never
//! corrupts subsequent runs.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use permsync_store::{FileStore, StoreError, StoreResult};

/// Names the backup created for one merge attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackupHandle {
    /// The store key the backup lives under.
    pub key: String,
}

/// Writes and restores per-attempt backups through the file store.
pub struct BackupManager {
    store: Arc<dyn FileStore>,
    root: String,
    seq: AtomicU64,
}

impl BackupManager {
    /// Create a manager writing under `root`.
    pub fn new(store: Arc<dyn FileStore>, root: impl Into<String>) -> Self {
        Self {
            store,
            root: root.into(),
            seq: AtomicU64::new(0),
        }
    }

    /// Write a write-once backup of `content` for `document_name`.
    pub async fn create(&self, document_name: &str, content: &[u8]) -> StoreResult<BackupHandle> {
        let stamp = Utc::now().format("%Y%m%dT%H%M%S%3f");
        let seq = self.seq.fetch_add(1, Ordering::SeqCst);
        let key = format!("{}/{}-{}-{}.bak", self.root, document_name, stamp, seq);
        self.store.write_file(&key, content).await?;
        debug!(%key, bytes = content.len(), "backup created");
        Ok(BackupHandle { key })
    }

    /// Read the backed-up content.
    pub async fn read(&self, handle: &BackupHandle) -> StoreResult<Vec<u8>> {
        self.store
            .read_file(&handle.key)
            .await?
            .ok_or_else(|| StoreError::NotFound(handle.key.clone()))
    }
}

impl std::fmt::Debug for BackupManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackupManager")
            .field("root", &self.root)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use permsync_store::InMemoryFileStore;

    #[tokio::test]
    async fn create_and_read_back() {
        let store = Arc::new(InMemoryFileStore::new());
        let backups = BackupManager::new(store, "backups");

        let handle = backups.create("Admin", b"profile: Admin\n").await.unwrap();
        assert!(handle.key.starts_with("backups/Admin-"));
        assert_eq!(
            backups.read(&handle).await.unwrap(),
            b"profile: Admin\n".to_vec()
        );
    }

    #[tokio::test]
    async fn sequential_backups_never_collide() {
        let store = Arc::new(InMemoryFileStore::new());
        let backups = BackupManager::new(Arc::clone(&store) as Arc<dyn FileStore>, "backups");

        let a = backups.create("Admin", b"one").await.unwrap();
        let b = backups.create("Admin", b"two").await.unwrap();
        assert_ne!(a.key, b.key);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn missing_backup_is_not_found() {
        let store = Arc::new(InMemoryFileStore::new());
        let backups = BackupManager::new(store, "backups");
        let err = backups
            .read(&BackupHandle {
                key: "backups/absent.bak".into(),
            })
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
