use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::{StoreError, StoreResult};
use crate::traits::FileStore;

/// In-memory, HashMap-based file store.
///
/// Intended for tests and embedding. Content is held behind a `RwLock` for
/// safe concurrent access. Failure-injection switches let degradation tests
/// exercise every cache/backup error path without a real filesystem.
pub struct InMemoryFileStore {
    files: RwLock<HashMap<String, Vec<u8>>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    disk_full: AtomicBool,
}

impl InMemoryFileStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            files: RwLock::new(HashMap::new()),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            disk_full: AtomicBool::new(false),
        }
    }

    /// Number of files currently stored.
    pub fn len(&self) -> usize {
        self.files.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.files.read().expect("lock poisoned").is_empty()
    }

    /// Make every subsequent read fail with an I/O error.
    pub fn fail_reads(&self, on: bool) {
        self.fail_reads.store(on, Ordering::SeqCst);
    }

    /// Make every subsequent write fail with an I/O error.
    pub fn fail_writes(&self, on: bool) {
        self.fail_writes.store(on, Ordering::SeqCst);
    }

    /// Make every subsequent write fail as disk-full.
    pub fn disk_full(&self, on: bool) {
        self.disk_full.store(on, Ordering::SeqCst);
    }

    /// Overwrite a key's content directly, bypassing failure injection.
    /// Used by tests to plant corrupted records.
    pub fn plant(&self, key: &str, content: &[u8]) {
        self.files
            .write()
            .expect("lock poisoned")
            .insert(key.to_string(), content.to_vec());
    }
}

impl Default for InMemoryFileStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FileStore for InMemoryFileStore {
    async fn read_file(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Io {
                key: key.to_string(),
                source: std::io::Error::other("injected read failure"),
            });
        }
        let map = self.files.read().expect("lock poisoned");
        Ok(map.get(key).cloned())
    }

    async fn write_file(&self, key: &str, content: &[u8]) -> StoreResult<()> {
        if self.disk_full.load(Ordering::SeqCst) {
            return Err(StoreError::DiskFull {
                key: key.to_string(),
            });
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Io {
                key: key.to_string(),
                source: std::io::Error::other("injected write failure"),
            });
        }
        let mut map = self.files.write().expect("lock poisoned");
        map.insert(key.to_string(), content.to_vec());
        Ok(())
    }

    async fn exists(&self, key: &str) -> StoreResult<bool> {
        let map = self.files.read().expect("lock poisoned");
        Ok(map.contains_key(key))
    }

    async fn remove(&self, key: &str) -> StoreResult<bool> {
        let mut map = self.files.write().expect("lock poisoned");
        Ok(map.remove(key).is_some())
    }
}

impl std::fmt::Debug for InMemoryFileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryFileStore")
            .field("file_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_read_round_trip() {
        let store = InMemoryFileStore::new();
        store.write_file("cache/a.json", b"hello").await.unwrap();
        assert_eq!(
            store.read_file("cache/a.json").await.unwrap(),
            Some(b"hello".to_vec())
        );
        assert!(store.exists("cache/a.json").await.unwrap());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn missing_key_reads_none() {
        let store = InMemoryFileStore::new();
        assert_eq!(store.read_file("nope").await.unwrap(), None);
        assert!(!store.exists("nope").await.unwrap());
    }

    #[tokio::test]
    async fn remove_reports_existence() {
        let store = InMemoryFileStore::new();
        store.write_file("x", b"1").await.unwrap();
        assert!(store.remove("x").await.unwrap());
        assert!(!store.remove("x").await.unwrap());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn overwrite_is_last_writer_wins() {
        let store = InMemoryFileStore::new();
        store.write_file("k", b"first").await.unwrap();
        store.write_file("k", b"second").await.unwrap();
        assert_eq!(store.read_file("k").await.unwrap(), Some(b"second".to_vec()));
    }

    #[tokio::test]
    async fn injected_failures() {
        let store = InMemoryFileStore::new();
        store.write_file("k", b"v").await.unwrap();

        store.fail_reads(true);
        assert!(store.read_file("k").await.is_err());
        store.fail_reads(false);

        store.fail_writes(true);
        assert!(store.write_file("k", b"v2").await.is_err());
        store.fail_writes(false);

        store.disk_full(true);
        assert!(matches!(
            store.write_file("k", b"v3").await.unwrap_err(),
            StoreError::DiskFull { .. }
        ));
    }
}
