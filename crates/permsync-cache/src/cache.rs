//! The cache handle.
//!
//! A [`MetadataCache`] is an explicitly passed handle over a file store —
//! there is no process-wide singleton. Lifecycle: construct over a store
//! root, use, optionally clear. Concurrent reads are safe; concurrent writes
//! to the same key are last-writer-wins (records are derived, re-fetchable
//! data, not authoritative state).

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use permsync_store::{FileStore, StoreError};

use crate::error::{CacheError, CacheResult};
use crate::record::CacheRecord;

/// The composite cache key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheKey {
    pub org_key: String,
    pub metadata_type: String,
    pub api_version: String,
}

impl CacheKey {
    pub fn new(
        org_key: impl Into<String>,
        metadata_type: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Self {
        Self {
            org_key: org_key.into(),
            metadata_type: metadata_type.into(),
            api_version: api_version.into(),
        }
    }
}

/// TTL-bounded cache for remote member listings.
pub struct MetadataCache {
    store: Arc<dyn FileStore>,
    root: String,
}

impl MetadataCache {
    /// Create a cache persisting under `root` in the given store.
    pub fn new(store: Arc<dyn FileStore>, root: impl Into<String>) -> Self {
        Self {
            store,
            root: root.into(),
        }
    }

    fn file_key(&self, key: &CacheKey) -> String {
        format!(
            "{}/{}/{}-{}.json",
            self.root, key.org_key, key.metadata_type, key.api_version
        )
    }

    /// Look up a fresh record. Any failure degrades to a miss.
    ///
    /// Corrupted records are discarded from the store; expired records are
    /// treated as a miss. Read errors are logged and reported as a miss —
    /// the cache is strictly an optimization.
    pub async fn get(&self, key: &CacheKey) -> Option<CacheRecord> {
        match self.try_get(key).await {
            Ok(found) => found,
            Err(e) => {
                warn!(error = %e, "cache read degraded to a miss");
                None
            }
        }
    }

    /// Store a record. Failures are logged and swallowed.
    pub async fn set(&self, record: &CacheRecord) {
        if let Err(e) = self.try_set(record).await {
            warn!(error = %e, "cache write skipped");
        }
    }

    /// Remove one record. Failures are logged and swallowed.
    pub async fn clear(&self, key: &CacheKey) {
        let file_key = self.file_key(key);
        if let Err(e) = self.store.remove(&file_key).await {
            warn!(key = %file_key, error = %e, "cache clear skipped");
        }
    }

    /// Fallible lookup exposing the typed failure modes.
    pub async fn try_get(&self, key: &CacheKey) -> CacheResult<Option<CacheRecord>> {
        let file_key = self.file_key(key);
        let bytes = match self.store.read_file(&file_key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return Ok(None),
            Err(e) => {
                return Err(CacheError::Read {
                    key: file_key,
                    detail: e.to_string(),
                })
            }
        };

        let record: CacheRecord = match serde_json::from_slice(&bytes) {
            Ok(record) => record,
            Err(e) => {
                // Discard the corrupted entry so later reads are clean misses.
                let _ = self.store.remove(&file_key).await;
                return Err(CacheError::Corrupted {
                    key: file_key,
                    detail: e.to_string(),
                });
            }
        };

        if record.is_expired(Utc::now()) {
            debug!(key = %file_key, "cache record expired");
            return Ok(None);
        }
        Ok(Some(record))
    }

    /// Fallible store exposing the typed failure modes.
    pub async fn try_set(&self, record: &CacheRecord) -> CacheResult<()> {
        let key = CacheKey::new(
            record.org_key.clone(),
            record.metadata_type.clone(),
            record.api_version.clone(),
        );
        let file_key = self.file_key(&key);
        let bytes = serde_json::to_vec(record).map_err(|e| CacheError::Write {
            key: file_key.clone(),
            detail: e.to_string(),
        })?;
        self.store
            .write_file(&file_key, &bytes)
            .await
            .map_err(|e| match e {
                StoreError::DiskFull { .. } => CacheError::DiskFull { key: file_key },
                other => CacheError::Write {
                    key: file_key,
                    detail: other.to_string(),
                },
            })
    }
}

impl std::fmt::Debug for MetadataCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataCache")
            .field("root", &self.root)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use permsync_store::InMemoryFileStore;
    use std::time::Duration;

    fn cache_over(store: Arc<InMemoryFileStore>) -> MetadataCache {
        MetadataCache::new(store, "cache")
    }

    fn record(org: &str) -> CacheRecord {
        CacheRecord::new(
            org,
            "classAccesses",
            "62.0",
            vec!["Foo".into(), "Bar".into()],
            Duration::from_secs(3600),
        )
    }

    #[tokio::test]
    async fn set_then_get_round_trip() {
        let store = Arc::new(InMemoryFileStore::new());
        let cache = cache_over(Arc::clone(&store));
        let rec = record("dev");

        cache.set(&rec).await;
        let key = CacheKey::new("dev", "classAccesses", "62.0");
        assert_eq!(cache.get(&key).await, Some(rec));
    }

    #[tokio::test]
    async fn miss_on_absent_key() {
        let store = Arc::new(InMemoryFileStore::new());
        let cache = cache_over(store);
        let key = CacheKey::new("dev", "classAccesses", "62.0");
        assert_eq!(cache.get(&key).await, None);
    }

    #[tokio::test]
    async fn expired_record_is_a_miss() {
        let store = Arc::new(InMemoryFileStore::new());
        let cache = cache_over(Arc::clone(&store));
        let mut rec = record("dev");
        rec.ttl = Duration::from_secs(10);
        rec.fetched_at = Utc::now() - chrono::Duration::seconds(60);
        cache.set(&rec).await;

        let key = CacheKey::new("dev", "classAccesses", "62.0");
        assert_eq!(cache.get(&key).await, None);
    }

    #[tokio::test]
    async fn corrupted_record_is_discarded_as_a_miss() {
        let store = Arc::new(InMemoryFileStore::new());
        let cache = cache_over(Arc::clone(&store));
        store.plant("cache/dev/classAccesses-62.0.json", b"{not json");

        let key = CacheKey::new("dev", "classAccesses", "62.0");
        let err = cache.try_get(&key).await.unwrap_err();
        assert!(matches!(err, CacheError::Corrupted { .. }));
        // The entry was discarded.
        assert!(!store
            .exists("cache/dev/classAccesses-62.0.json")
            .await
            .unwrap());
        // The non-fatal accessor degrades to a miss.
        assert_eq!(cache.get(&key).await, None);
    }

    #[tokio::test]
    async fn read_failure_degrades_to_miss() {
        let store = Arc::new(InMemoryFileStore::new());
        let cache = cache_over(Arc::clone(&store));
        cache.set(&record("dev")).await;

        store.fail_reads(true);
        let key = CacheKey::new("dev", "classAccesses", "62.0");
        assert!(matches!(
            cache.try_get(&key).await.unwrap_err(),
            CacheError::Read { .. }
        ));
        assert_eq!(cache.get(&key).await, None);
    }

    #[tokio::test]
    async fn write_and_disk_full_failures_are_swallowed() {
        let store = Arc::new(InMemoryFileStore::new());
        let cache = cache_over(Arc::clone(&store));

        store.fail_writes(true);
        assert!(matches!(
            cache.try_set(&record("dev")).await.unwrap_err(),
            CacheError::Write { .. }
        ));
        cache.set(&record("dev")).await; // must not panic or error
        store.fail_writes(false);

        store.disk_full(true);
        assert!(matches!(
            cache.try_set(&record("dev")).await.unwrap_err(),
            CacheError::DiskFull { .. }
        ));
        cache.set(&record("dev")).await;
    }

    #[tokio::test]
    async fn clear_removes_the_record() {
        let store = Arc::new(InMemoryFileStore::new());
        let cache = cache_over(Arc::clone(&store));
        cache.set(&record("dev")).await;

        let key = CacheKey::new("dev", "classAccesses", "62.0");
        cache.clear(&key).await;
        assert_eq!(cache.get(&key).await, None);
    }

    #[tokio::test]
    async fn keys_are_isolated_per_environment() {
        let store = Arc::new(InMemoryFileStore::new());
        let cache = cache_over(store);
        cache.set(&record("dev")).await;
        cache.set(&record("uat")).await;

        assert!(cache
            .get(&CacheKey::new("dev", "classAccesses", "62.0"))
            .await
            .is_some());
        assert!(cache
            .get(&CacheKey::new("uat", "classAccesses", "62.0"))
            .await
            .is_some());
        assert!(cache
            .get(&CacheKey::new("prod", "classAccesses", "62.0"))
            .await
            .is_none());
    }
}
