use async_trait::async_trait;

use crate::error::StoreResult;

/// Keyed byte store for disposable PermSync state.
///
/// All implementations must satisfy these invariants:
/// - Keys are slash-separated relative paths (no leading `/`, no `..`).
/// - `write_file` replaces any existing content atomically from the caller's
///   point of view; concurrent writes to the same key are last-writer-wins.
/// - Concurrent reads are always safe.
/// - Removing a key that does not exist is not an error.
/// - I/O failures surface as typed [`crate::StoreError`]s, never as panics.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Read the content stored under `key`.
    ///
    /// Returns `Ok(None)` if the key does not exist; `Err` on I/O failure.
    async fn read_file(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Write `content` under `key`, creating or replacing it.
    async fn write_file(&self, key: &str, content: &[u8]) -> StoreResult<()>;

    /// Check whether `key` exists.
    async fn exists(&self, key: &str) -> StoreResult<bool>;

    /// Remove `key`. Returns `true` if it existed.
    async fn remove(&self, key: &str) -> StoreResult<bool>;
}
