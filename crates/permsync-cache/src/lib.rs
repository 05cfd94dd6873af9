//! TTL-keyed metadata cache for PermSync.
//!
//! Remote member listings are expensive; the cache persists them per
//! (environment, metadata type, API version) through the file-store
//! collaborator. The cache is never a source of truth: every failure mode
//! (corrupted record, read error, write error, disk full) is non-fatal for
//! the caller — corrupted records are discarded as a miss, write failures
//! are logged and skipped.

pub mod cache;
pub mod error;
pub mod record;

pub use cache::{CacheKey, MetadataCache};
pub use error::{CacheError, CacheResult};
pub use record::CacheRecord;
