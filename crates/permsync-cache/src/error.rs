//! Error types for the cache crate.
//!
//! Every variant is non-fatal by contract: callers degrade to a cache miss
//! (reads) or proceed without caching (writes).

use thiserror::Error;

/// Errors that can occur during cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The stored record could not be decoded. The entry is discarded.
    #[error("corrupted cache record at {key}: {detail}")]
    Corrupted { key: String, detail: String },

    /// The backing store failed while reading.
    #[error("cache read failed at {key}: {detail}")]
    Read { key: String, detail: String },

    /// The backing store failed while writing.
    #[error("cache write failed at {key}: {detail}")]
    Write { key: String, detail: String },

    /// The backing store is out of space.
    #[error("cache disk full at {key}")]
    DiskFull { key: String },
}

/// Convenience alias for cache results.
pub type CacheResult<T> = Result<T, CacheError>;
