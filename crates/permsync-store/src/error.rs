//! Error types for the store crate.

use thiserror::Error;

/// Errors surfaced by [`crate::FileStore`] implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The key does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The key is malformed (empty, absolute, or escaping the root).
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// The backing medium is out of space.
    #[error("disk full while writing {key}")]
    DiskFull { key: String },

    /// Any other I/O failure.
    #[error("i/o error on {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Classify an I/O error for `key`, mapping out-of-space conditions to
    /// [`StoreError::DiskFull`].
    pub fn from_io(key: &str, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => StoreError::NotFound(key.to_string()),
            std::io::ErrorKind::StorageFull => StoreError::DiskFull {
                key: key.to_string(),
            },
            _ => StoreError::Io {
                key: key.to_string(),
                source,
            },
        }
    }

    /// Returns `true` for the missing-key case.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

/// Convenience alias for store results.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_io_maps_not_found() {
        let err = StoreError::from_io("a/b", std::io::Error::from(std::io::ErrorKind::NotFound));
        assert!(err.is_not_found());
    }

    #[test]
    fn from_io_maps_storage_full() {
        let err =
            StoreError::from_io("a/b", std::io::Error::from(std::io::ErrorKind::StorageFull));
        assert!(matches!(err, StoreError::DiskFull { .. }));
    }
}
