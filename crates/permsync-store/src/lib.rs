//! Persistent file store collaborator for PermSync.
//!
//! The cache and the merge engine persist disposable state (cache records,
//! pre-merge backups) through the narrow [`FileStore`] interface. Deleting
//! anything a store holds must never corrupt subsequent runs — it only forces
//! cache misses or makes a rollback unavailable.

pub mod disk;
pub mod error;
pub mod memory;
pub mod traits;

pub use disk::DiskFileStore;
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryFileStore;
pub use traits::FileStore;
