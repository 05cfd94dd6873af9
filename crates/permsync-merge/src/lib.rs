//! Transactional merge engine for PermSync.
//!
//! Merges a remote permission document into a local one against an optional
//! recorded base, under a fixed set of resolution strategies. Every merge
//! attempt walks the same state machine:
//!
//! ```text
//! Start -> Backup -> DetectConflicts -> Resolve -> Validate -> {Commit | Rollback}
//! ```
//!
//! Backup is a mandatory safety gate: if it cannot be created the merge
//! aborts before any mutation. Validation failure restores the local
//! document byte-identically from the backup.
//!
//! # Key Types
//!
//! - [`MergeEngine`] / [`MergeRequest`] / [`MergeReport`] -- The engine surface
//! - [`MergeStrategy`] -- Closed set of resolution strategies
//! - [`Conflict`] / [`ChosenSide`] / [`ConflictResolver`] -- Conflict surface

pub mod backup;
pub mod conflict;
pub mod engine;
pub mod error;
pub mod resolver;
pub mod strategy;

pub use backup::{BackupHandle, BackupManager};
pub use conflict::{ChosenSide, Conflict, EntryChange, MergeReport};
pub use engine::{MergeConfig, MergeEngine, MergeRequest};
pub use error::{MergeError, MergeResult};
pub use resolver::{ConflictResolver, MapResolver};
pub use strategy::MergeStrategy;
