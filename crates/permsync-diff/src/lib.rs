//! Line-aligned diff engine for PermSync.
//!
//! Aligns two rendered document views with a shortest-edit-script (Myers)
//! and classifies every differing line as added, removed, or changed. The
//! comparison is purely textual: the engine has no knowledge of block or
//! entry semantics, so whitespace-only differences are reported as changes.
//!
//! # Key Types
//!
//! - [`LineDiff`] / [`DiffEntry`] / [`DiffKind`] -- Classified line differences

pub mod line_diff;
pub mod report;

pub use line_diff::diff_lines;
pub use report::{DiffEntry, DiffKind, LineDiff};
