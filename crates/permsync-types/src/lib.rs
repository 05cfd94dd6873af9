//! Foundation types for PermSync.
//!
//! This crate provides the permission-document model and the diagnostics
//! surface used throughout the PermSync system. Every other PermSync crate
//! depends on `permsync-types`.
//!
//! # Key Types
//!
//! - [`Document`] — One named permission record: an ordered list of blocks
//! - [`Block`] / [`BlockKind`] — A typed group of permission entries
//! - [`Entry`] / [`EntryKey`] / [`FieldValue`] — One keyed permission record
//! - [`LineView`] — A document rendered as numbered raw text lines (diff input)
//! - [`Diagnostic`] / [`ErrorCategory`] — Stable error codes and corrective actions

pub mod block;
pub mod document;
pub mod error;
pub mod line_view;

pub use block::BlockKind;
pub use document::{Block, Document, Entry, EntryKey, FieldValue};
pub use error::{Diagnostic, ErrorCategory};
pub use line_view::LineView;
