//! Collaborator boundaries for PermSync.
//!
//! The core never calls a remote system or parses raw bytes directly. It
//! goes through two narrow interfaces: [`MetadataProvider`] (named documents
//! and member listings per environment) and [`DocumentCodec`] (parse/render
//! between raw text and the [`permsync_types::Document`] model).
//!
//! [`PlainTextCodec`] is the fixed line-oriented rendering the diff engine
//! consumes; [`StaticProvider`] is an in-memory provider for tests and
//! embedding, with scripted failures and latency.

pub mod error;
pub mod memory;
pub mod text;
pub mod traits;

pub use error::{FetchError, ListError, ParseError, ParseResult};
pub use memory::StaticProvider;
pub use text::PlainTextCodec;
pub use traits::{DocumentCodec, MetadataProvider, RawDocument};
