//! Deferred, composable computation pipelines for PermSync.
//!
//! Every PermSync component signals failure through `Result`, never through
//! an uncaught panic across its public boundary. [`Pipeline`] is the
//! substrate that enforces this: a lazily evaluated async computation whose
//! combinators (`map`, `and_then`, `tap`, `recover`) preserve sequential
//! semantics and whose `run()` captures panics as typed failures.
//!
//! # Key Types
//!
//! - [`Pipeline`] — Deferred `Result`-producing computation
//! - [`Fault`] — Error types that can absorb panics and failed recoveries
//! - [`UnwrapError`] / [`OutcomeExt`] — Unsafe accessor naming the wrapped cause

pub mod fault;
pub mod pipeline;

pub use fault::{Fault, OutcomeExt, UnwrapError};
pub use pipeline::Pipeline;
