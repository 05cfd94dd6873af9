//! Multi-environment comparison orchestrator for PermSync.
//!
//! Fetches the same named documents from N remote environments concurrently
//! (bounded parallelism), records per-environment failures without cancelling
//! sibling fetches, and builds a pairwise diff matrix across every pair of
//! successful environments. Partial success is not an error: only the case
//! where every environment fails yields a failure, aggregating every cause.
//!
//! # Key Types
//!
//! - [`CompareOrchestrator`] / [`CompareRequest`] / [`CompareReport`]
//! - [`ComparisonMatrix`] / [`PairDiff`] / [`EnvFailure`]
//! - [`CancelFlag`] -- stops new fetches, lets in-flight fetches finish

pub mod cancel;
pub mod error;
pub mod orchestrator;
pub mod types;

pub use cancel::CancelFlag;
pub use error::{CompareError, CompareResult};
pub use orchestrator::CompareOrchestrator;
pub use types::{
    CompareConfig, CompareReport, CompareRequest, ComparisonMatrix, EnvFailure, PairDiff,
};
