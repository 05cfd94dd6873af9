//! Incremental change detection for PermSync.
//!
//! Before re-fetching a whole permission document, the detector compares the
//! local entry inventory against the remote member listing (cache-first) and
//! decides whether a fetch is needed at all. Every error path falls back to
//! a full fetch — never to a silent skip — so the cache and the remote
//! listing are strictly optimizations.

pub mod decision;
pub mod detector;

pub use decision::{DetectorConfig, FetchDecision, MemberDelta};
pub use detector::ChangeDetector;
