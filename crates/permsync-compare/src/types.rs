//! Request, configuration, and report types for comparison runs.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use permsync_diff::LineDiff;

/// What to compare: which documents, across which environments.
///
/// Environment order is significant: every per-environment list in the
/// report preserves this order regardless of fetch completion order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompareRequest {
    /// Document names to fetch from every environment.
    pub documents: Vec<String>,
    /// Environment labels, at least two.
    pub environments: Vec<String>,
}

impl CompareRequest {
    pub fn new(
        documents: impl IntoIterator<Item = impl Into<String>>,
        environments: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            documents: documents.into_iter().map(Into::into).collect(),
            environments: environments.into_iter().map(Into::into).collect(),
        }
    }
}

/// Tuning knobs for the orchestrator.
#[derive(Clone, Copy, Debug)]
pub struct CompareConfig {
    /// Maximum concurrent fetches across all (environment, document) pairs.
    pub max_parallelism: usize,
    /// Per-fetch deadline.
    pub fetch_timeout: Duration,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            max_parallelism: 4,
            fetch_timeout: Duration::from_secs(30),
        }
    }
}

/// One environment that failed to produce a usable document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvFailure {
    /// The environment label from the request.
    pub environment: String,
    /// Stable machine-readable cause code.
    pub code: String,
    /// Human-readable cause.
    pub detail: String,
}

/// The diff between one ordered pair of successful environments.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairDiff {
    /// The earlier environment in request order; its lines are the
    /// "local" side of the diff.
    pub left_environment: String,
    /// The later environment; the "remote" side.
    pub right_environment: String,
    pub diff: LineDiff,
}

/// The full pairwise comparison for one document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonMatrix {
    /// The document name.
    pub document: String,
    /// Environments that produced a parseable document, in request order.
    pub successful_environments: Vec<String>,
    /// Environments that failed for this document, in request order.
    pub failed_environments: Vec<EnvFailure>,
    /// One entry per unordered pair of successful environments.
    pub pairs: Vec<PairDiff>,
    /// Successful environments grouped by identical canonical rendering.
    /// Groups are ordered by first occurrence; members keep request order.
    pub equivalence_groups: Vec<Vec<String>>,
}

impl ComparisonMatrix {
    /// Returns `true` when every successful environment holds an identical
    /// document. Vacuously true with fewer than two successes.
    pub fn all_equivalent(&self) -> bool {
        self.equivalence_groups.len() <= 1
    }
}

/// The outcome of a comparison run with at least one usable environment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareReport {
    /// One matrix per requested document, in request order.
    pub matrices: Vec<ComparisonMatrix>,
    /// Environments that failed for every requested document. Warning-level:
    /// their presence never fails the run while a sibling succeeded.
    pub failed_environments: Vec<EnvFailure>,
}
