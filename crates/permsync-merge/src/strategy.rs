//! The closed set of merge resolution strategies.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MergeError;

/// How conflicts between local and remote are resolved.
///
/// The strategy set is fixed and fully enumerable; dispatch is a pattern
/// match, never open-ended polymorphism.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MergeStrategy {
    /// Keep the local value for every conflict.
    LocalWins,
    /// Take the remote (org) value for every conflict.
    OrgWins,
    /// Include entries from both sides, de-duplicated by key; diverging
    /// scalar fields take the remote value.
    Union,
    /// Fail immediately with the full conflict set if any conflict exists.
    AbortOnConflict,
    /// Resolve entry-by-entry through an external resolution collaborator.
    Selective,
}

impl MergeStrategy {
    /// The stable strategy name.
    pub fn name(&self) -> &'static str {
        match self {
            MergeStrategy::LocalWins => "local-wins",
            MergeStrategy::OrgWins => "org-wins",
            MergeStrategy::Union => "union",
            MergeStrategy::AbortOnConflict => "abort-on-conflict",
            MergeStrategy::Selective => "selective",
        }
    }
}

impl std::fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MergeStrategy {
    type Err = MergeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local-wins" => Ok(MergeStrategy::LocalWins),
            "org-wins" | "remote-wins" => Ok(MergeStrategy::OrgWins),
            "union" => Ok(MergeStrategy::Union),
            "abort-on-conflict" => Ok(MergeStrategy::AbortOnConflict),
            "selective" | "interactive" => Ok(MergeStrategy::Selective),
            other => Err(MergeError::InvalidStrategy {
                name: other.to_string(),
            }),
        }
    }
}
