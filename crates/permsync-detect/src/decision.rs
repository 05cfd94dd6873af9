//! Decision and delta types.

use std::collections::BTreeSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// What the caller should fetch for one document type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FetchDecision {
    /// Local and remote inventories match: skip the fetch.
    Skip,
    /// Few members changed and the provider supports selective fetch:
    /// fetch only these members (added and removed, sorted).
    Partial(Vec<String>),
    /// Re-fetch the whole document. The safe default for every error path.
    Full { reason: String },
}

impl FetchDecision {
    /// Returns `true` if no fetch is needed.
    pub fn is_skip(&self) -> bool {
        matches!(self, FetchDecision::Skip)
    }
}

/// Set difference between a local inventory and a remote listing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDelta {
    /// Members present remotely but not locally.
    pub added: Vec<String>,
    /// Members present locally but not remotely.
    pub removed: Vec<String>,
    /// Members present on both sides.
    pub unchanged: Vec<String>,
}

impl MemberDelta {
    /// Compute the delta between a local inventory and a remote listing.
    pub fn compute(local: &BTreeSet<String>, remote: &[String]) -> Self {
        let remote_set: BTreeSet<&String> = remote.iter().collect();
        let added = remote
            .iter()
            .filter(|m| !local.contains(*m))
            .cloned()
            .collect();
        let mut removed = Vec::new();
        let mut unchanged = Vec::new();
        for member in local {
            if remote_set.contains(member) {
                unchanged.push(member.clone());
            } else {
                removed.push(member.clone());
            }
        }
        Self {
            added,
            removed,
            unchanged,
        }
    }

    /// Total number of changed members (added + removed).
    pub fn changed_count(&self) -> usize {
        self.added.len() + self.removed.len()
    }

    /// Returns `true` if the inventories match exactly.
    pub fn is_unchanged(&self) -> bool {
        self.changed_count() == 0
    }

    /// All changed member names, sorted.
    pub fn changed_members(&self) -> Vec<String> {
        let mut members: Vec<String> = self
            .added
            .iter()
            .chain(self.removed.iter())
            .cloned()
            .collect();
        members.sort();
        members
    }
}

/// Detector tuning.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Maximum changed-member count still eligible for a partial fetch.
    pub partial_threshold: usize,
    /// TTL for cached member listings.
    pub cache_ttl: Duration,
    /// Remote API version the listings are taken against.
    pub api_version: String,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            partial_threshold: 10,
            cache_ttl: Duration::from_secs(900),
            api_version: "62.0".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(members: &[&str]) -> BTreeSet<String> {
        members.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn identical_inventories_are_unchanged() {
        let local = set(&["A", "B"]);
        let delta = MemberDelta::compute(&local, &["A".into(), "B".into()]);
        assert!(delta.is_unchanged());
        assert_eq!(delta.unchanged.len(), 2);
    }

    #[test]
    fn added_and_removed_split() {
        let local = set(&["A", "B"]);
        let delta = MemberDelta::compute(&local, &["B".into(), "C".into()]);
        assert_eq!(delta.added, vec!["C"]);
        assert_eq!(delta.removed, vec!["A"]);
        assert_eq!(delta.unchanged, vec!["B"]);
        assert_eq!(delta.changed_count(), 2);
        assert_eq!(delta.changed_members(), vec!["A", "C"]);
    }

    #[test]
    fn empty_both_sides() {
        let delta = MemberDelta::compute(&BTreeSet::new(), &[]);
        assert!(delta.is_unchanged());
    }

    #[test]
    fn default_config() {
        let cfg = DetectorConfig::default();
        assert_eq!(cfg.partial_threshold, 10);
        assert!(!cfg.api_version.is_empty());
    }
}
