//! The external resolution collaborator for the `selective` strategy.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::conflict::{ChosenSide, Conflict};

/// Resolves conflicts entry-by-entry.
///
/// The engine exposes the conflicts and accepts the returned map; it never
/// prompts. The map is keyed by [`Conflict::conflict_key`]. A conflict
/// missing from the map counts as declined, which the engine treats as
/// abort-on-conflict for that run. Implementations must be deterministic.
#[async_trait]
pub trait ConflictResolver: Send + Sync {
    async fn resolve(&self, conflicts: &[Conflict]) -> BTreeMap<String, ChosenSide>;
}

/// A resolver backed by a pre-supplied resolution map.
#[derive(Clone, Debug, Default)]
pub struct MapResolver {
    choices: BTreeMap<String, ChosenSide>,
}

impl MapResolver {
    /// Create an empty resolver (declines everything).
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a choice for one conflict key.
    pub fn with_choice(mut self, conflict_key: impl Into<String>, side: ChosenSide) -> Self {
        self.choices.insert(conflict_key.into(), side);
        self
    }
}

#[async_trait]
impl ConflictResolver for MapResolver {
    async fn resolve(&self, conflicts: &[Conflict]) -> BTreeMap<String, ChosenSide> {
        conflicts
            .iter()
            .filter_map(|c| {
                let key = c.conflict_key();
                self.choices.get(&key).map(|side| (key, *side))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use permsync_types::{BlockKind, EntryKey, FieldValue};

    fn conflict(field: &str) -> Conflict {
        Conflict {
            block: BlockKind::UserPermissions,
            key: EntryKey::parse("ApiEnabled"),
            field: field.into(),
            base: None,
            local: Some(FieldValue::Bool(true)),
            remote: Some(FieldValue::Bool(false)),
        }
    }

    #[tokio::test]
    async fn map_resolver_answers_known_keys_only() {
        let c = conflict("enabled");
        let resolver = MapResolver::new().with_choice(c.conflict_key(), ChosenSide::Remote);

        let resolved = resolver.resolve(&[c.clone(), conflict("other")]).await;
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved.get(&c.conflict_key()), Some(&ChosenSide::Remote));
    }

    #[tokio::test]
    async fn empty_resolver_declines() {
        let resolved = MapResolver::new().resolve(&[conflict("enabled")]).await;
        assert!(resolved.is_empty());
    }
}
