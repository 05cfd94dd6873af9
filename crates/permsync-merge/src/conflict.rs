//! Conflict and change bookkeeping.

use serde::{Deserialize, Serialize};

use permsync_types::{BlockKind, Document, EntryKey, FieldValue};

/// Which side wins a conflicted field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChosenSide {
    Local,
    Remote,
}

/// One conflicted field: local and remote diverge, and the local copy was
/// also modified relative to the recorded base (or no base is available).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    /// The block the entry lives in.
    pub block: BlockKind,
    /// The entry key.
    pub key: EntryKey,
    /// The conflicted field name.
    pub field: String,
    /// The field value in the recorded base, if any.
    pub base: Option<FieldValue>,
    /// The local field value (absent if the field is missing locally).
    pub local: Option<FieldValue>,
    /// The remote field value (absent if the field is missing remotely).
    pub remote: Option<FieldValue>,
}

impl Conflict {
    /// A stable key for resolution maps: `block:entryKey:field`.
    pub fn conflict_key(&self) -> String {
        format!("{}:{}:{}", self.block, self.key, self.field)
    }
}

/// One change applied to the local document by a merge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryChange {
    pub block: BlockKind,
    pub key: EntryKey,
    /// The changed field; `None` means the whole entry was added.
    pub field: Option<String>,
    /// The previous value (absent for additions).
    pub old: Option<FieldValue>,
    /// The new value (absent when a field was removed).
    pub new: Option<FieldValue>,
}

/// The outcome of a successful merge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeReport {
    /// The merged document (committed to the local key).
    pub merged: Document,
    /// Conflicts that were detected and resolved.
    pub conflicts: Vec<Conflict>,
    /// Changes that were applied, in application order.
    pub applied: Vec<EntryChange>,
}

impl MergeReport {
    /// Returns `true` if the merge changed nothing.
    pub fn is_noop(&self) -> bool {
        self.conflicts.is_empty() && self.applied.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_key_is_stable() {
        let c = Conflict {
            block: BlockKind::ObjectPermissions,
            key: EntryKey::parse("Account"),
            field: "allowRead".into(),
            base: Some(FieldValue::Bool(false)),
            local: Some(FieldValue::Bool(true)),
            remote: Some(FieldValue::Bool(false)),
        };
        assert_eq!(c.conflict_key(), "objectPermissions:Account:allowRead");
    }

    #[test]
    fn noop_report() {
        let report = MergeReport {
            merged: Document::new("Admin"),
            conflicts: vec![],
            applied: vec![],
        };
        assert!(report.is_noop());
    }
}
