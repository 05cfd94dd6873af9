//! Diff report types.

use serde::{Deserialize, Serialize};

/// How one line differs between local and remote.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiffKind {
    /// The line exists only on the remote side.
    Added,
    /// The line exists only on the local side.
    Removed,
    /// A local line was replaced by a remote line at the same aligned
    /// position.
    Changed,
}

/// One classified line difference.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffEntry {
    /// 1-based line number: the local position, or the remote position for
    /// pure insertions.
    pub line_number: usize,
    /// The classification.
    pub kind: DiffKind,
    /// The local line, absent for `Added`.
    pub local_line: Option<String>,
    /// The remote line, absent for `Removed`.
    pub remote_line: Option<String>,
}

/// The ordered diff for one document pair.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineDiff {
    /// Entries ordered by ascending line number.
    pub entries: Vec<DiffEntry>,
}

impl LineDiff {
    /// Returns `true` if the two views differ anywhere.
    pub fn has_differences(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Number of `Added` entries.
    pub fn additions(&self) -> usize {
        self.count(DiffKind::Added)
    }

    /// Number of `Removed` entries.
    pub fn removals(&self) -> usize {
        self.count(DiffKind::Removed)
    }

    /// Number of `Changed` entries.
    pub fn changes(&self) -> usize {
        self.count(DiffKind::Changed)
    }

    fn count(&self, kind: DiffKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }
}
