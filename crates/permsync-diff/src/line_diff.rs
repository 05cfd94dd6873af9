//! Line alignment and classification.
//!
//! Uses the `similar` crate (Myers shortest edit script) over the raw line
//! slices. A deletion aligned with an insertion at the same relative
//! position arrives as a `Replace` op and is reported as `Changed`, pairing
//! each removed line with its replacement; length mismatches inside a
//! replace spill over into plain `Removed`/`Added` entries.

use similar::{capture_diff_slices, Algorithm, DiffOp};

use permsync_types::LineView;

use crate::report::{DiffEntry, DiffKind, LineDiff};

/// Diff two line views (local vs. remote).
///
/// Entries are ordered by ascending local line number; pure insertions carry
/// the remote line number. Identical views produce an empty diff.
pub fn diff_lines(local: &LineView, remote: &LineView) -> LineDiff {
    let old = local.lines();
    let new = remote.lines();

    if old == new {
        return LineDiff::default();
    }

    let mut entries = Vec::new();
    for op in capture_diff_slices(Algorithm::Myers, old, new) {
        match op {
            DiffOp::Equal { .. } => {}
            DiffOp::Delete {
                old_index, old_len, ..
            } => {
                for i in 0..old_len {
                    entries.push(removed(old_index + i, &old[old_index + i]));
                }
            }
            DiffOp::Insert {
                new_index, new_len, ..
            } => {
                for i in 0..new_len {
                    entries.push(added(new_index + i, &new[new_index + i]));
                }
            }
            DiffOp::Replace {
                old_index,
                old_len,
                new_index,
                new_len,
            } => {
                let paired = old_len.min(new_len);
                for i in 0..paired {
                    entries.push(DiffEntry {
                        line_number: old_index + i + 1,
                        kind: DiffKind::Changed,
                        local_line: Some(old[old_index + i].clone()),
                        remote_line: Some(new[new_index + i].clone()),
                    });
                }
                for i in paired..old_len {
                    entries.push(removed(old_index + i, &old[old_index + i]));
                }
                for i in paired..new_len {
                    entries.push(added(new_index + i, &new[new_index + i]));
                }
            }
        }
    }

    LineDiff { entries }
}

fn removed(index: usize, line: &str) -> DiffEntry {
    DiffEntry {
        line_number: index + 1,
        kind: DiffKind::Removed,
        local_line: Some(line.to_string()),
        remote_line: None,
    }
}

fn added(index: usize, line: &str) -> DiffEntry {
    DiffEntry {
        line_number: index + 1,
        kind: DiffKind::Added,
        local_line: None,
        remote_line: Some(line.to_string()),
    }
}
