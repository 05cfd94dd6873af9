//! Error types for the merge crate.

use permsync_pipeline::Fault;
use permsync_store::StoreError;
use permsync_types::{Diagnostic, ErrorCategory};
use thiserror::Error;

use crate::conflict::Conflict;

/// Errors that can occur during a merge attempt.
#[derive(Debug, Error)]
pub enum MergeError {
    /// The strategy name is not in the fixed catalogue.
    #[error("unknown merge strategy {name:?}")]
    InvalidStrategy { name: String },

    /// The pre-merge backup could not be created. Fatal: the merge aborts
    /// before any mutation.
    #[error("backup creation failed: {detail}")]
    BackupFailed { detail: String },

    /// `abort-on-conflict` found conflicts.
    #[error("{} conflict(s) detected", conflicts.len())]
    Conflicts { conflicts: Vec<Conflict> },

    /// The resolution collaborator left conflicts unresolved.
    #[error("resolution declined for {} conflict(s)", unresolved.len())]
    ResolutionDeclined { unresolved: Vec<Conflict> },

    /// The merged document failed validation. `rolled_back` reports whether
    /// the backup was restored successfully.
    #[error("merged document failed validation: {detail}")]
    ValidationFailed { detail: String, rolled_back: bool },

    /// Validation exceeded its per-operation timeout.
    #[error("validation timed out")]
    ValidateTimeout { rolled_back: bool },

    /// The persistent store failed outside the backup gate.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A captured panic from a merge pipeline.
    #[error("merge fault: {0}")]
    Panicked(String),

    /// A recovery function itself failed.
    #[error("merge recovery failed: {0}")]
    RecoveryFailed(String),
}

impl Fault for MergeError {
    fn from_panic(detail: String) -> Self {
        MergeError::Panicked(detail)
    }

    fn recovery_failed(detail: String) -> Self {
        MergeError::RecoveryFailed(detail)
    }
}

impl Diagnostic for MergeError {
    fn code(&self) -> &'static str {
        match self {
            MergeError::InvalidStrategy { .. } => "MERGE_INVALID_STRATEGY",
            MergeError::BackupFailed { .. } => "MERGE_BACKUP_FAILED",
            MergeError::Conflicts { .. } => "MERGE_CONFLICTS",
            MergeError::ResolutionDeclined { .. } => "MERGE_RESOLUTION_DECLINED",
            MergeError::ValidationFailed { .. } => "MERGE_VALIDATION_FAILED",
            MergeError::ValidateTimeout { .. } => "MERGE_VALIDATE_TIMEOUT",
            MergeError::Store(_) => "MERGE_STORE_ERROR",
            MergeError::Panicked(_) => "MERGE_PANICKED",
            MergeError::RecoveryFailed(_) => "MERGE_RECOVERY_FAILED",
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            MergeError::InvalidStrategy { .. }
            | MergeError::Conflicts { .. }
            | MergeError::ResolutionDeclined { .. } => ErrorCategory::User,
            MergeError::BackupFailed { .. } => ErrorCategory::Fatal,
            _ => ErrorCategory::System,
        }
    }

    fn remedies(&self) -> Vec<&'static str> {
        match self {
            MergeError::InvalidStrategy { .. } => vec![
                "use one of: local-wins, org-wins, union, abort-on-conflict, selective",
            ],
            MergeError::Conflicts { .. } => vec![
                "re-run with a resolving strategy (local-wins, org-wins, union)",
                "resolve entry-by-entry with the selective strategy",
            ],
            MergeError::BackupFailed { .. } => {
                vec!["check the backup directory is writable", "free disk space"]
            }
            MergeError::ValidationFailed { .. } => {
                vec!["inspect the reported validation detail; the local document was restored"]
            }
            _ => Vec::new(),
        }
    }
}

/// Convenience alias for merge results.
pub type MergeResult<T> = Result<T, MergeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_match_the_taxonomy() {
        let invalid = MergeError::InvalidStrategy { name: "x".into() };
        assert_eq!(invalid.category(), ErrorCategory::User);
        assert_eq!(invalid.code(), "MERGE_INVALID_STRATEGY");
        assert!(!invalid.remedies().is_empty());

        let backup = MergeError::BackupFailed { detail: "d".into() };
        assert_eq!(backup.category(), ErrorCategory::Fatal);

        let validation = MergeError::ValidationFailed {
            detail: "d".into(),
            rolled_back: true,
        };
        assert_eq!(validation.category(), ErrorCategory::System);
    }

    #[test]
    fn fault_constructors() {
        assert!(matches!(
            MergeError::from_panic("p".into()),
            MergeError::Panicked(_)
        ));
        assert!(matches!(
            MergeError::recovery_failed("r".into()),
            MergeError::RecoveryFailed(_)
        ));
    }
}
