//! Error types for the comparison orchestrator.

use permsync_pipeline::Fault;
use permsync_types::{Diagnostic, ErrorCategory};
use thiserror::Error;

use crate::types::EnvFailure;

/// Errors from a comparison run.
///
/// A run with at least one successful environment is not an error; partial
/// failures travel as data inside the report. Only an empty request or a
/// run where every environment failed surfaces here.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CompareError {
    /// Fewer than two environments were requested.
    #[error("comparison needs at least two environments, got {got}")]
    TooFewEnvironments { got: usize },

    /// No document names were requested.
    #[error("comparison needs at least one document")]
    NoDocuments,

    /// Every environment failed; no pair could be diffed.
    #[error("all {} environments failed", failures.len())]
    AllEnvironmentsFailed { failures: Vec<EnvFailure> },

    /// A panic escaped into the orchestrator pipeline.
    #[error("comparison panicked: {0}")]
    Panicked(String),

    /// A recovery handler itself failed.
    #[error("comparison recovery failed: {0}")]
    RecoveryFailed(String),
}

impl Fault for CompareError {
    fn from_panic(detail: String) -> Self {
        CompareError::Panicked(detail)
    }

    fn recovery_failed(detail: String) -> Self {
        CompareError::RecoveryFailed(detail)
    }
}

impl Diagnostic for CompareError {
    fn code(&self) -> &'static str {
        match self {
            CompareError::TooFewEnvironments { .. } => "COMPARE_TOO_FEW_ENVIRONMENTS",
            CompareError::NoDocuments => "COMPARE_NO_DOCUMENTS",
            CompareError::AllEnvironmentsFailed { .. } => "COMPARE_ALL_ENVIRONMENTS_FAILED",
            CompareError::Panicked(_) => "COMPARE_PANICKED",
            CompareError::RecoveryFailed(_) => "COMPARE_RECOVERY_FAILED",
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            CompareError::TooFewEnvironments { .. } | CompareError::NoDocuments => {
                ErrorCategory::User
            }
            CompareError::AllEnvironmentsFailed { .. } => ErrorCategory::System,
            CompareError::Panicked(_) | CompareError::RecoveryFailed(_) => ErrorCategory::Fatal,
        }
    }

    fn remedies(&self) -> Vec<&'static str> {
        match self {
            CompareError::TooFewEnvironments { .. } => {
                vec!["pass at least two environment labels"]
            }
            CompareError::NoDocuments => vec!["pass at least one document name"],
            CompareError::AllEnvironmentsFailed { .. } => {
                vec!["check connectivity to the environments", "retry later"]
            }
            _ => Vec::new(),
        }
    }
}

/// Convenience alias for comparison results.
pub type CompareResult<T> = Result<T, CompareError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_and_categories() {
        let err = CompareError::TooFewEnvironments { got: 1 };
        assert_eq!(err.code(), "COMPARE_TOO_FEW_ENVIRONMENTS");
        assert_eq!(err.category(), ErrorCategory::User);
        assert!(!err.remedies().is_empty());

        let err = CompareError::AllEnvironmentsFailed { failures: vec![] };
        assert_eq!(err.category(), ErrorCategory::System);

        assert_eq!(
            CompareError::from_panic("boom".into()).category(),
            ErrorCategory::Fatal
        );
    }
}
