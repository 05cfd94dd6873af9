//! Diagnostics surface shared by every PermSync error type.
//!
//! User-facing errors carry a stable machine-readable code, a category, and
//! a short list of corrective actions so that both operators and calling
//! automation can react programmatically.

use serde::{Deserialize, Serialize};

/// The coarse error taxonomy.
///
/// - `User` errors are never retried and always carry a corrective action.
/// - `System` errors degrade gracefully where possible (cache, partial
///   multi-source failures) and are surfaced otherwise.
/// - `Fatal` errors abort before any mutation (e.g. backup creation failure).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCategory {
    User,
    System,
    Fatal,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorCategory::User => "user",
            ErrorCategory::System => "system",
            ErrorCategory::Fatal => "fatal",
        };
        f.write_str(s)
    }
}

/// Stable diagnostics for user-visible errors.
pub trait Diagnostic {
    /// A stable, machine-readable error code (e.g. `MERGE_BACKUP_FAILED`).
    fn code(&self) -> &'static str;

    /// The error category.
    fn category(&self) -> ErrorCategory;

    /// Short corrective actions, most useful first.
    fn remedies(&self) -> Vec<&'static str> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_display() {
        assert_eq!(ErrorCategory::User.to_string(), "user");
        assert_eq!(ErrorCategory::System.to_string(), "system");
        assert_eq!(ErrorCategory::Fatal.to_string(), "fatal");
    }
}
