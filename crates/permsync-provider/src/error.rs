//! Error types for the provider boundary.

use permsync_types::{Diagnostic, ErrorCategory};
use thiserror::Error;

/// Errors from fetching a named document from one environment.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The document does not exist in that environment.
    #[error("document {document} not found in {environment}")]
    NotFound {
        environment: String,
        document: String,
    },

    /// The environment could not be reached or answered with an error.
    #[error("environment {environment} unavailable: {detail}")]
    Unavailable {
        environment: String,
        detail: String,
    },

    /// The per-operation timeout elapsed.
    #[error("fetch from {environment} timed out")]
    Timeout { environment: String },

    /// The fetch was never started because the operation was cancelled.
    #[error("fetch from {environment} cancelled")]
    Cancelled { environment: String },

    /// The provider does not support member-selective fetching.
    #[error("provider does not support selective fetch")]
    SelectiveUnsupported,
}

impl Diagnostic for FetchError {
    fn code(&self) -> &'static str {
        match self {
            FetchError::NotFound { .. } => "FETCH_NOT_FOUND",
            FetchError::Unavailable { .. } => "FETCH_UNAVAILABLE",
            FetchError::Timeout { .. } => "FETCH_TIMEOUT",
            FetchError::Cancelled { .. } => "FETCH_CANCELLED",
            FetchError::SelectiveUnsupported => "FETCH_SELECTIVE_UNSUPPORTED",
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            FetchError::NotFound { .. } => ErrorCategory::User,
            _ => ErrorCategory::System,
        }
    }

    fn remedies(&self) -> Vec<&'static str> {
        match self {
            FetchError::NotFound { .. } => {
                vec!["check the document name", "check the environment label"]
            }
            FetchError::Timeout { .. } => vec!["increase the fetch timeout", "retry later"],
            _ => Vec::new(),
        }
    }
}

/// Errors from listing the members of a document type in one environment.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ListError {
    #[error("listing {metadata_type} in {environment} failed: {detail}")]
    Unavailable {
        environment: String,
        metadata_type: String,
        detail: String,
    },

    #[error("listing {metadata_type} in {environment} timed out")]
    Timeout {
        environment: String,
        metadata_type: String,
    },
}

/// Errors from parsing raw text into a document.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The document header line is missing or malformed.
    #[error("missing document header")]
    MissingHeader,

    /// An entry header names a block tag outside the fixed catalogue.
    #[error("unknown block tag {tag:?} at line {line}")]
    UnknownBlockTag { line: usize, tag: String },

    /// A line matched no known shape.
    #[error("malformed line {line}: {content:?}")]
    MalformedLine { line: usize, content: String },

    /// A field line appeared before any entry header.
    #[error("field outside an entry at line {line}")]
    OrphanField { line: usize },
}

/// Convenience alias for parse results.
pub type ParseResult<T> = Result<T, ParseError>;
