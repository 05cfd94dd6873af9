use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use permsync_types::Document;

use crate::error::{FetchError, ListError, ParseError};

/// A named document as returned by the remote system, before parsing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDocument {
    /// The document name (e.g. "Admin").
    pub name: String,
    /// The raw rendered body.
    pub body: String,
}

impl RawDocument {
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
        }
    }
}

/// Remote metadata source for one or more environments.
///
/// The core never calls a remote system directly; every remote interaction
/// goes through this interface. Implementations must be safe to call
/// concurrently: the orchestrator fans out fetches across environments.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetch the named document from one environment.
    async fn fetch(&self, environment: &str, document_name: &str)
        -> Result<RawDocument, FetchError>;

    /// List the member names of a document type in one environment.
    async fn list_members(
        &self,
        environment: &str,
        metadata_type: &str,
    ) -> Result<Vec<String>, ListError>;

    /// Whether this provider can fetch a subset of members.
    fn supports_selective_fetch(&self) -> bool {
        false
    }

    /// Fetch only the given members of a document.
    ///
    /// Only meaningful when [`supports_selective_fetch`](Self::supports_selective_fetch)
    /// returns `true`; the default rejects the call.
    async fn fetch_members(
        &self,
        _environment: &str,
        _document_name: &str,
        _members: &[String],
    ) -> Result<RawDocument, FetchError> {
        Err(FetchError::SelectiveUnsupported)
    }
}

/// Parse/render boundary between raw text and the document model.
///
/// `render` must be deterministic: the diff engine consumes the rendered
/// lines, so an unstable rendering would report phantom differences.
pub trait DocumentCodec: Send + Sync {
    /// Parse raw text into a document.
    fn parse(&self, raw: &str) -> Result<Document, ParseError>;

    /// Render a document back to text. Round-trips through `parse`.
    fn render(&self, document: &Document) -> String;
}
