use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{FetchError, ListError};
use crate::traits::{MetadataProvider, RawDocument};

/// In-memory metadata provider for tests and embedding.
///
/// Holds a fixed map of environment → documents and member listings, plus
/// scripted per-environment failures and artificial latency so callers can
/// exercise timeout, cancellation, and partial-failure paths.
pub struct StaticProvider {
    documents: RwLock<HashMap<(String, String), String>>,
    members: RwLock<HashMap<(String, String), Vec<String>>>,
    fetch_failures: RwLock<HashMap<String, FetchError>>,
    list_failures: RwLock<HashMap<String, ListError>>,
    latency: RwLock<HashMap<String, Duration>>,
    selective: bool,
}

impl StaticProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
            members: RwLock::new(HashMap::new()),
            fetch_failures: RwLock::new(HashMap::new()),
            list_failures: RwLock::new(HashMap::new()),
            latency: RwLock::new(HashMap::new()),
            selective: false,
        }
    }

    /// Create a provider that advertises selective fetch support.
    pub fn selective() -> Self {
        Self {
            selective: true,
            ..Self::new()
        }
    }

    /// Register a document body under (environment, name).
    pub fn with_document(
        self,
        environment: impl Into<String>,
        name: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        self.documents
            .write()
            .expect("lock poisoned")
            .insert((environment.into(), name.into()), body.into());
        self
    }

    /// Register a member listing under (environment, metadata type).
    pub fn with_members(
        self,
        environment: impl Into<String>,
        metadata_type: impl Into<String>,
        members: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.members.write().expect("lock poisoned").insert(
            (environment.into(), metadata_type.into()),
            members.into_iter().map(Into::into).collect(),
        );
        self
    }

    /// Script every fetch from `environment` to fail with `error`.
    pub fn with_fetch_failure(self, environment: impl Into<String>, error: FetchError) -> Self {
        self.fetch_failures
            .write()
            .expect("lock poisoned")
            .insert(environment.into(), error);
        self
    }

    /// Script every member listing from `environment` to fail with `error`.
    pub fn with_list_failure(self, environment: impl Into<String>, error: ListError) -> Self {
        self.list_failures
            .write()
            .expect("lock poisoned")
            .insert(environment.into(), error);
        self
    }

    /// Delay every operation against `environment` by `latency`.
    pub fn with_latency(self, environment: impl Into<String>, latency: Duration) -> Self {
        self.latency
            .write()
            .expect("lock poisoned")
            .insert(environment.into(), latency);
        self
    }

    async fn apply_latency(&self, environment: &str) {
        let delay = self
            .latency
            .read()
            .expect("lock poisoned")
            .get(environment)
            .copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

impl Default for StaticProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetadataProvider for StaticProvider {
    async fn fetch(
        &self,
        environment: &str,
        document_name: &str,
    ) -> Result<RawDocument, FetchError> {
        self.apply_latency(environment).await;
        if let Some(err) = self
            .fetch_failures
            .read()
            .expect("lock poisoned")
            .get(environment)
        {
            return Err(err.clone());
        }
        self.documents
            .read()
            .expect("lock poisoned")
            .get(&(environment.to_string(), document_name.to_string()))
            .map(|body| RawDocument::new(document_name, body.clone()))
            .ok_or_else(|| FetchError::NotFound {
                environment: environment.to_string(),
                document: document_name.to_string(),
            })
    }

    async fn list_members(
        &self,
        environment: &str,
        metadata_type: &str,
    ) -> Result<Vec<String>, ListError> {
        self.apply_latency(environment).await;
        if let Some(err) = self
            .list_failures
            .read()
            .expect("lock poisoned")
            .get(environment)
        {
            return Err(err.clone());
        }
        Ok(self
            .members
            .read()
            .expect("lock poisoned")
            .get(&(environment.to_string(), metadata_type.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    fn supports_selective_fetch(&self) -> bool {
        self.selective
    }

    async fn fetch_members(
        &self,
        environment: &str,
        document_name: &str,
        _members: &[String],
    ) -> Result<RawDocument, FetchError> {
        if !self.selective {
            return Err(FetchError::SelectiveUnsupported);
        }
        // The static provider has no per-member storage; a selective fetch
        // returns the full body.
        self.fetch(environment, document_name).await
    }
}

impl std::fmt::Debug for StaticProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticProvider")
            .field(
                "documents",
                &self.documents.read().expect("lock poisoned").len(),
            )
            .field("selective", &self.selective)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fetch_registered_document() {
        let provider = StaticProvider::new().with_document("dev", "Admin", "profile: Admin\n");
        let raw = provider.fetch("dev", "Admin").await.unwrap();
        assert_eq!(raw.name, "Admin");
        assert_eq!(raw.body, "profile: Admin\n");
    }

    #[tokio::test]
    async fn missing_document_is_not_found() {
        let provider = StaticProvider::new();
        let err = provider.fetch("dev", "Admin").await.unwrap_err();
        assert!(matches!(err, FetchError::NotFound { .. }));
    }

    #[tokio::test]
    async fn scripted_fetch_failure() {
        let provider = StaticProvider::new()
            .with_document("dev", "Admin", "profile: Admin\n")
            .with_fetch_failure(
                "dev",
                FetchError::Unavailable {
                    environment: "dev".into(),
                    detail: "scripted".into(),
                },
            );
        assert!(matches!(
            provider.fetch("dev", "Admin").await.unwrap_err(),
            FetchError::Unavailable { .. }
        ));
    }

    #[tokio::test]
    async fn member_listing_and_failure() {
        let provider = StaticProvider::new()
            .with_members("dev", "objectPermissions", ["Account", "Contact"])
            .with_list_failure(
                "uat",
                ListError::Unavailable {
                    environment: "uat".into(),
                    metadata_type: "objectPermissions".into(),
                    detail: "scripted".into(),
                },
            );
        let members = provider.list_members("dev", "objectPermissions").await.unwrap();
        assert_eq!(members, vec!["Account", "Contact"]);
        assert!(provider.list_members("uat", "objectPermissions").await.is_err());
    }

    #[tokio::test]
    async fn selective_support_flag() {
        let plain = StaticProvider::new().with_document("dev", "Admin", "profile: Admin\n");
        assert!(!plain.supports_selective_fetch());
        assert_eq!(
            plain
                .fetch_members("dev", "Admin", &["Account".into()])
                .await
                .unwrap_err(),
            FetchError::SelectiveUnsupported
        );

        let selective =
            StaticProvider::selective().with_document("dev", "Admin", "profile: Admin\n");
        assert!(selective.supports_selective_fetch());
        assert!(selective
            .fetch_members("dev", "Admin", &["Account".into()])
            .await
            .is_ok());
    }
}
