//! The change detector.

use std::sync::Arc;

use tracing::{debug, warn};

use permsync_cache::{CacheKey, CacheRecord, MetadataCache};
use permsync_provider::MetadataProvider;
use permsync_types::{BlockKind, Document};

use crate::decision::{DetectorConfig, FetchDecision, MemberDelta};

/// Decides whether a full re-fetch of a document type is necessary.
///
/// The member listing is looked up cache-first when a cache handle is
/// supplied; the cache is never authoritative — with the cache disabled or
/// failing, the decision is identical, only slower.
pub struct ChangeDetector {
    provider: Arc<dyn MetadataProvider>,
    cache: Option<MetadataCache>,
    config: DetectorConfig,
}

impl ChangeDetector {
    /// Create a detector without caching.
    pub fn new(provider: Arc<dyn MetadataProvider>, config: DetectorConfig) -> Self {
        Self {
            provider,
            cache: None,
            config,
        }
    }

    /// Attach a cache handle for member listings.
    pub fn with_cache(mut self, cache: MetadataCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Decide what to fetch for one block kind of a local document.
    ///
    /// Never fails: any listing or comparison error degrades to
    /// [`FetchDecision::Full`], the safe default.
    pub async fn decide(
        &self,
        environment: &str,
        local: &Document,
        kind: BlockKind,
    ) -> FetchDecision {
        let remote = match self.remote_members(environment, kind).await {
            Ok(members) => members,
            Err(reason) => {
                warn!(environment, kind = %kind, %reason, "member listing failed; full fetch");
                return FetchDecision::Full { reason };
            }
        };

        let inventory = local.member_names(kind);
        let delta = MemberDelta::compute(&inventory, &remote);

        if delta.is_unchanged() {
            debug!(environment, kind = %kind, "inventory unchanged; skipping fetch");
            return FetchDecision::Skip;
        }

        if delta.changed_count() <= self.config.partial_threshold
            && self.provider.supports_selective_fetch()
        {
            debug!(
                environment,
                kind = %kind,
                changed = delta.changed_count(),
                "within partial threshold; selective fetch"
            );
            return FetchDecision::Partial(delta.changed_members());
        }

        FetchDecision::Full {
            reason: format!("{} members changed", delta.changed_count()),
        }
    }

    /// The remote member listing for one block kind, cache-first.
    async fn remote_members(
        &self,
        environment: &str,
        kind: BlockKind,
    ) -> Result<Vec<String>, String> {
        let cache_key = CacheKey::new(environment, kind.tag(), &self.config.api_version);

        if let Some(cache) = &self.cache {
            if let Some(record) = cache.get(&cache_key).await {
                debug!(environment, kind = %kind, "member listing served from cache");
                return Ok(record.members);
            }
        }

        let members = self
            .provider
            .list_members(environment, kind.tag())
            .await
            .map_err(|e| e.to_string())?;

        if let Some(cache) = &self.cache {
            cache
                .set(&CacheRecord::new(
                    environment,
                    kind.tag(),
                    &self.config.api_version,
                    members.clone(),
                    self.config.cache_ttl,
                ))
                .await;
        }
        Ok(members)
    }
}

impl std::fmt::Debug for ChangeDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeDetector")
            .field("cached", &self.cache.is_some())
            .field("config", &self.config)
            .finish()
    }
}
