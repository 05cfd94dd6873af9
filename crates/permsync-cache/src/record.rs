//! The persisted cache record.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One cached member listing for (environment, metadata type, API version).
///
/// Records are persisted as JSON through the file-store collaborator and
/// reconstructed on read. They are disposable: deleting one only forces a
/// cache miss.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRecord {
    /// The environment (org) the listing came from.
    pub org_key: String,
    /// The metadata type that was listed (a block tag, e.g. "classAccesses").
    pub metadata_type: String,
    /// The remote API version the listing was taken against.
    pub api_version: String,
    /// The member names.
    pub members: Vec<String>,
    /// When the listing was fetched.
    pub fetched_at: DateTime<Utc>,
    /// How long the record stays fresh.
    pub ttl: Duration,
}

impl CacheRecord {
    /// Create a record stamped with the current time.
    pub fn new(
        org_key: impl Into<String>,
        metadata_type: impl Into<String>,
        api_version: impl Into<String>,
        members: Vec<String>,
        ttl: Duration,
    ) -> Self {
        Self {
            org_key: org_key.into(),
            metadata_type: metadata_type.into(),
            api_version: api_version.into(),
            members,
            fetched_at: Utc::now(),
            ttl,
        }
    }

    /// Returns `true` if the record's TTL has elapsed at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        let age = now.signed_duration_since(self.fetched_at);
        match chrono::Duration::from_std(self.ttl) {
            Ok(ttl) => age > ttl,
            // A TTL too large for chrono never expires.
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_record_is_not_expired() {
        let rec = CacheRecord::new(
            "dev",
            "classAccesses",
            "62.0",
            vec!["Foo".into()],
            Duration::from_secs(3600),
        );
        assert!(!rec.is_expired(Utc::now()));
    }

    #[test]
    fn record_expires_after_ttl() {
        let mut rec = CacheRecord::new(
            "dev",
            "classAccesses",
            "62.0",
            vec![],
            Duration::from_secs(60),
        );
        rec.fetched_at = Utc::now() - chrono::Duration::seconds(120);
        assert!(rec.is_expired(Utc::now()));
    }

    #[test]
    fn json_round_trip() {
        let rec = CacheRecord::new(
            "dev",
            "objectPermissions",
            "62.0",
            vec!["Account".into(), "Contact".into()],
            Duration::from_secs(900),
        );
        let json = serde_json::to_vec(&rec).unwrap();
        let back: CacheRecord = serde_json::from_slice(&json).unwrap();
        assert_eq!(back, rec);
    }
}
