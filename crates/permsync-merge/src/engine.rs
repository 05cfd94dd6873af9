//! The merge state machine.
//!
//! `Start -> Backup -> DetectConflicts -> Resolve -> Validate -> {Commit | Rollback}`
//!
//! The engine operates on in-memory documents; the local document's rendering
//! is the canonical pre-merge content at its store key. Concurrent merges of
//! the *same* document are the caller's responsibility to serialize; backups
//! are scoped to one attempt and never shared.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use permsync_pipeline::Pipeline;
use permsync_provider::DocumentCodec;
use permsync_store::FileStore;
use permsync_types::{Block, BlockKind, Document, Entry, EntryKey, FieldValue};

use crate::backup::{BackupHandle, BackupManager};
use crate::conflict::{ChosenSide, Conflict, EntryChange, MergeReport};
use crate::error::{MergeError, MergeResult};
use crate::resolver::ConflictResolver;
use crate::strategy::MergeStrategy;

/// Engine tuning.
#[derive(Clone, Debug)]
pub struct MergeConfig {
    /// Per-operation timeout for the Validate step.
    pub validate_timeout: Duration,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            validate_timeout: Duration::from_secs(5),
        }
    }
}

/// One merge attempt.
#[derive(Clone, Debug)]
pub struct MergeRequest {
    /// Store key of the local document (commit/rollback target).
    pub document_key: String,
    /// The recorded base, if one is available. Without a base, any
    /// local/remote divergence is treated as a potential conflict.
    pub base: Option<Document>,
    /// The local document.
    pub local: Document,
    /// The remote document.
    pub remote: Document,
    /// The resolution strategy.
    pub strategy: MergeStrategy,
}

/// The transactional merge engine.
pub struct MergeEngine {
    codec: Arc<dyn DocumentCodec>,
    store: Arc<dyn FileStore>,
    backups: BackupManager,
    config: MergeConfig,
}

/// A change staged for application, in application order.
enum Pending {
    AddEntry { block: BlockKind, entry: Entry },
    SetField {
        block: BlockKind,
        key: EntryKey,
        field: String,
        value: Option<FieldValue>,
    },
}

impl MergeEngine {
    /// Create an engine writing backups under `backup_root` in `store`.
    pub fn new(
        codec: Arc<dyn DocumentCodec>,
        store: Arc<dyn FileStore>,
        backup_root: impl Into<String>,
        config: MergeConfig,
    ) -> Self {
        let backups = BackupManager::new(Arc::clone(&store), backup_root);
        Self {
            codec,
            store,
            backups,
            config,
        }
    }

    /// Run one merge attempt.
    ///
    /// `resolver` is consulted only for [`MergeStrategy::Selective`]; passing
    /// `None` there declines every conflict.
    pub async fn merge(
        &self,
        request: MergeRequest,
        resolver: Option<&dyn ConflictResolver>,
    ) -> MergeResult<MergeReport> {
        // Backup: mandatory safety gate, before any mutation.
        let local_rendered = self.codec.render(&request.local);
        let backup = self
            .backups
            .create(&request.local.name, local_rendered.as_bytes())
            .await
            .map_err(|e| MergeError::BackupFailed {
                detail: e.to_string(),
            })?;

        // No-op: identical documents succeed with nothing to do.
        let remote_rendered = self.codec.render(&request.remote);
        if local_rendered == remote_rendered {
            debug!(document = %request.local.name, "merge is a no-op");
            return Ok(MergeReport {
                merged: request.local,
                conflicts: Vec::new(),
                applied: Vec::new(),
            });
        }

        // DetectConflicts.
        let (conflicts, mut pending) =
            detect_conflicts(request.base.as_ref(), &request.local, &request.remote);
        debug!(
            document = %request.local.name,
            conflicts = conflicts.len(),
            auto_applied = pending.len(),
            "conflict detection complete"
        );

        // Resolve.
        pending.extend(self.resolve(request.strategy, &conflicts, resolver).await?);

        // Apply.
        let (merged, applied) = apply(&request.local, pending);

        // Validate, with rollback on failure.
        if let Err(failure) = self.validate(&merged).await {
            let rolled_back = self.rollback(&request.document_key, &backup).await;
            warn!(
                document = %request.local.name,
                rolled_back,
                "merge validation failed"
            );
            return Err(match failure {
                ValidateFailure::Invalid(detail) => MergeError::ValidationFailed {
                    detail,
                    rolled_back,
                },
                ValidateFailure::TimedOut => MergeError::ValidateTimeout { rolled_back },
            });
        }

        // Commit.
        let merged_rendered = self.codec.render(&merged);
        if let Err(e) = self
            .store
            .write_file(&request.document_key, merged_rendered.as_bytes())
            .await
        {
            let rolled_back = self.rollback(&request.document_key, &backup).await;
            warn!(document = %request.local.name, rolled_back, "commit write failed");
            return Err(MergeError::Store(e));
        }

        debug!(
            document = %request.local.name,
            applied = applied.len(),
            "merge committed"
        );
        Ok(MergeReport {
            merged,
            conflicts,
            applied,
        })
    }

    /// A deferred merge as a [`Pipeline`]; nothing runs until `run()`.
    pub fn deferred(
        self: &Arc<Self>,
        request: MergeRequest,
        resolver: Option<Arc<dyn ConflictResolver>>,
    ) -> Pipeline<MergeReport, MergeError> {
        let engine = Arc::clone(self);
        Pipeline::new(move || {
            let engine = Arc::clone(&engine);
            let request = request.clone();
            let resolver = resolver.clone();
            async move { engine.merge(request, resolver.as_deref()).await }
        })
    }

    async fn resolve(
        &self,
        strategy: MergeStrategy,
        conflicts: &[Conflict],
        resolver: Option<&dyn ConflictResolver>,
    ) -> MergeResult<Vec<Pending>> {
        match strategy {
            MergeStrategy::LocalWins => Ok(Vec::new()),
            // Union keeps both sides' entries (remote-only entries are
            // auto-applied before resolution); diverging scalar fields take
            // the remote value, same as org-wins.
            MergeStrategy::OrgWins | MergeStrategy::Union => {
                Ok(conflicts.iter().map(take_remote).collect())
            }
            MergeStrategy::AbortOnConflict => {
                if conflicts.is_empty() {
                    Ok(Vec::new())
                } else {
                    Err(MergeError::Conflicts {
                        conflicts: conflicts.to_vec(),
                    })
                }
            }
            MergeStrategy::Selective => {
                if conflicts.is_empty() {
                    return Ok(Vec::new());
                }
                let Some(resolver) = resolver else {
                    return Err(MergeError::ResolutionDeclined {
                        unresolved: conflicts.to_vec(),
                    });
                };
                let choices = resolver.resolve(conflicts).await;
                let unresolved: Vec<Conflict> = conflicts
                    .iter()
                    .filter(|c| !choices.contains_key(&c.conflict_key()))
                    .cloned()
                    .collect();
                if !unresolved.is_empty() {
                    // A declined resolution is abort-on-conflict for this run.
                    return Err(MergeError::ResolutionDeclined { unresolved });
                }
                Ok(conflicts
                    .iter()
                    .filter(|c| choices[&c.conflict_key()] == ChosenSide::Remote)
                    .map(take_remote)
                    .collect())
            }
        }
    }

    async fn validate(&self, merged: &Document) -> Result<(), ValidateFailure> {
        let rendered = self.codec.render(merged);
        let codec = Arc::clone(&self.codec);
        let check = tokio::task::spawn_blocking(move || -> Result<(), String> {
            let doc = codec.parse(&rendered).map_err(|e| e.to_string())?;
            let dupes = doc.duplicate_keys();
            if dupes.is_empty() {
                Ok(())
            } else {
                let listed: Vec<String> = dupes
                    .iter()
                    .map(|(kind, key)| format!("{kind}:{key}"))
                    .collect();
                Err(format!("duplicate keys: {}", listed.join(", ")))
            }
        });

        match tokio::time::timeout(self.config.validate_timeout, check).await {
            Ok(Ok(Ok(()))) => Ok(()),
            Ok(Ok(Err(detail))) => Err(ValidateFailure::Invalid(detail)),
            Ok(Err(join_err)) => Err(ValidateFailure::Invalid(join_err.to_string())),
            Err(_) => Err(ValidateFailure::TimedOut),
        }
    }

    /// Restore the backup over the local key. Returns whether it succeeded.
    async fn rollback(&self, document_key: &str, backup: &BackupHandle) -> bool {
        let content = match self.backups.read(backup).await {
            Ok(content) => content,
            Err(e) => {
                warn!(key = %backup.key, error = %e, "backup unreadable; rollback unavailable");
                return false;
            }
        };
        match self.store.write_file(document_key, &content).await {
            Ok(()) => true,
            Err(e) => {
                warn!(key = document_key, error = %e, "rollback write failed");
                false
            }
        }
    }
}

impl std::fmt::Debug for MergeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MergeEngine")
            .field("config", &self.config)
            .finish()
    }
}

enum ValidateFailure {
    Invalid(String),
    TimedOut,
}

fn take_remote(conflict: &Conflict) -> Pending {
    Pending::SetField {
        block: conflict.block,
        key: conflict.key.clone(),
        field: conflict.field.clone(),
        value: conflict.remote.clone(),
    }
}

/// Compare local and remote against the base.
///
/// For every entry present on both sides with differing fields: if the local
/// value equals the base the remote change is auto-applied; if the local
/// copy diverged from the base (or no base is available) it is a conflict.
/// Remote-only entries are auto-applied additions; local-only entries are
/// kept untouched.
fn detect_conflicts(
    base: Option<&Document>,
    local: &Document,
    remote: &Document,
) -> (Vec<Conflict>, Vec<Pending>) {
    let mut conflicts = Vec::new();
    let mut pending = Vec::new();

    for remote_block in &remote.blocks {
        let kind = remote_block.kind;
        for remote_entry in &remote_block.entries {
            let Some(local_entry) = local.entry(kind, &remote_entry.key) else {
                pending.push(Pending::AddEntry {
                    block: kind,
                    entry: remote_entry.clone(),
                });
                continue;
            };

            for field in local_entry.differing_fields(remote_entry) {
                let local_val = local_entry.field(&field).cloned();
                let remote_val = remote_entry.field(&field).cloned();
                let base_val = base
                    .and_then(|b| b.entry(kind, &remote_entry.key))
                    .and_then(|e| e.field(&field))
                    .cloned();

                let local_diverged = match base {
                    Some(_) => local_val != base_val,
                    None => true,
                };

                if local_diverged {
                    conflicts.push(Conflict {
                        block: kind,
                        key: remote_entry.key.clone(),
                        field,
                        base: base_val,
                        local: local_val,
                        remote: remote_val,
                    });
                } else {
                    pending.push(Pending::SetField {
                        block: kind,
                        key: remote_entry.key.clone(),
                        field,
                        value: remote_val,
                    });
                }
            }
        }
    }

    (conflicts, pending)
}

/// Apply staged changes to a copy of the local document.
fn apply(local: &Document, pending: Vec<Pending>) -> (Document, Vec<EntryChange>) {
    let mut merged = local.clone();
    let mut applied = Vec::new();

    for change in pending {
        match change {
            Pending::AddEntry { block, entry } => {
                applied.push(EntryChange {
                    block,
                    key: entry.key.clone(),
                    field: None,
                    old: None,
                    new: None,
                });
                match merged.blocks.iter_mut().find(|b| b.kind == block) {
                    Some(target) => target.entries.push(entry),
                    None => merged.blocks.push(Block {
                        kind: block,
                        entries: vec![entry],
                    }),
                }
            }
            Pending::SetField {
                block,
                key,
                field,
                value,
            } => {
                let Some(entry) = merged
                    .blocks
                    .iter_mut()
                    .find(|b| b.kind == block)
                    .and_then(|b| b.entries.iter_mut().find(|e| e.key == key))
                else {
                    continue;
                };
                let old = match &value {
                    Some(v) => entry.fields.insert(field.clone(), v.clone()),
                    None => entry.fields.remove(&field),
                };
                applied.push(EntryChange {
                    block,
                    key,
                    field: Some(field),
                    old,
                    new: value,
                });
            }
        }
    }

    (merged, applied)
}
