//! Bounded-parallel fan-out and matrix assembly.
//!
//! One fetch task per (environment, document) pair, throttled by a
//! semaphore. Each task wraps its fetch-parse-render chain in a
//! [`Pipeline`] so a panicking provider surfaces as a typed failure for
//! that one environment instead of tearing down the run. Failures are
//! buffered per environment; siblings are never cancelled because of them.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use permsync_diff::diff_lines;
use permsync_pipeline::{Fault, Pipeline};
use permsync_provider::{DocumentCodec, FetchError, MetadataProvider, ParseError};
use permsync_types::{Diagnostic, LineView};

use crate::cancel::CancelFlag;
use crate::error::{CompareError, CompareResult};
use crate::types::{
    CompareConfig, CompareReport, CompareRequest, ComparisonMatrix, EnvFailure, PairDiff,
};

/// What a single (environment, document) task can fail with.
#[derive(Clone, Debug, thiserror::Error)]
enum TaskError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("fetched document did not parse: {0}")]
    Parse(#[from] ParseError),

    #[error("fetch task panicked: {0}")]
    Panicked(String),

    #[error("fetch recovery failed: {0}")]
    RecoveryFailed(String),
}

impl TaskError {
    fn code(&self) -> &'static str {
        match self {
            TaskError::Fetch(e) => e.code(),
            TaskError::Parse(_) => "FETCH_PARSE",
            TaskError::Panicked(_) => "FETCH_PANICKED",
            TaskError::RecoveryFailed(_) => "FETCH_RECOVERY_FAILED",
        }
    }
}

impl Fault for TaskError {
    fn from_panic(detail: String) -> Self {
        TaskError::Panicked(detail)
    }

    fn recovery_failed(detail: String) -> Self {
        TaskError::RecoveryFailed(detail)
    }
}

/// Fetches documents across environments and assembles diff matrices.
pub struct CompareOrchestrator {
    provider: Arc<dyn MetadataProvider>,
    codec: Arc<dyn DocumentCodec>,
    config: CompareConfig,
}

impl CompareOrchestrator {
    pub fn new(provider: Arc<dyn MetadataProvider>, codec: Arc<dyn DocumentCodec>) -> Self {
        Self {
            provider,
            codec,
            config: CompareConfig::default(),
        }
    }

    pub fn with_config(mut self, config: CompareConfig) -> Self {
        self.config = config;
        self
    }

    /// Run the comparison.
    ///
    /// Partial failure is success: as long as one environment produced a
    /// usable document the run returns `Ok`, with the failed environments
    /// carried inside the report. Only a run where every environment failed
    /// returns [`CompareError::AllEnvironmentsFailed`], aggregating every
    /// per-environment cause.
    pub async fn compare(
        &self,
        request: &CompareRequest,
        cancel: &CancelFlag,
    ) -> CompareResult<CompareReport> {
        if request.environments.len() < 2 {
            return Err(CompareError::TooFewEnvironments {
                got: request.environments.len(),
            });
        }
        if request.documents.is_empty() {
            return Err(CompareError::NoDocuments);
        }

        let mut slots = self.fan_out(request, cancel).await;

        let env_count = request.environments.len();
        let mut env_ok = vec![false; env_count];
        let mut matrices = Vec::with_capacity(request.documents.len());

        for (di, document) in request.documents.iter().enumerate() {
            let mut successful: Vec<(usize, String)> = Vec::new();
            let mut failed = Vec::new();

            for (ei, environment) in request.environments.iter().enumerate() {
                let outcome = slots[di][ei]
                    .take()
                    .unwrap_or_else(|| Err(TaskError::Panicked("task never completed".into())));
                match outcome {
                    Ok(rendered) => {
                        env_ok[ei] = true;
                        successful.push((ei, rendered));
                    }
                    Err(e) => {
                        warn!(%environment, %document, error = %e, "environment failed");
                        failed.push(EnvFailure {
                            environment: environment.clone(),
                            code: e.code().to_string(),
                            detail: e.to_string(),
                        });
                    }
                }
            }

            matrices.push(build_matrix(
                document,
                &request.environments,
                successful,
                failed,
            ));
        }

        // An environment counts as failed at report level only when it
        // produced nothing for any document.
        let failed_environments: Vec<EnvFailure> = request
            .environments
            .iter()
            .enumerate()
            .filter(|(ei, _)| !env_ok[*ei])
            .filter_map(|(_, env)| {
                matrices
                    .iter()
                    .flat_map(|m| &m.failed_environments)
                    .find(|f| &f.environment == env)
                    .cloned()
            })
            .collect();

        if env_ok.iter().all(|ok| !ok) {
            return Err(CompareError::AllEnvironmentsFailed {
                failures: failed_environments,
            });
        }

        debug!(
            documents = matrices.len(),
            failed = failed_environments.len(),
            "comparison complete"
        );
        Ok(CompareReport {
            matrices,
            failed_environments,
        })
    }

    /// Wrap a comparison as a deferred pipeline. Nothing is fetched until
    /// the pipeline runs; running it again restarts the whole comparison.
    pub fn deferred(
        self: &Arc<Self>,
        request: CompareRequest,
        cancel: CancelFlag,
    ) -> Pipeline<CompareReport, CompareError> {
        let orchestrator = Arc::clone(self);
        Pipeline::new(move || {
            let orchestrator = Arc::clone(&orchestrator);
            let request = request.clone();
            let cancel = cancel.clone();
            async move { orchestrator.compare(&request, &cancel).await }
        })
    }

    /// Spawn one task per (document, environment) pair and collect results
    /// into slots indexed by request position, so completion order never
    /// leaks into the report.
    async fn fan_out(
        &self,
        request: &CompareRequest,
        cancel: &CancelFlag,
    ) -> Vec<Vec<Option<Result<String, TaskError>>>> {
        let semaphore = Arc::new(Semaphore::new(self.config.max_parallelism.max(1)));
        let mut set: JoinSet<(usize, usize, Result<String, TaskError>)> = JoinSet::new();

        for (di, document) in request.documents.iter().enumerate() {
            for (ei, environment) in request.environments.iter().enumerate() {
                let semaphore = Arc::clone(&semaphore);
                let provider = Arc::clone(&self.provider);
                let codec = Arc::clone(&self.codec);
                let cancel = cancel.clone();
                let environment = environment.clone();
                let document = document.clone();
                let fetch_timeout = self.config.fetch_timeout;

                set.spawn(async move {
                    let _permit = match semaphore.acquire_owned().await {
                        Ok(permit) => permit,
                        Err(_) => {
                            return (
                                di,
                                ei,
                                Err(TaskError::Panicked("semaphore closed".into())),
                            )
                        }
                    };
                    // Checked after the permit: a cancel raised while this
                    // task was queued still prevents the fetch.
                    if cancel.is_cancelled() {
                        return (
                            di,
                            ei,
                            Err(TaskError::Fetch(FetchError::Cancelled {
                                environment,
                            })),
                        );
                    }

                    let pipeline = Pipeline::new(move || {
                        let provider = Arc::clone(&provider);
                        let codec = Arc::clone(&codec);
                        let environment = environment.clone();
                        let document = document.clone();
                        async move {
                            let raw =
                                tokio::time::timeout(fetch_timeout, provider.fetch(&environment, &document))
                                    .await
                                    .map_err(|_| {
                                        TaskError::Fetch(FetchError::Timeout {
                                            environment: environment.clone(),
                                        })
                                    })??;
                            let parsed = codec.parse(&raw.body)?;
                            Ok(codec.render(&parsed))
                        }
                    });
                    (di, ei, pipeline.run().await)
                });
            }
        }

        let mut slots: Vec<Vec<Option<Result<String, TaskError>>>> =
            vec![vec![None; request.environments.len()]; request.documents.len()];
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((di, ei, outcome)) => slots[di][ei] = Some(outcome),
                Err(join_err) => warn!(error = %join_err, "comparison task aborted"),
            }
        }
        slots
    }
}

impl std::fmt::Debug for CompareOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompareOrchestrator")
            .field("config", &self.config)
            .finish()
    }
}

/// Assemble one document's matrix: pairwise diffs over the successful
/// environments plus equivalence groups by identical rendering.
fn build_matrix(
    document: &str,
    environments: &[String],
    successful: Vec<(usize, String)>,
    failed: Vec<EnvFailure>,
) -> ComparisonMatrix {
    let mut pairs = Vec::new();
    for i in 0..successful.len() {
        for j in (i + 1)..successful.len() {
            let left = LineView::from_text(&successful[i].1);
            let right = LineView::from_text(&successful[j].1);
            pairs.push(PairDiff {
                left_environment: environments[successful[i].0].clone(),
                right_environment: environments[successful[j].0].clone(),
                diff: diff_lines(&left, &right),
            });
        }
    }

    let mut groups: Vec<(&str, Vec<String>)> = Vec::new();
    for (ei, rendered) in &successful {
        let env = environments[*ei].clone();
        match groups.iter_mut().find(|(text, _)| *text == rendered.as_str()) {
            Some((_, members)) => members.push(env),
            None => groups.push((rendered.as_str(), vec![env])),
        }
    }

    ComparisonMatrix {
        document: document.to_string(),
        successful_environments: successful
            .iter()
            .map(|(ei, _)| environments[*ei].clone())
            .collect(),
        failed_environments: failed,
        pairs,
        equivalence_groups: groups.into_iter().map(|(_, members)| members).collect(),
    }
}
