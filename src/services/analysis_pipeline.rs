use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use chrono::Utc;
use futures::FutureExt;
use serde_json::Value;
use tokio::sync::mpsc::UnboundedSender;
use crate::errors::{UnveiledError, UnveiledResult};
use crate::helpers::validation::{sanitize_job_id, validate_username};
use crate::services::profile_aggregator::ProfileAggregator;
use crate::services::progress_tracker::ProgressTracker;
use crate::structs::analyze_request::AnalyzeRequest;
use crate::structs::github::github_repository::GithubRepository;
use crate::structs::profile_analysis::{AnalyzedRepository, ProfileAnalysis};
use crate::structs::progress_update::ProgressUpdate;
use crate::structs::stream_event::StreamEvent;
use crate::traits::profile_source::ProfileSource;
use crate::traits::repository_analyzer::RepositoryAnalyzer;

pub const STEP_VALIDATING: (&str, u8) = ("Validating request", 3);
pub const STEP_PROFILE: (&str, u8) = ("Fetching GitHub profile...", 10);
pub const STEP_PORTFOLIO: (&str, u8) = ("Fetching portfolio...", 25);
pub const STEP_ANALYZING: (&str, u8) = ("Analyzing repositories...", 40);
pub const STEP_REPOSITORY_PROGRESS: u8 = 50;
pub const STEP_AGGREGATING: (&str, u8) = ("Aggregating insights...", 75);
pub const STEP_FINALIZING: (&str, u8) = ("Finalizing results...", 80);
pub const STEP_COMPLETE: &str = "Analysis complete";
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred during analysis";

/// Sends events to the stream and mirrors them into the progress store.
/// Emits at most one terminal event.
struct Emitter {
    tx: UnboundedSender<StreamEvent>,
    tracker: ProgressTracker,
    job_id: Option<String>,
    /// Set once this run has written its fresh record.
    recording: bool,
    receiver_gone: bool,
    terminated: bool,
}

impl Emitter {
    async fn step(&mut self, (step, progress): (&str, u8)) {
        self.send(StreamEvent::step(step, progress));
        self.record(&ProgressUpdate::step(step, progress)).await;
    }

    async fn finish(&mut self, result: Value) {
        if self.terminated {
            return;
        }
        self.terminated = true;
        self.send(StreamEvent::result(STEP_COMPLETE, result));
        self.record(&ProgressUpdate::completed(STEP_COMPLETE)).await;
    }

    async fn fail(&mut self, message: &str) {
        if self.terminated {
            return;
        }
        self.terminated = true;
        self.send(StreamEvent::failure(message));
        self.record(&ProgressUpdate::failed(message)).await;
    }

    fn send(&mut self, event: StreamEvent) {
        if self.tx.send(event).is_err() && !self.receiver_gone {
            // Keep going so the progress store still sees the outcome.
            self.receiver_gone = true;
            log::debug!("Stream receiver dropped for job {:?}", self.job_id);
        }
    }

    async fn record(&mut self, update: &ProgressUpdate) {
        let Some(job_id) = self.job_id.clone() else {
            return;
        };
        let written = if self.recording {
            self.tracker.set_progress(&job_id, update).await
        } else {
            self.recording = true;
            self.tracker.start_job(&job_id, update).await
        };
        if let Err(e) = written {
            log::warn!("⚠️ Failed to record progress for {}: {}", job_id, e.short_message());
        }
    }
}

/// Runs one profile analysis job: validate, fetch the profile and repositories,
/// analyze each repository in turn, aggregate.
///
/// Repositories are analyzed strictly one after another; the external analyzer is rate limited.
pub struct AnalysisPipeline {
    profiles: Arc<dyn ProfileSource>,
    analyzer: Arc<dyn RepositoryAnalyzer>,
    tracker: ProgressTracker,
    max_repositories: usize,
}

impl AnalysisPipeline {
    pub fn new(
        profiles: Arc<dyn ProfileSource>,
        analyzer: Arc<dyn RepositoryAnalyzer>,
        tracker: ProgressTracker,
        max_repositories: usize,
    ) -> Self {
        Self {
            profiles,
            analyzer,
            tracker,
            max_repositories: max_repositories.max(1),
        }
    }

    pub fn tracker(&self) -> &ProgressTracker {
        &self.tracker
    }

    /// Drives the job to completion. Always ends the stream with a result or an error event.
    pub async fn run(&self, request: AnalyzeRequest, tx: UnboundedSender<StreamEvent>) {
        // An explicit job id is tracked from the first step; otherwise only once the username is known-good.
        let explicit_job_id = request
            .job_id
            .as_deref()
            .map(sanitize_job_id)
            .filter(|id| !id.is_empty());

        let mut emitter = Emitter {
            tx,
            tracker: self.tracker.clone(),
            job_id: explicit_job_id,
            recording: false,
            receiver_gone: false,
            terminated: false,
        };

        let started = std::time::Instant::now();
        let outcome = AssertUnwindSafe(self.execute(&request, &mut emitter))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(result)) => {
                log::info!("✅ Analysis for '{}' finished in {:.2}s", request.username.trim(), started.elapsed().as_secs_f64());
                emitter.finish(result).await;
            }
            Ok(Err(e)) => {
                log::error!("❌ Analysis for '{}' failed: {}", request.username.trim(), e.technical_details());
                emitter.fail(&e.short_message()).await;
            }
            Err(_) => {
                log::error!("💥 Analysis for '{}' panicked", request.username.trim());
                emitter.fail(UNEXPECTED_ERROR).await;
            }
        }
    }

    async fn execute(&self, request: &AnalyzeRequest, emitter: &mut Emitter) -> UnveiledResult<Value> {
        emitter.step(STEP_VALIDATING).await;
        let username = validate_username(&request.username)?;
        if emitter.job_id.is_none() {
            emitter.job_id = Some(sanitize_job_id(&username));
        }

        emitter.step(STEP_PROFILE).await;
        let profile = self.profiles.fetch_profile(&username).await?;

        emitter.step(STEP_PORTFOLIO).await;
        let repositories = self.profiles.fetch_repositories(&username).await?;
        let selected = select_repositories(repositories, self.max_repositories);
        if selected.is_empty() {
            return Err(UnveiledError::stream_error(
                "fetch repositories",
                &format!("No public repositories found for {}", username),
            ));
        }

        emitter.step(STEP_ANALYZING).await;
        let access_token = self.profiles.access_token();
        let total = selected.len();
        let mut analyzed = Vec::with_capacity(total);

        for (index, repository) in selected.into_iter().enumerate() {
            let step = format!("Analyzing {} ({}/{})", repository.full_name, index + 1, total);
            emitter.step((step.as_str(), STEP_REPOSITORY_PROGRESS)).await;

            let analysis = self.analyzer
                .analyze_repository(&repository, access_token.clone())
                .await?;
            analyzed.push(AnalyzedRepository { repository, analysis });
        }

        emitter.step(STEP_AGGREGATING).await;
        let summary = ProfileAggregator::summarize(&analyzed);

        emitter.step(STEP_FINALIZING).await;
        let analysis = ProfileAnalysis {
            username,
            profile,
            repositories: analyzed,
            summary,
            analyzed_at: Utc::now(),
        };

        Ok(serde_json::to_value(&analysis)?)
    }
}

/// Own, non-archived repositories, most recently pushed first, capped at `max`.
pub fn select_repositories(repositories: Vec<GithubRepository>, max: usize) -> Vec<GithubRepository> {
    let mut eligible: Vec<GithubRepository> = repositories
        .into_iter()
        .filter(|r| !r.fork && !r.archived)
        .collect();
    eligible.sort_by(|a, b| b.pushed_at.cmp(&a.pushed_at));
    eligible.truncate(max);
    eligible
}
