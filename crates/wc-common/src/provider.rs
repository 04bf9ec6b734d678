use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::api::recommendation::Recommendation;
use crate::matching::engine::RecommendationEngine;
use crate::{JobPosting, WorkerProfile};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("candidate fetch failed: {0}")]
    FetchFailed(String),
    #[error("worker {0} not found")]
    WorkerNotFound(i64),
    #[error("job {0} not found")]
    JobNotFound(i64),
}

/// Supplies the seeker record and an eligibility-filtered candidate pool.
/// Filtering (already applied, already hired, self-matches) happens behind
/// this trait, before the pool ever reaches the engine. Implementations own
/// their retry policy; callers get a single fetch error.
#[async_trait]
pub trait CandidateProvider: Send + Sync {
    async fn jobs_for_worker(
        &self,
        worker_id: i64,
    ) -> Result<(WorkerProfile, Vec<JobPosting>), ProviderError>;

    async fn workers_for_job(
        &self,
        job_id: i64,
    ) -> Result<(JobPosting, Vec<WorkerProfile>), ProviderError>;
}

/// A worker's existing application to a job; such pairs are excluded from
/// both recommendation directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub worker_id: i64,
    pub job_id: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub workers: Vec<WorkerProfile>,
    #[serde(default)]
    pub jobs: Vec<JobPosting>,
    #[serde(default)]
    pub applications: Vec<Application>,
}

/// Fixture-backed provider for tests and the development server.
pub struct InMemoryCandidateProvider {
    dataset: Dataset,
}

impl InMemoryCandidateProvider {
    pub fn new(dataset: Dataset) -> Self {
        Self { dataset }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    fn has_application(&self, worker_id: i64, job_id: i64) -> bool {
        self.dataset
            .applications
            .iter()
            .any(|a| a.worker_id == worker_id && a.job_id == job_id)
    }
}

#[async_trait]
impl CandidateProvider for InMemoryCandidateProvider {
    async fn jobs_for_worker(
        &self,
        worker_id: i64,
    ) -> Result<(WorkerProfile, Vec<JobPosting>), ProviderError> {
        let worker = self
            .dataset
            .workers
            .iter()
            .find(|w| w.id == worker_id)
            .cloned()
            .ok_or(ProviderError::WorkerNotFound(worker_id))?;

        let pool = self
            .dataset
            .jobs
            .iter()
            .filter(|job| !self.has_application(worker_id, job.id))
            .cloned()
            .collect();

        Ok((worker, pool))
    }

    async fn workers_for_job(
        &self,
        job_id: i64,
    ) -> Result<(JobPosting, Vec<WorkerProfile>), ProviderError> {
        let job = self
            .dataset
            .jobs
            .iter()
            .find(|j| j.id == job_id)
            .cloned()
            .ok_or(ProviderError::JobNotFound(job_id))?;

        let pool = self
            .dataset
            .workers
            .iter()
            .filter(|worker| !self.has_application(worker.id, job_id))
            .cloned()
            .collect();

        Ok((job, pool))
    }
}

/// Fetch-then-score front door: one provider call under a deadline, then
/// the pure scoring pass. A fetch that errors or times out yields the fetch
/// error and no results; partial batches are never returned.
pub struct RecommendationService {
    engine: RecommendationEngine,
    provider: Arc<dyn CandidateProvider>,
    fetch_timeout: Duration,
}

impl RecommendationService {
    pub fn new(
        engine: RecommendationEngine,
        provider: Arc<dyn CandidateProvider>,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            engine,
            provider,
            fetch_timeout,
        }
    }

    pub async fn recommend_jobs(
        &self,
        worker_id: i64,
        limit: usize,
        include_breakdown: bool,
    ) -> Result<Vec<Recommendation>, ProviderError> {
        let (worker, pool) = self
            .fetch_with_deadline(self.provider.jobs_for_worker(worker_id))
            .await?;
        debug!(worker_id, pool_size = pool.len(), "scoring job candidates");

        let ranked = self.engine.recommend_jobs(&worker, &pool, Utc::now(), limit);
        Ok(ranked
            .iter()
            .map(|r| Recommendation::from_job(r, include_breakdown))
            .collect())
    }

    pub async fn recommend_workers(
        &self,
        job_id: i64,
        limit: usize,
        include_breakdown: bool,
    ) -> Result<Vec<Recommendation>, ProviderError> {
        let (job, pool) = self
            .fetch_with_deadline(self.provider.workers_for_job(job_id))
            .await?;
        debug!(job_id, pool_size = pool.len(), "scoring worker candidates");

        let ranked = self.engine.recommend_workers(&job, &pool, limit);
        Ok(ranked
            .iter()
            .map(|r| Recommendation::from_worker(r, include_breakdown))
            .collect())
    }

    async fn fetch_with_deadline<T>(
        &self,
        fetch: impl Future<Output = Result<T, ProviderError>>,
    ) -> Result<T, ProviderError> {
        match tokio::time::timeout(self.fetch_timeout, fetch).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::FetchFailed(format!(
                "provider exceeded {}ms deadline",
                self.fetch_timeout.as_millis()
            ))),
        }
    }
}
