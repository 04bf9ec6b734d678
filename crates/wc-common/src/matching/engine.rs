use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use thiserror::Error;

use super::scoring::{score_job_for_worker, score_worker_for_job, MatchScore, MatchingConfig};
use super::weights::WeightsError;
use crate::{JobPosting, WorkerProfile};

#[derive(Debug, Clone)]
pub struct RankedJob {
    pub job: JobPosting,
    pub score: MatchScore,
}

#[derive(Debug, Clone)]
pub struct RankedWorker {
    pub worker: WorkerProfile,
    pub score: MatchScore,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid job-recommendation weights: {0}")]
    InvalidJobWeights(#[source] WeightsError),
    #[error("invalid worker-recommendation weights: {0}")]
    InvalidWorkerWeights(#[source] WeightsError),
}

/// Ranks an eligibility-pre-filtered candidate pool for one seeker. The
/// pool arrives already filtered by the candidate provider; no eligibility
/// rules are re-derived here. Scoring fans out one task per candidate and
/// fans back into a single stable sort, so output order is deterministic
/// for a fixed pool, weights, and `now`.
pub struct RecommendationEngine {
    config: MatchingConfig,
}

impl RecommendationEngine {
    /// Weight vectors are checked once here; a bad vector is a startup
    /// defect, not a per-request condition.
    pub fn new(config: MatchingConfig) -> Result<Self, EngineError> {
        config
            .job_weights
            .validate()
            .map_err(EngineError::InvalidJobWeights)?;
        config
            .worker_weights
            .validate()
            .map_err(EngineError::InvalidWorkerWeights)?;
        Ok(Self { config })
    }

    pub fn with_defaults() -> Self {
        Self::new(MatchingConfig::default()).expect("built-in weight vectors are valid")
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Rank open jobs for a worker, best first, at most `limit` results.
    pub fn recommend_jobs(
        &self,
        worker: &WorkerProfile,
        pool: &[JobPosting],
        now: DateTime<Utc>,
        limit: usize,
    ) -> Vec<RankedJob> {
        if limit == 0 || pool.is_empty() {
            return Vec::new();
        }

        let mut ranked: Vec<RankedJob> = pool
            .par_iter()
            .map(|job| RankedJob {
                job: job.clone(),
                score: score_job_for_worker(&self.config, worker, job, now),
            })
            .collect();

        sort_by_total_descending(&mut ranked, |r| r.score.total);
        ranked.truncate(limit);
        ranked
    }

    /// Rank workers for a job, best first, at most `limit` results.
    pub fn recommend_workers(
        &self,
        job: &JobPosting,
        pool: &[WorkerProfile],
        limit: usize,
    ) -> Vec<RankedWorker> {
        if limit == 0 || pool.is_empty() {
            return Vec::new();
        }

        let mut ranked: Vec<RankedWorker> = pool
            .par_iter()
            .map(|worker| RankedWorker {
                worker: worker.clone(),
                score: score_worker_for_job(&self.config, job, worker),
            })
            .collect();

        sort_by_total_descending(&mut ranked, |r| r.score.total);
        ranked.truncate(limit);
        ranked
    }
}

/// Stable descending sort: candidates with equal totals keep their pool
/// order, which is part of the determinism contract.
fn sort_by_total_descending<T>(items: &mut [T], total: impl Fn(&T) -> f64) {
    items.sort_by(|a, b| {
        total(b)
            .partial_cmp(&total(a))
            .unwrap_or(Ordering::Equal)
    });
}
