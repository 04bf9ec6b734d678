use serde::{Deserialize, Serialize};

use crate::matching::engine::{RankedJob, RankedWorker};
use crate::matching::scoring::MatchScore;

/// One ranked candidate as returned to API clients, ordered as produced by
/// the engine. The breakdown travels only when the caller asked for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub candidate_id: i64,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_breakdown: Option<ScoreBreakdown>,
}

/// Per-factor scores, all in [0,1]. Freshness appears only on job
/// recommendations, rating only on worker recommendations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub skills: f64,
    pub location: f64,
    pub history: f64,
    pub availability: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freshness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

impl From<&MatchScore> for ScoreBreakdown {
    fn from(score: &MatchScore) -> Self {
        Self {
            skills: score.skills.score,
            location: score.location.score,
            history: score.history.score,
            availability: score.availability.score,
            freshness: score.freshness.as_ref().map(|f| f.score),
            rating: score.rating.as_ref().map(|f| f.score),
        }
    }
}

impl Recommendation {
    pub fn from_job(ranked: &RankedJob, include_breakdown: bool) -> Self {
        Self {
            candidate_id: ranked.job.id,
            score: ranked.score.total,
            score_breakdown: include_breakdown.then(|| ScoreBreakdown::from(&ranked.score)),
        }
    }

    pub fn from_worker(ranked: &RankedWorker, include_breakdown: bool) -> Self {
        Self {
            candidate_id: ranked.worker.id,
            score: ranked.score.total,
            score_breakdown: include_breakdown.then(|| ScoreBreakdown::from(&ranked.score)),
        }
    }
}
