use chrono::{DateTime, Utc};

use super::availability::score_availability;
use super::freshness::score_freshness;
use super::geo::{evaluate_proximity, LocationRef, DEFAULT_MAX_TRAVEL_KM};
use super::history::score_history;
use super::rating::score_rating;
use super::weights::{Weights, JOB_RECOMMENDATION_WEIGHTS, WORKER_RECOMMENDATION_WEIGHTS};
use crate::skills::matcher::score_skill_match;
use crate::skills::normalizer::{extract_skills, normalize_skill_set};
use crate::{JobPosting, WorkerProfile};

#[derive(Debug, Clone)]
pub struct MatchingConfig {
    pub job_weights: Weights,
    pub worker_weights: Weights,
    pub max_travel_km: f64,
    pub require_exact_skills: bool,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            job_weights: JOB_RECOMMENDATION_WEIGHTS,
            worker_weights: WORKER_RECOMMENDATION_WEIGHTS,
            max_travel_km: DEFAULT_MAX_TRAVEL_KM,
            require_exact_skills: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FactorScore {
    pub score: f64,
    pub status: &'static str,
    pub details: String,
}

/// Weighted per-candidate score with the factor breakdown. Freshness is
/// only present when ranking jobs, rating only when ranking workers.
#[derive(Debug, Clone)]
pub struct MatchScore {
    pub total: f64,
    pub skills: FactorScore,
    pub location: FactorScore,
    pub history: FactorScore,
    pub availability: FactorScore,
    pub freshness: Option<FactorScore>,
    pub rating: Option<FactorScore>,
}

/// Score one open job as a candidate for a worker.
pub fn score_job_for_worker(
    config: &MatchingConfig,
    worker: &WorkerProfile,
    job: &JobPosting,
    now: DateTime<Utc>,
) -> MatchScore {
    let skills = skills_factor(config, worker, job);
    let location = location_factor(config, worker, job);
    let history = history_factor(&worker.history, &job.title);
    let availability = availability_factor(job.availability);
    let freshness = freshness_factor(job.posted_at, now);

    let w = &config.job_weights;
    let total = skills.score * w.skills
        + location.score * w.location
        + history.score * w.history
        + availability.score * w.availability
        + freshness.score * w.freshness;

    MatchScore {
        total,
        skills,
        location,
        history,
        availability,
        freshness: Some(freshness),
        rating: None,
    }
}

/// Score one worker as a candidate for a job.
pub fn score_worker_for_job(
    config: &MatchingConfig,
    job: &JobPosting,
    worker: &WorkerProfile,
) -> MatchScore {
    let skills = skills_factor(config, worker, job);
    let location = location_factor(config, worker, job);
    let history = history_factor(&worker.history, &job.title);
    let availability = availability_factor(worker.availability);
    let rating = rating_factor(worker.rating);

    let w = &config.worker_weights;
    let total = skills.score * w.skills
        + location.score * w.location
        + history.score * w.history
        + availability.score * w.availability
        + rating.score * w.rating;

    MatchScore {
        total,
        skills,
        location,
        history,
        availability,
        freshness: None,
        rating: Some(rating),
    }
}

/// Requirement skills come from the posting text plus its tags; offered
/// skills from the worker's tags plus whatever the bio mentions.
fn skills_factor(config: &MatchingConfig, worker: &WorkerProfile, job: &JobPosting) -> FactorScore {
    let mut want: Vec<String> = extract_skills(&format!("{} {}", job.title, job.description))
        .into_iter()
        .chain(normalize_skill_set(&job.skill_tags))
        .collect();
    want.sort();
    want.dedup();

    let mut have: Vec<String> = normalize_skill_set(&worker.skill_tags)
        .into_iter()
        .chain(extract_skills(worker.bio.as_deref().unwrap_or_default()))
        .collect();
    have.sort();
    have.dedup();

    if want.is_empty() {
        return FactorScore {
            score: 1.0,
            status: "PERFECT_MATCH",
            details: "no skill requirements listed".into(),
        };
    }

    let outcome = score_skill_match(&have, &want, config.require_exact_skills);

    let mut parts = vec![format!("required: {}", want.join(", "))];
    if !outcome.exact.is_empty() {
        parts.push(format!("exact: {}", outcome.exact.join(", ")));
    }
    if !outcome.related.is_empty() {
        let pairs: Vec<String> = outcome
            .related
            .iter()
            .map(|(have, want)| format!("{have}~{want}"))
            .collect();
        parts.push(format!("related: {}", pairs.join(", ")));
    }
    if !outcome.missing.is_empty() {
        parts.push(format!("missing: {}", outcome.missing.join(", ")));
    }

    FactorScore {
        score: outcome.score,
        status: status_from_score(outcome.score, false),
        details: parts.join(" / "),
    }
}

fn location_factor(
    config: &MatchingConfig,
    worker: &WorkerProfile,
    job: &JobPosting,
) -> FactorScore {
    let evaluation = evaluate_proximity(
        LocationRef {
            coordinates: worker.coordinates,
            city: worker.city.as_deref(),
        },
        LocationRef {
            coordinates: job.coordinates,
            city: job.city.as_deref(),
        },
        config.max_travel_km,
    );

    let unknown = evaluation.details.contains("location unknown");
    FactorScore {
        score: evaluation.score,
        status: status_from_score(evaluation.score, unknown),
        details: evaluation.details,
    }
}

fn history_factor(outcomes: &[crate::HistoryOutcome], target_title: &str) -> FactorScore {
    let score = score_history(outcomes, target_title);
    let accepted = outcomes.iter().filter(|o| o.accepted).count();

    let (status, details) = if outcomes.is_empty() {
        (
            status_from_score(score, true),
            "no track record yet".to_string(),
        )
    } else {
        (
            status_from_score(score, false),
            format!("{accepted} accepted of {} engagements", outcomes.len()),
        )
    };

    FactorScore {
        score,
        status,
        details,
    }
}

fn availability_factor(signal: crate::AvailabilitySignal) -> FactorScore {
    let score = score_availability(signal);

    if !signal.has_schedule {
        return FactorScore {
            score,
            status: "UNKNOWN",
            details: "no schedule data".into(),
        };
    }

    FactorScore {
        score,
        status: status_from_score(score, false),
        details: format!("{} active slots", signal.active_slot_count.max(0)),
    }
}

fn freshness_factor(posted_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> FactorScore {
    let Some(posted_at) = posted_at else {
        return FactorScore {
            score: 0.5,
            status: "UNKNOWN",
            details: "posting date unknown".into(),
        };
    };

    let age = now - posted_at;
    let score = score_freshness(age);
    FactorScore {
        score,
        status: status_from_score(score, false),
        details: format!("posted {}h ago", age.num_hours().max(0)),
    }
}

fn rating_factor(rating: Option<f64>) -> FactorScore {
    let score = score_rating(rating);
    match rating {
        None => FactorScore {
            score,
            status: "UNKNOWN",
            details: "not yet rated".into(),
        },
        Some(value) => FactorScore {
            score,
            status: status_from_score(score, false),
            details: format!("rated {value:.1} of 5"),
        },
    }
}

fn status_from_score(score: f64, unknown: bool) -> &'static str {
    if unknown {
        "UNKNOWN"
    } else if score >= 0.9 {
        "PERFECT_MATCH"
    } else if score >= 0.7 {
        "MATCH"
    } else if score >= 0.4 {
        "PARTIAL_MATCH"
    } else {
        "MISS"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AvailabilitySignal, GeoPoint, HistoryOutcome};
    use chrono::Duration;

    fn base_worker() -> WorkerProfile {
        WorkerProfile {
            id: 1,
            skill_tags: vec!["Plumber".into(), "electrical".into()],
            bio: None,
            coordinates: Some(GeoPoint {
                lat: 44.9778,
                lng: -93.2650,
            }),
            city: Some("Minneapolis".into()),
            history: vec![HistoryOutcome {
                title: "bathroom plumbing repair".into(),
                accepted: true,
            }],
            availability: AvailabilitySignal {
                has_schedule: true,
                active_slot_count: 4,
            },
            rating: Some(4.5),
        }
    }

    fn base_job(now: DateTime<Utc>) -> JobPosting {
        JobPosting {
            id: 10,
            title: "Bathroom plumbing repair".into(),
            description: "Need a licensed plumber for a bathroom remodel".into(),
            skill_tags: vec!["plumbing".into()],
            coordinates: Some(GeoPoint {
                lat: 44.9780,
                lng: -93.2652,
            }),
            city: Some("Minneapolis".into()),
            history: vec![],
            availability: AvailabilitySignal {
                has_schedule: true,
                active_slot_count: 4,
            },
            posted_at: Some(now - Duration::hours(2)),
        }
    }

    #[test]
    fn strong_job_match_scores_high() {
        let now = Utc::now();
        let score = score_job_for_worker(&MatchingConfig::default(), &base_worker(), &base_job(now), now);

        assert!(score.total > 0.9, "total was {}", score.total);
        assert_eq!(score.skills.status, "PERFECT_MATCH");
        assert_eq!(score.location.score, 1.0);
        assert_eq!(score.freshness.as_ref().unwrap().score, 1.0);
        assert!(score.rating.is_none());
    }

    #[test]
    fn totals_stay_inside_the_unit_interval() {
        let now = Utc::now();
        let config = MatchingConfig::default();

        let strong = score_job_for_worker(&config, &base_worker(), &base_job(now), now);
        assert!((0.0..=1.0).contains(&strong.total));

        let blank = score_job_for_worker(
            &config,
            &WorkerProfile::default(),
            &JobPosting::default(),
            now,
        );
        assert!((0.0..=1.0).contains(&blank.total));
    }

    #[test]
    fn missing_location_degrades_only_that_factor() {
        let now = Utc::now();
        let mut worker = base_worker();
        worker.coordinates = None;
        worker.city = None;
        let mut job = base_job(now);
        job.coordinates = None;
        job.city = None;

        let score = score_job_for_worker(&MatchingConfig::default(), &worker, &job, now);
        assert_eq!(score.location.score, 0.3);
        assert_eq!(score.location.status, "UNKNOWN");
        assert_eq!(score.skills.status, "PERFECT_MATCH");
        assert!(score.total > 0.0);
    }

    #[test]
    fn missing_posting_date_is_neutral() {
        let now = Utc::now();
        let mut job = base_job(now);
        job.posted_at = None;

        let score = score_job_for_worker(&MatchingConfig::default(), &base_worker(), &job, now);
        let freshness = score.freshness.as_ref().unwrap();
        assert_eq!(freshness.score, 0.5);
        assert_eq!(freshness.status, "UNKNOWN");
    }

    #[test]
    fn worker_direction_swaps_freshness_for_rating() {
        let now = Utc::now();
        let score = score_worker_for_job(&MatchingConfig::default(), &base_job(now), &base_worker());

        assert!(score.freshness.is_none());
        let rating = score.rating.as_ref().unwrap();
        assert_eq!(rating.score, 0.9);
        assert!(score.total > 0.9, "total was {}", score.total);
    }

    #[test]
    fn unrated_worker_scores_neutral_rating() {
        let now = Utc::now();
        let mut worker = base_worker();
        worker.rating = None;

        let score = score_worker_for_job(&MatchingConfig::default(), &base_job(now), &worker);
        let rating = score.rating.as_ref().unwrap();
        assert_eq!(rating.score, 0.5);
        assert_eq!(rating.status, "UNKNOWN");
    }

    #[test]
    fn job_without_requirements_imposes_no_skill_constraint() {
        let now = Utc::now();
        let mut job = base_job(now);
        job.title = "Weekend help".into();
        job.description = String::new();
        job.skill_tags.clear();

        let score = score_job_for_worker(&MatchingConfig::default(), &base_worker(), &job, now);
        assert_eq!(score.skills.score, 1.0);
        assert_eq!(score.skills.details, "no skill requirements listed");
    }

    #[test]
    fn skill_details_name_the_gaps() {
        let now = Utc::now();
        let mut worker = base_worker();
        worker.skill_tags = vec!["roofing".into()];
        worker.history.clear();

        let score = score_job_for_worker(&MatchingConfig::default(), &worker, &base_job(now), now);
        assert!(score.skills.details.contains("missing: plumbing"));
        assert!(score.skills.score < 0.7);
    }
}
