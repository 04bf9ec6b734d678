pub mod api;
pub mod logging;
pub mod matching;
pub mod provider;
pub mod skills;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// One entry in a worker's track record: a past job title and whether the
/// engagement was accepted by the client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryOutcome {
    pub title: String,
    pub accepted: bool,
}

/// Coarse schedule signal supplied by the scheduling collaborator.
/// `has_schedule == false` means the collaborator has no data at all,
/// not that the candidate is unavailable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AvailabilitySignal {
    pub has_schedule: bool,
    pub active_slot_count: i32,
}

// Commonly used data models for the matching functions. Every field the
// provider may omit is an explicit Option with a neutral scoring fallback.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkerProfile {
    pub id: i64,
    #[serde(default)]
    pub skill_tags: Vec<String>,
    pub bio: Option<String>,
    pub coordinates: Option<GeoPoint>,
    pub city: Option<String>,
    #[serde(default)]
    pub history: Vec<HistoryOutcome>,
    #[serde(default)]
    pub availability: AvailabilitySignal,
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub skill_tags: Vec<String>,
    pub coordinates: Option<GeoPoint>,
    pub city: Option<String>,
    #[serde(default)]
    pub history: Vec<HistoryOutcome>,
    #[serde(default)]
    pub availability: AvailabilitySignal,
    pub posted_at: Option<DateTime<Utc>>,
}
