use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use wc_common::api::recommendation::Recommendation;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::SharedState;

#[derive(Debug, Deserialize, Default)]
pub struct RecommendationQuery {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub include_scores: bool,
}

const fn default_limit() -> u32 {
    20
}

const MAX_LIMIT: u32 = 50;

pub async fn jobs_for_worker(
    State(state): State<SharedState>,
    Path(worker_id): Path<i64>,
    Query(query): Query<RecommendationQuery>,
    _auth: AuthUser,
) -> Result<Json<Vec<Recommendation>>, ApiError> {
    let limit = query.limit.clamp(1, MAX_LIMIT) as usize;

    let recommendations = state
        .service
        .recommend_jobs(worker_id, limit, query.include_scores)
        .await?;

    Ok(Json(recommendations))
}

pub async fn workers_for_job(
    State(state): State<SharedState>,
    Path(job_id): Path<i64>,
    Query(query): Query<RecommendationQuery>,
    _auth: AuthUser,
) -> Result<Json<Vec<Recommendation>>, ApiError> {
    let limit = query.limit.clamp(1, MAX_LIMIT) as usize;

    let recommendations = state
        .service
        .recommend_workers(job_id, limit, query.include_scores)
        .await?;

    Ok(Json(recommendations))
}
