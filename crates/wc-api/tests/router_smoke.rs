use axum::{body::Body, http::Request, http::StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

#[tokio::test]
async fn livez_is_open_and_api_requires_auth() {
    let state = wc_api::test_state("test-key");
    let app = wc_api::create_router(state);

    let livez = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/livez")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(livez.status(), StatusCode::OK);

    let unauthorized = app
        .oneshot(
            Request::builder()
                .uri("/api/workers/1/job-recommendations")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(unauthorized.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn recommends_jobs_excluding_applied_postings() {
    let state = wc_api::test_state("test-key");
    let app = wc_api::create_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/workers/1/job-recommendations")
                .header("x-api-key", "test-key")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap();

    let results = json.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["candidate_id"], 10);
    assert!(results[0].get("score_breakdown").is_none());
}

#[tokio::test]
async fn include_scores_adds_the_breakdown() {
    let state = wc_api::test_state("test-key");
    let app = wc_api::create_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/workers/1/job-recommendations?include_scores=true")
                .header("x-api-key", "test-key")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap();

    let breakdown = &json[0]["score_breakdown"];
    assert!(breakdown["skills"].as_f64().unwrap() >= 0.0);
    assert!(breakdown.get("freshness").is_some());
    assert!(breakdown.get("rating").is_none());
}

#[tokio::test]
async fn worker_recommendations_carry_rating_in_breakdown() {
    let state = wc_api::test_state("test-key");
    let app = wc_api::create_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/jobs/10/worker-recommendations?include_scores=true")
                .header("x-api-key", "test-key")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap();

    let breakdown = &json[0]["score_breakdown"];
    assert!(breakdown.get("rating").is_some());
    assert!(breakdown.get("freshness").is_none());
}

#[tokio::test]
async fn unknown_seeker_is_not_found() {
    let state = wc_api::test_state("test-key");
    let app = wc_api::create_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/workers/404/job-recommendations")
                .header("x-api-key", "test-key")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let state = wc_api::test_state("test-key");
    let app = wc_api::create_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/livez")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.headers().contains_key("x-request-id"));
}
