use super::common::*;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::analytics::router::submit_handler;
use crate::analytics::AnalyticsService;
use crate::insights::InsightGenerator;

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request")
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

#[tokio::test]
async fn submit_route_acknowledges_with_prefixed_id() {
    let router = seeded_router(InsightGenerator::disabled());
    let response = router
        .oneshot(post_json(
            "/api/v1/feedback",
            json!({"date": "2025-02-01", "nps": 10, "csat": 5, "ces": 1, "comment": "Loved it"}),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["status"], "success");
    assert_eq!(payload["data"]["date"], "2025-02-01");
    assert!(payload["data"]["id"]
        .as_str()
        .unwrap_or_default()
        .starts_with("fb_"));
}

#[tokio::test]
async fn submit_route_rejects_out_of_range_scores() {
    let router = seeded_router(InsightGenerator::disabled());
    let response = router
        .oneshot(post_json(
            "/api/v1/feedback",
            json!({"date": "2025-02-01", "nps": 11, "csat": 5, "ces": 1}),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["status"], "error");
    assert_eq!(payload["details"][0]["field"], "nps");
}

#[tokio::test]
async fn submit_handler_rejects_malformed_json() {
    let router = seeded_router(InsightGenerator::disabled());
    let response = router
        .oneshot(post_json(
            "/api/v1/feedback",
            json!({"date": "not a date", "nps": 5, "csat": 5, "ces": 1}),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["message"], "invalid input data");
    assert!(payload["details"].is_array());
}

#[tokio::test]
async fn submit_handler_maps_repository_outage_to_internal_error() {
    let service = Arc::new(AnalyticsService::new(
        Arc::new(UnavailableRepository),
        Arc::new(InsightGenerator::disabled()),
    ));

    let response = submit_handler::<UnavailableRepository>(
        State(service),
        Ok(axum::Json(submission(9, 5, 1))),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn metrics_route_returns_full_result() {
    let router = seeded_router(InsightGenerator::disabled());
    let response = router
        .oneshot(get("/api/v1/analytics/metrics?start_date=2025-01-01&end_date=2025-01-31"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["nps"]["total"], 8);
    assert_eq!(payload["csat"]["percentage"], 50.0);
    assert_eq!(payload["csat"]["score"], 3.38);
    assert_eq!(payload["segments"]["low_effort_promoters"]["count"], 3);
}

#[tokio::test]
async fn empty_period_returns_not_found() {
    let router = seeded_router(InsightGenerator::disabled());
    let response = router
        .oneshot(get("/api/v1/insights/overview?start_date=2026-01-01"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert_eq!(payload["message"], "no feedback found for the selected period");
}

#[tokio::test]
async fn invalid_query_date_is_unprocessable() {
    let router = seeded_router(InsightGenerator::disabled());
    let response = router
        .oneshot(get("/api/v1/insights/nps?start_date=01/02/2025"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn overview_route_uses_satisfaction_percentage() {
    let generator = RecordingGenerator::replying("Mixed quarter with support friction.");
    let router = seeded_router(InsightGenerator::new(generator));
    let response = router
        .oneshot(get("/api/v1/insights/overview"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["period"], "2025-01 to 2025-01");
    assert_eq!(payload["metrics"]["csat_avg"], 50.0);
    assert_eq!(payload["metrics"]["nps_avg"], 0);
    assert_eq!(
        payload["executive_summary"],
        "Mixed quarter with support friction."
    );
}

#[tokio::test]
async fn indicator_routes_return_distributions() {
    for (uri, key) in [
        ("/api/v1/insights/nps", "promoters"),
        ("/api/v1/insights/csat", "satisfied"),
        ("/api/v1/insights/ces", "low_effort"),
    ] {
        let router = seeded_router(InsightGenerator::disabled());
        let response = router.oneshot(get(uri)).await.expect("route executes");
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        let payload = read_json_body(response).await;
        assert!(payload["distribution"][key].is_u64(), "{uri} missing {key}");
        assert!(payload["insight"].is_string());
    }
}

#[tokio::test]
async fn structured_insight_routes_degrade_without_provider() {
    let router = seeded_router(InsightGenerator::disabled());

    let drivers = read_json_body(
        router
            .clone()
            .oneshot(get("/api/v1/insights/drivers"))
            .await
            .expect("route executes"),
    )
    .await;
    assert_eq!(
        drivers,
        json!({"positive_drivers": [], "negative_drivers": []})
    );

    let topics = read_json_body(
        router
            .clone()
            .oneshot(get("/api/v1/insights/topics"))
            .await
            .expect("route executes"),
    )
    .await;
    assert_eq!(topics, json!({"topics": []}));

    let plans = read_json_body(
        router
            .oneshot(get("/api/v1/insights/action-plans"))
            .await
            .expect("route executes"),
    )
    .await;
    assert_eq!(plans, json!({"action_plans": []}));
}

#[tokio::test]
async fn segments_route_lists_each_segment_with_share() {
    let generator = RecordingGenerator::replying(r#"{"description": "Profile"}"#);
    let router = seeded_router(InsightGenerator::new(generator));
    let response = router
        .oneshot(get("/api/v1/insights/segments"))
        .await
        .expect("route executes");

    let payload = read_json_body(response).await;
    let segments = payload["segments"].as_array().expect("segments array");
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[1]["segment"], "Low-effort promoters");
    assert_eq!(segments[1]["percentage"], 38);
    assert_eq!(segments[1]["description"], "Profile");
}
