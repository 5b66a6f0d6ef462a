use std::sync::Arc;

use axum::extract::{Path, State};
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::planning::planning_router;
use crate::planning::router::{report_handler, save_handler, JsonBody};
use crate::planning::service::PlanningService;

fn router() -> axum::Router {
    let (service, _) = build_service();
    planning_router(Arc::new(service))
}

#[tokio::test]
async fn put_then_get_round_trips_plan() {
    let router = router();
    let plan = serde_json::to_value(stretched_plan()).expect("plan json");

    let response = router
        .clone()
        .oneshot(json_request(Method::PUT, "/api/v1/plans/priya", &plan))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let saved = read_json_body(response).await;
    assert_eq!(saved["user_id"], json!("priya"));
    assert!(saved.get("updated_at").is_some());

    let response = router
        .oneshot(empty_request(Method::GET, "/api/v1/plans/priya"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let loaded = read_json_body(response).await;
    assert_eq!(loaded["plan"], plan);
}

#[tokio::test]
async fn missing_plan_is_not_found() {
    let response = router()
        .oneshot(empty_request(Method::GET, "/api/v1/plans/ghost/report"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .unwrap_or_default()
        .contains("ghost"));
}

#[tokio::test]
async fn delete_returns_no_content_once() {
    let router = router();
    let plan = serde_json::to_value(stretched_plan()).expect("plan json");
    router
        .clone()
        .oneshot(json_request(Method::PUT, "/api/v1/plans/priya", &plan))
        .await
        .expect("save executes");

    let first = router
        .clone()
        .oneshot(empty_request(Method::DELETE, "/api/v1/plans/priya"))
        .await
        .expect("route executes");
    let second = router
        .oneshot(empty_request(Method::DELETE, "/api/v1/plans/priya"))
        .await
        .expect("route executes");

    assert_eq!(first.status(), StatusCode::NO_CONTENT);
    assert_eq!(second.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn report_handler_serializes_report() {
    let (service, _) = build_service();
    let service = Arc::new(service);
    service
        .save_plan(&user(), stretched_plan())
        .expect("save succeeds");

    let response = report_handler(State(service), Path(user().0)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["achievable"], json!(false));
    assert_eq!(payload["monthly_gap"], json!(7_678.0));
    assert_eq!(payload["assumptions"]["inflation_pct"], json!(6.0));
    assert_eq!(payload["goals"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn save_handler_maps_storage_failure_to_server_error() {
    let service = Arc::new(PlanningService::new(Arc::new(UnavailableRepository)));

    let response =
        save_handler(State(service), Path(user().0), JsonBody(stretched_plan())).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn wizard_route_walks_to_results() {
    let router = router();

    let mut state = Value::Null;
    let mut last = Value::Null;
    for _ in 0..3 {
        let body = if state.is_null() {
            json!({ "action": { "type": "next" } })
        } else {
            json!({ "state": state, "action": { "type": "next" } })
        };
        let response = router
            .clone()
            .oneshot(json_request(Method::POST, "/api/v1/plans/priya/wizard", &body))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        last = read_json_body(response).await;
        state = last["state"].clone();
    }

    assert_eq!(last["state"]["step"], json!("results"));
    assert_eq!(last["effect"], json!("submit"));
    assert_eq!(last["report"]["readiness"]["score"], json!(80));
}

#[tokio::test]
async fn wizard_route_rejects_invalid_moves() {
    let response = router()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/plans/priya/wizard",
            &json!({ "action": { "type": "back" } }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn readiness_calculation_endpoint() {
    let response = router()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/calculations/readiness",
            &json!({
                "monthly_income": 50_000.0,
                "monthly_expenses": 20_000.0,
                "current_savings": 100_000.0
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["score"], json!(80));
    assert_eq!(payload["label"], json!("Very Good"));
}

#[tokio::test]
async fn readiness_calculation_rejects_zero_income() {
    let response = router()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/calculations/readiness",
            &json!({
                "monthly_income": 0.0,
                "monthly_expenses": 20_000.0,
                "current_savings": 0.0
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn contribution_endpoint_defaults_unknown_risk_to_balanced() {
    let response = router()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/calculations/contribution",
            &json!({ "target_amount": 10_000_000.0, "horizon_years": 20.0, "risk": "yolo" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["monthly_contribution"], json!(11_447.0));
    assert_eq!(payload["total_contributed"], json!(2_747_337.0));
}

#[tokio::test]
async fn contribution_endpoint_rejects_zero_horizon() {
    let response = router()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/calculations/contribution",
            &json!({ "target_amount": 500_000.0, "horizon_years": 0.0 }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn allocation_endpoint_returns_split() {
    let response = router()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/calculations/allocation",
            &json!({ "risk": "Conservative", "age": 55, "horizon_years": 2.0 }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["equity_pct"], json!(10));
    assert_eq!(payload["debt_pct"], json!(75));
    assert_eq!(payload["gold_pct"], json!(15));
}

fn raw_json_request(method: Method, uri: &str, body: &'static str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .expect("request builds")
}

#[tokio::test]
async fn malformed_plan_body_gets_json_error() {
    let response = router()
        .oneshot(raw_json_request(Method::PUT, "/api/v1/plans/priya", "{not json"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .unwrap_or_default()
        .contains("parse the request body"));
}

#[tokio::test]
async fn mistyped_calculation_body_gets_json_error() {
    let response = router()
        .oneshot(raw_json_request(
            Method::POST,
            "/api/v1/calculations/readiness",
            r#"{"monthly_income":"lots","monthly_expenses":1000,"current_savings":0}"#,
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload["error"].is_string());
}
