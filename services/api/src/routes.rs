use crate::infra::{AppState, SharedPlanning};
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use money_pilot::error::AppError;
use money_pilot::planning::{planning_router, Advice, AdvisoryRequest, JsonBody, UserId};
use serde_json::json;
use tracing::info;

pub(crate) fn with_service_routes(planning: SharedPlanning) -> axum::Router {
    planning_router(planning)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/plans/:user_id/advice",
            axum::routing::post(advice_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Generates advice for a saved plan. Generation never fails; a missing plan does.
pub(crate) async fn advice_endpoint(
    Extension(state): Extension<AppState>,
    Path(user_id): Path<String>,
    JsonBody(request): JsonBody<AdvisoryRequest>,
) -> Result<Json<Advice>, AppError> {
    let user_id = UserId(user_id);
    let record = state.planning.load_plan(&user_id)?;
    let advice = state.advisor.advise(&record.plan, &request).await;
    info!(user = %user_id, kind = request.kind(), source = ?advice.source, "advice served");
    Ok(Json(advice))
}
