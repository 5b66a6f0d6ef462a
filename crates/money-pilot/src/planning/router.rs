use std::sync::Arc;

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Path, Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::calculator::{
    compute_allocation, compute_readiness, compute_required_contribution, validate_cash_flow,
};
use super::domain::{FinancialPlan, RiskProfile, UserId};
use super::repository::{PlanRepository, RepositoryError};
use super::service::{PlanningService, PlanningServiceError};
use super::wizard::{WizardAction, WizardState};

/// Router exposing plan storage, reports, the wizard, and stateless calculators.
pub fn planning_router<R>(service: Arc<PlanningService<R>>) -> Router
where
    R: PlanRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/plans/:user_id",
            get(load_handler::<R>)
                .put(save_handler::<R>)
                .delete(delete_handler::<R>),
        )
        .route("/api/v1/plans/:user_id/report", get(report_handler::<R>))
        .route(
            "/api/v1/plans/:user_id/wizard",
            get(resume_handler::<R>).post(wizard_handler::<R>),
        )
        .route("/api/v1/calculations/readiness", post(readiness_handler))
        .route("/api/v1/calculations/contribution", post(contribution_handler))
        .route("/api/v1/calculations/allocation", post(allocation_handler))
        .with_state(service)
}

impl PlanningServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::PlanNotFound(_) => StatusCode::NOT_FOUND,
            Self::Repository(RepositoryError::InvalidKey(_)) => StatusCode::BAD_REQUEST,
            Self::Invalid(_) | Self::Wizard(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// `Json` whose rejections use the same `{"error": ...}` body as every other failure.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                let payload = json!({ "error": rejection.body_text() });
                Err((rejection.status(), Json(payload)).into_response())
            }
        }
    }
}

fn error_response(err: PlanningServiceError) -> Response {
    let status = err.status_code();
    if status.is_server_error() {
        error!(error = %err, "planning request failed");
    }
    let payload = json!({ "error": err.to_string() });
    (status, Json(payload)).into_response()
}

pub(crate) async fn save_handler<R>(
    State(service): State<Arc<PlanningService<R>>>,
    Path(user_id): Path<String>,
    JsonBody(plan): JsonBody<FinancialPlan>,
) -> Response
where
    R: PlanRepository + 'static,
{
    match service.save_plan(&UserId(user_id), plan) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn load_handler<R>(
    State(service): State<Arc<PlanningService<R>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: PlanRepository + 'static,
{
    match service.load_plan(&UserId(user_id)) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn delete_handler<R>(
    State(service): State<Arc<PlanningService<R>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: PlanRepository + 'static,
{
    match service.delete_plan(&UserId(user_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn report_handler<R>(
    State(service): State<Arc<PlanningService<R>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: PlanRepository + 'static,
{
    match service.report(&UserId(user_id)) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn resume_handler<R>(
    State(service): State<Arc<PlanningService<R>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: PlanRepository + 'static,
{
    match service.resume(&UserId(user_id)) {
        Ok(state) => (StatusCode::OK, Json(state)).into_response(),
        Err(err) => error_response(err),
    }
}

/// The client holds the wizard state; an absent state resumes from storage.
#[derive(Debug, Deserialize)]
pub struct WizardRequest {
    #[serde(default)]
    pub state: Option<WizardState>,
    pub action: WizardAction,
}

pub(crate) async fn wizard_handler<R>(
    State(service): State<Arc<PlanningService<R>>>,
    Path(user_id): Path<String>,
    JsonBody(request): JsonBody<WizardRequest>,
) -> Response
where
    R: PlanRepository + 'static,
{
    let user_id = UserId(user_id);
    let state = match request.state {
        Some(state) => state,
        None => match service.resume(&user_id) {
            Ok(state) => state,
            Err(err) => return error_response(err),
        },
    };
    match service.apply(&user_id, state, request.action) {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(err) => error_response(err),
    }
}

#[derive(Debug, Deserialize)]
pub struct ReadinessRequest {
    pub monthly_income: f64,
    pub monthly_expenses: f64,
    pub current_savings: f64,
}

#[derive(Debug, Deserialize)]
pub struct ContributionRequest {
    pub target_amount: f64,
    pub horizon_years: f64,
    #[serde(default)]
    pub risk: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AllocationRequest {
    #[serde(default)]
    pub risk: Option<String>,
    pub age: u32,
    pub horizon_years: f64,
}

fn risk_or_default(raw: Option<&str>) -> RiskProfile {
    raw.map(RiskProfile::parse_or_default).unwrap_or_default()
}

pub(crate) async fn readiness_handler(
    JsonBody(request): JsonBody<ReadinessRequest>,
) -> Response {
    let ReadinessRequest {
        monthly_income,
        monthly_expenses,
        current_savings,
    } = request;
    match validate_cash_flow(monthly_income, monthly_expenses, current_savings) {
        Ok(()) => {
            let result = compute_readiness(monthly_income, monthly_expenses, current_savings);
            (StatusCode::OK, Json(result)).into_response()
        }
        Err(err) => error_response(err.into()),
    }
}

pub(crate) async fn contribution_handler(
    JsonBody(request): JsonBody<ContributionRequest>,
) -> Response {
    let risk = risk_or_default(request.risk.as_deref());
    match compute_required_contribution(request.target_amount, request.horizon_years, risk) {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(err) => error_response(err.into()),
    }
}

pub(crate) async fn allocation_handler(
    JsonBody(request): JsonBody<AllocationRequest>,
) -> Response {
    let risk = risk_or_default(request.risk.as_deref());
    let result = compute_allocation(risk, request.age, request.horizon_years);
    (StatusCode::OK, Json(result)).into_response()
}
