use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use serde_json::Value;

use crate::planning::domain::{
    FinancialPlan, FinancialProfile, Goal, GoalId, GoalPriority, GoalType, InvestmentExperience,
    Preferences, RiskProfile, UserId,
};
use crate::planning::repository::{
    InMemoryPlanRepository, PlanRecord, PlanRepository, RepositoryError,
};
use crate::planning::service::PlanningService;

pub(super) fn user() -> UserId {
    UserId("priya".to_string())
}

pub(super) fn profile(income: f64, expenses: f64, savings: f64) -> FinancialProfile {
    FinancialProfile {
        age: 32,
        monthly_income: income,
        monthly_expenses: expenses,
        current_savings: savings,
    }
}

pub(super) fn goal(id: u64, goal_type: GoalType, target_amount: f64, horizon_years: f64) -> Goal {
    Goal {
        id: GoalId(id),
        goal_type,
        target_amount,
        horizon_years,
        priority: GoalPriority::Medium,
    }
}

/// Two goals on a modest surplus: the house fits, retirement on top of it does not.
pub(super) fn stretched_plan() -> FinancialPlan {
    FinancialPlan {
        personal: FinancialProfile {
            age: 32,
            monthly_income: 40_000.0,
            monthly_expenses: 30_000.0,
            current_savings: 60_000.0,
        },
        goals: vec![
            goal(1, GoalType::House, 500_000.0, 5.0),
            goal(2, GoalType::Retirement, 10_000_000.0, 20.0),
        ],
        preferences: Preferences {
            risk: RiskProfile::Balanced,
            experience: InvestmentExperience::Novice,
        },
    }
}

pub(super) fn build_service() -> (
    PlanningService<InMemoryPlanRepository>,
    Arc<InMemoryPlanRepository>,
) {
    let repository = Arc::new(InMemoryPlanRepository::new());
    let service = PlanningService::new(repository.clone());
    (service, repository)
}

pub(super) struct UnavailableRepository;

impl PlanRepository for UnavailableRepository {
    fn save(&self, _record: PlanRecord) -> Result<PlanRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }

    fn load(&self, _user_id: &UserId) -> Result<Option<PlanRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }

    fn delete(&self, _user_id: &UserId) -> Result<bool, RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }
}

pub(super) fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).expect("serialize body")))
        .expect("request builds")
}

pub(super) fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
