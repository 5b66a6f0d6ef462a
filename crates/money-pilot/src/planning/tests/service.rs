use std::sync::Arc;

use super::common::*;
use crate::planning::domain::{GoalId, UserId};
use crate::planning::repository::{PlanRepository, RepositoryError};
use crate::planning::service::{PlanningService, PlanningServiceError};
use crate::planning::wizard::{WizardAction, WizardEffect, WizardError, WizardState, WizardStep};

#[test]
fn save_then_load_returns_stored_plan() {
    let (service, repository) = build_service();

    let saved = service
        .save_plan(&user(), stretched_plan())
        .expect("save succeeds");
    let loaded = service.load_plan(&user()).expect("load succeeds");

    assert_eq!(saved, loaded);
    assert_eq!(loaded.plan, stretched_plan());
    assert!(repository.load(&user()).expect("repository load").is_some());
}

#[test]
fn load_and_delete_report_missing_plans() {
    let (service, _) = build_service();
    let stranger = UserId("nobody".to_string());

    assert!(matches!(
        service.load_plan(&stranger),
        Err(PlanningServiceError::PlanNotFound(ref id)) if *id == stranger
    ));
    assert!(matches!(
        service.delete_plan(&stranger),
        Err(PlanningServiceError::PlanNotFound(_))
    ));
}

#[test]
fn delete_removes_saved_plan() {
    let (service, _) = build_service();
    service
        .save_plan(&user(), stretched_plan())
        .expect("save succeeds");

    service.delete_plan(&user()).expect("delete succeeds");

    assert!(matches!(
        service.load_plan(&user()),
        Err(PlanningServiceError::PlanNotFound(_))
    ));
}

#[test]
fn report_flags_shortfall_against_surplus() {
    let (service, _) = build_service();
    service
        .save_plan(&user(), stretched_plan())
        .expect("save succeeds");

    let report = service.report(&user()).expect("report builds");

    assert_eq!(report.monthly_surplus, 10_000.0);
    assert_eq!(report.total_monthly_investment, 6_231.0 + 11_447.0);
    assert!(!report.achievable);
    assert_eq!(report.monthly_gap, Some(7_678.0));
    assert_eq!(report.total_goal_amount, 10_500_000.0);
    assert_eq!(report.average_horizon_years, 12.5);

    let house = &report.goals[0];
    assert!(house.feasibility.feasible);
    let retirement = &report.goals[1];
    assert_eq!(retirement.goal_id, GoalId(2));
    assert!(!retirement.feasibility.feasible);
    assert_eq!(retirement.feasibility.gap, 1_447.0);
    assert_eq!(
        retirement.feasibility.recommendation,
        "Need ₹1,447 more per month or extend timeline"
    );
    assert_eq!(report.infeasible_goals().count(), 1);
}

#[test]
fn report_without_goals_uses_five_year_horizon() {
    let (service, _) = build_service();
    let mut plan = stretched_plan();
    plan.goals.clear();
    service.save_plan(&user(), plan).expect("save succeeds");

    let report = service.report(&user()).expect("report builds");

    assert_eq!(report.average_horizon_years, 5.0);
    assert!(report.goals.is_empty());
    assert!(report.achievable);
    assert_eq!(report.monthly_gap, None);
    assert_eq!(report.allocation.equity_pct, 50);
}

#[test]
fn report_refuses_invalid_stored_plan() {
    let (service, _) = build_service();
    let mut plan = stretched_plan();
    plan.personal.monthly_income = 0.0;
    service.save_plan(&user(), plan).expect("drafts may be saved");

    assert!(matches!(
        service.report(&user()),
        Err(PlanningServiceError::Invalid(_))
    ));
}

#[test]
fn resume_hydrates_saved_plan_on_first_step() {
    let (service, _) = build_service();
    assert_eq!(service.resume(&user()).expect("resume"), WizardState::new());

    service
        .save_plan(&user(), stretched_plan())
        .expect("save succeeds");
    let state = service.resume(&user()).expect("resume");

    assert_eq!(state.step, WizardStep::Personal);
    assert_eq!(state.plan, stretched_plan());
}

#[test]
fn apply_persists_when_leaving_input_steps() {
    let (service, repository) = build_service();

    let outcome = service
        .apply(&user(), WizardState::new(), WizardAction::Next)
        .expect("default profile is valid");

    assert_eq!(outcome.effect, Some(WizardEffect::Persist));
    assert!(outcome.report.is_none());
    assert!(repository.load(&user()).expect("load").is_some());
}

#[test]
fn apply_edits_do_not_touch_storage() {
    let (service, repository) = build_service();
    let mut state = WizardState::new();
    state.step = WizardStep::Goals;

    let outcome = service
        .apply(&user(), state, WizardAction::AddGoal)
        .expect("add goal");

    assert_eq!(outcome.effect, None);
    assert_eq!(outcome.state.plan.goals.len(), 2);
    assert!(repository.load(&user()).expect("load").is_none());
}

#[test]
fn full_walk_submits_and_returns_report() {
    let (service, _) = build_service();
    let mut state = service.resume(&user()).expect("resume");

    for _ in 0..2 {
        state = service
            .apply(&user(), state, WizardAction::Next)
            .expect("advance")
            .state;
    }
    let outcome = service
        .apply(&user(), state, WizardAction::Next)
        .expect("submit");

    assert_eq!(outcome.state.step, WizardStep::Results);
    assert_eq!(outcome.effect, Some(WizardEffect::Submit));
    let report = outcome.report.expect("report on submit");
    assert_eq!(report.readiness.score, 80);
    assert_eq!(report.goals[0].contribution.monthly_contribution, 11_447.0);
    assert_eq!(service.load_plan(&user()).expect("saved").plan, outcome.state.plan);
}

#[test]
fn apply_surfaces_reducer_errors() {
    let (service, _) = build_service();
    assert!(matches!(
        service.apply(&user(), WizardState::new(), WizardAction::Back),
        Err(PlanningServiceError::Wizard(WizardError::InvalidTransition { .. }))
    ));
}

#[test]
fn repository_failures_propagate() {
    let service = PlanningService::new(Arc::new(UnavailableRepository));

    assert!(matches!(
        service.save_plan(&user(), stretched_plan()),
        Err(PlanningServiceError::Repository(RepositoryError::Unavailable(_)))
    ));
    assert!(matches!(
        service.apply(&user(), WizardState::new(), WizardAction::Next),
        Err(PlanningServiceError::Repository(_))
    ));
}
