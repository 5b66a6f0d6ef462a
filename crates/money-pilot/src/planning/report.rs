use serde::Serialize;

use super::calculator::{
    compute_allocation, compute_readiness, compute_required_contribution, feasibility_for,
    AllocationResult, CalculationError, GoalFeasibility, ReadinessResult, SipResult,
};
use super::domain::{FinancialPlan, Goal, GoalId, GoalPriority, GoalType, RiskProfile};

/// Fixed rates quoted alongside every report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlanAssumptions {
    pub expected_growth_pct: f64,
    pub safe_return_pct: f64,
    pub inflation_pct: f64,
}

impl Default for PlanAssumptions {
    fn default() -> Self {
        Self {
            expected_growth_pct: 12.0,
            safe_return_pct: 7.0,
            inflation_pct: 6.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalPlan {
    pub goal_id: GoalId,
    pub goal_type: GoalType,
    pub goal_label: &'static str,
    pub priority: GoalPriority,
    pub target_amount: f64,
    pub horizon_years: f64,
    pub contribution: SipResult,
    pub feasibility: GoalFeasibility,
}

/// Everything the results screen shows, derived from a saved plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanReport {
    pub risk: RiskProfile,
    pub readiness: ReadinessResult,
    pub average_horizon_years: f64,
    pub allocation: AllocationResult,
    pub goals: Vec<GoalPlan>,
    pub total_monthly_investment: f64,
    pub monthly_surplus: f64,
    pub total_goal_amount: f64,
    pub achievable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_gap: Option<f64>,
    pub assumptions: PlanAssumptions,
}

impl PlanReport {
    pub fn build(plan: &FinancialPlan) -> Result<Self, CalculationError> {
        plan.validate()?;

        let profile = &plan.personal;
        let risk = plan.preferences.risk;
        let monthly_surplus = profile.monthly_surplus();

        let readiness = compute_readiness(
            profile.monthly_income,
            profile.monthly_expenses,
            profile.current_savings,
        );
        let average_horizon_years = plan.average_horizon_years();
        let allocation = compute_allocation(risk, profile.age, average_horizon_years);

        let goals = plan
            .goals
            .iter()
            .map(|goal| goal_plan(goal, risk, monthly_surplus))
            .collect::<Result<Vec<_>, _>>()?;

        let total_monthly_investment = goals
            .iter()
            .map(|goal| goal.contribution.monthly_contribution)
            .sum::<f64>();
        let achievable = total_monthly_investment <= monthly_surplus;
        let monthly_gap = (!achievable).then(|| total_monthly_investment - monthly_surplus);

        Ok(Self {
            risk,
            readiness,
            average_horizon_years,
            allocation,
            goals,
            total_monthly_investment,
            monthly_surplus,
            total_goal_amount: plan.total_goal_amount(),
            achievable,
            monthly_gap,
            assumptions: PlanAssumptions::default(),
        })
    }

    pub fn infeasible_goals(&self) -> impl Iterator<Item = &GoalPlan> {
        self.goals.iter().filter(|goal| !goal.feasibility.feasible)
    }
}

fn goal_plan(goal: &Goal, risk: RiskProfile, surplus: f64) -> Result<GoalPlan, CalculationError> {
    let contribution = compute_required_contribution(goal.target_amount, goal.horizon_years, risk)?;
    let feasibility = feasibility_for(goal, &contribution, surplus);
    Ok(GoalPlan {
        goal_id: goal.id,
        goal_type: goal.goal_type,
        goal_label: goal.goal_type.label(),
        priority: goal.priority,
        target_amount: goal.target_amount,
        horizon_years: goal.horizon_years,
        contribution,
        feasibility,
    })
}
