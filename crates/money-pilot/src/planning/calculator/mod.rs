//! Deterministic planning arithmetic. Every function here is pure: no I/O, no
//! shared state, identical output for identical input.

mod allocation;
mod bands;
mod contribution;
mod feasibility;
mod readiness;

pub use allocation::{
    compute_allocation, AllocationBreakdown, AllocationResult, DebtBreakdown, EquityBreakdown,
    GoldBreakdown,
};
pub use contribution::{compute_required_contribution, SipResult};
pub use feasibility::{
    analyze_goal_feasibility, format_rupees, total_monthly_investment, GoalFeasibility,
};
pub use readiness::{
    compute_readiness, validate_cash_flow, ReadinessFactor, ReadinessFactorKind, ReadinessLabel,
    ReadinessMetrics, ReadinessResult,
};

pub(crate) use feasibility::feasibility_for;

/// Input problems the calculators refuse to work with.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalculationError {
    #[error("monthly income must be positive (got {income})")]
    NonPositiveIncome { income: f64 },
    #[error("{field} cannot be negative (got {value})")]
    NegativeAmount { field: &'static str, value: f64 },
    #[error("goal horizon must be positive (got {years} years)")]
    InvalidGoalHorizon { years: f64 },
    #[error("goal target amount must be positive (got {amount})")]
    InvalidTargetAmount { amount: f64 },
    #[error("unknown risk profile '{0}'")]
    UnknownRiskProfile(String),
}

/// Rounds halves towards positive infinity, matching how amounts are displayed.
pub(crate) fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}
