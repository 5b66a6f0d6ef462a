use serde::Serialize;

use super::contribution::{compute_required_contribution, SipResult};
use super::CalculationError;
use crate::planning::domain::{Goal, GoalId, GoalType, RiskProfile};

/// Whether a single goal's SIP fits inside the monthly surplus.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalFeasibility {
    pub goal_id: GoalId,
    pub goal_type: GoalType,
    pub required_monthly: f64,
    pub feasible: bool,
    pub gap: f64,
    pub recommendation: String,
}

/// Sum of the monthly SIPs every goal needs on its own.
pub fn total_monthly_investment(goals: &[Goal], risk: RiskProfile) -> Result<f64, CalculationError> {
    goals.iter().try_fold(0.0, |total, goal| {
        let sip = compute_required_contribution(goal.target_amount, goal.horizon_years, risk)?;
        Ok(total + sip.monthly_contribution)
    })
}

pub fn analyze_goal_feasibility(
    goal: &Goal,
    available_surplus: f64,
    risk: RiskProfile,
) -> Result<GoalFeasibility, CalculationError> {
    let required = compute_required_contribution(goal.target_amount, goal.horizon_years, risk)?;
    Ok(feasibility_for(goal, &required, available_surplus))
}

pub(crate) fn feasibility_for(goal: &Goal, required: &SipResult, available_surplus: f64) -> GoalFeasibility {
    let required_monthly = required.monthly_contribution;
    let feasible = required_monthly <= available_surplus;
    let gap = if feasible {
        0.0
    } else {
        required_monthly - available_surplus
    };
    let recommendation = if feasible {
        "Achievable with current surplus".to_string()
    } else {
        format!(
            "Need ₹{} more per month or extend timeline",
            format_rupees(gap)
        )
    };

    GoalFeasibility {
        goal_id: goal.id,
        goal_type: goal.goal_type,
        required_monthly,
        feasible,
        gap,
        recommendation,
    }
}

/// Groups whole rupees in threes, e.g. `1234567.4` becomes `1,234,567`.
pub fn format_rupees(amount: f64) -> String {
    let rounded = super::round_half_up(amount);
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if negative {
        format!("-{grouped}")
    } else {
        grouped
    }
}
